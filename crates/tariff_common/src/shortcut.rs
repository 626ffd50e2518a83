//! Intent shortcut table - canned replies that bypass the model.
//!
//! Matching is exact on the whole trimmed, lowercased utterance. An
//! utterance that merely contains one of the phrases is not a hit.

const SHORTCUTS: &[(&str, &str)] = &[
    (
        "who are you",
        "I am an AI assistant designed to explain economic policies, particularly tariffs and their impacts.",
    ),
    (
        "what can you do",
        "I can provide information about U.S. tariffs, their potential effects on prices and imports, and related economic concepts. You can ask me specific questions about tariffs on different countries or products.",
    ),
    (
        "tell me a joke",
        "I'm still learning how to be funny in the realm of economics!",
    ),
    (
        "hello",
        "Hey there! Ask me something about trade, economics or tariffs.",
    ),
    (
        "hi",
        "Hey there! Ask me something about trade, economics or tariffs.",
    ),
    (
        "how are you",
        "I'm just a program, but I'm here to help you with your questions about tariffs and trade!",
    ),
];

/// Look up a canned reply for the utterance, if any. Pure function, no
/// side effects.
pub fn lookup(utterance: &str) -> Option<&'static str> {
    let normalized = utterance.trim().to_lowercase();
    SHORTCUTS
        .iter()
        .find(|(phrase, _)| *phrase == normalized)
        .map(|(_, reply)| *reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_phrases_hit() {
        assert!(lookup("hello").is_some());
        assert!(lookup("hi").is_some());
        assert!(lookup("who are you").is_some());
        assert!(lookup("what can you do").is_some());
        assert!(lookup("tell me a joke").is_some());
        assert!(lookup("how are you").is_some());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(lookup("Hello"), lookup("hello"));
        assert!(lookup("WHO ARE YOU").is_some());
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert!(lookup("  hi  ").is_some());
        assert_eq!(lookup("  hi  "), lookup("hi"));
    }

    #[test]
    fn test_substring_is_not_a_hit() {
        assert!(lookup("hello there").is_none());
        assert!(lookup("well, who are you").is_none());
        assert!(lookup("say hi to the model").is_none());
    }

    #[test]
    fn test_unrelated_utterance_misses() {
        assert!(lookup("what is the tariff on steel?").is_none());
        assert!(lookup("").is_none());
    }
}
