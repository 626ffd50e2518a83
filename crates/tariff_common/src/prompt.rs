//! Context assembler - builds the full prompt sent to the model.
//!
//! The gateway is stateless per call, so the entire transcript so far is
//! re-sent on every turn. No truncation: the source behavior defines no
//! cutoff and none is invented here.

use crate::dataset::CountryRecord;
use crate::session::Turn;
use std::fmt::Write;

/// Marker that introduces the in-flight user utterance.
pub const CURRENT_QUESTION_MARKER: &str = "User's current question:";

const RESOURCE_KEYWORDS: &[&str] = &["resources", "links", "learn more"];

/// True when the utterance asks for supplementary reading material.
pub fn wants_resources(utterance: &str) -> bool {
    let lowered = utterance.to_lowercase();
    RESOURCE_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Assemble the prompt: instruction preamble, the country's facts, every
/// prior turn as `role: content` lines, then the current question.
pub fn build(record: &CountryRecord, history: &[Turn], current: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are an AI economic policy explainer. Your primary focus is on U.S. tariffs, \
         their impact on import values, product prices, and related economic policies.\n\n",
    );

    let _ = writeln!(
        prompt,
        "Here is the current tariff information for {}:",
        record.country
    );
    let _ = writeln!(prompt, "Tariff Imposed by US: {}%", record.tariff_rate);
    let _ = writeln!(
        prompt,
        "Estimated Annual Import Value: ${} Billion",
        record.import_value
    );
    let _ = writeln!(prompt, "Top Product Categories: {}", record.top_categories);
    let _ = writeln!(prompt, "Specific Products: {}", record.specific_products);
    let _ = writeln!(prompt, "Use Case Impact: {}", record.use_case_impact);
    let _ = writeln!(
        prompt,
        "Alternative Suppliers: {}",
        record.alternative_suppliers
    );

    prompt.push_str(
        "\nYou should only answer questions that are directly related to these topics. \
         If a question is outside of this scope, politely decline to answer.\n\n",
    );

    prompt.push_str("Here is the conversation history:\n");
    for turn in history {
        let _ = writeln!(prompt, "{}: {}", turn.role, turn.content);
    }

    let _ = write!(
        prompt,
        "\n{} {}\n\nAssistant's response:",
        CURRENT_QUESTION_MARKER, current
    );

    if wants_resources(current) {
        prompt.push_str(
            " Also, provide a few relevant resources or links where the user can learn more about this topic.",
        );
    }

    prompt
}
