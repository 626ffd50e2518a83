//! Conversational turn pipeline.
//!
//! Shortcut check first, then context assembly and the gateway call. The
//! log grows by the user turn when the utterance is submitted; the
//! assistant turn is appended only on a shortcut hit or a successful
//! completion. A failed gateway call leaves the log otherwise untouched
//! and surfaces the error to the caller.

use crate::dataset::CountryRecord;
use crate::llm::{CompletionGateway, GatewayError};
use crate::prompt;
use crate::session::ChatSession;
use crate::shortcut;

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// Canned reply from the shortcut table; no network call was made.
    Shortcut,
    /// Text returned by the completion gateway.
    Completion,
}

/// Outcome of one successful turn.
#[derive(Debug, Clone)]
pub struct PipelineReply {
    pub text: String,
    pub source: ReplySource,
    /// The resource-links heuristic fired; the caller should render the
    /// fixed reference list alongside the reply.
    pub suggest_resources: bool,
}

/// Run one conversational turn against the selected country's record.
pub fn run_turn(
    session: &mut ChatSession,
    record: &CountryRecord,
    gateway: &CompletionGateway,
    utterance: &str,
) -> Result<PipelineReply, GatewayError> {
    session.push_user(utterance);

    if let Some(reply) = shortcut::lookup(utterance) {
        tracing::debug!("shortcut hit, skipping gateway");
        session.push_assistant(reply);
        return Ok(PipelineReply {
            text: reply.to_string(),
            source: ReplySource::Shortcut,
            suggest_resources: false,
        });
    }

    // The last turn is the in-flight utterance; everything before it is
    // the history the prompt re-transmits.
    let turns = session.turns();
    let history = &turns[..turns.len() - 1];
    let full_prompt = prompt::build(record, history, utterance);
    let suggest_resources = prompt::wants_resources(utterance);

    tracing::debug!(chars = full_prompt.len(), "sending prompt to gateway");
    let text = gateway.complete(&full_prompt)?;
    session.push_assistant(text.as_str());

    Ok(PipelineReply {
        text,
        source: ReplySource::Completion,
        suggest_resources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionBackend;
    use crate::session::{Role, Turn};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn test_record() -> CountryRecord {
        CountryRecord {
            country: "Mexico".to_string(),
            tariff_rate: 25.0,
            import_value: 475.6,
            top_categories: "Vehicles, Agriculture".to_string(),
            specific_products: "Pickup trucks, Avocados".to_string(),
            alternative_suppliers: "Canada, Brazil".to_string(),
            use_case_impact: "Higher grocery and auto prices".to_string(),
        }
    }

    struct CountingBackend {
        calls: Arc<AtomicUsize>,
        reply: Result<String, String>,
    }

    impl CompletionBackend for CountingBackend {
        fn complete(&self, _prompt: &str) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(msg) => Err(GatewayError::Http(msg.clone())),
            }
        }
    }

    fn gateway_with(calls: Arc<AtomicUsize>, reply: Result<String, String>) -> CompletionGateway {
        CompletionGateway::with_backend(Box::new(CountingBackend { calls, reply }))
    }

    #[test]
    fn test_shortcut_hit_bypasses_gateway() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = gateway_with(calls.clone(), Ok("unused".to_string()));
        let mut session = ChatSession::new();
        session.select_country("Mexico");

        let reply = run_turn(&mut session, &test_record(), &gateway, "hello").unwrap();

        assert_eq!(reply.source, ReplySource::Shortcut);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        // The pair lands in the log exactly as a gateway reply would
        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.turns()[0], Turn::user("hello"));
        assert_eq!(session.turns()[1].role, Role::Assistant);
        assert_eq!(session.turns()[1].content, reply.text);
    }

    #[test]
    fn test_completion_appends_assistant_turn() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = gateway_with(calls.clone(), Ok("The tariff is 25%.".to_string()));
        let mut session = ChatSession::new();
        session.select_country("Mexico");

        let reply = run_turn(
            &mut session,
            &test_record(),
            &gateway,
            "what is the tariff?",
        )
        .unwrap();

        assert_eq!(reply.source, ReplySource::Completion);
        assert_eq!(reply.text, "The tariff is 25%.");
        assert!(!reply.suggest_resources);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.turns()[1], Turn::assistant("The tariff is 25%."));
    }

    #[test]
    fn test_gateway_failure_appends_no_assistant_turn() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = gateway_with(calls.clone(), Err("connection refused".to_string()));
        let mut session = ChatSession::new();
        session.select_country("Mexico");
        session.push_user("earlier question");
        session.push_assistant("earlier answer");

        let result = run_turn(&mut session, &test_record(), &gateway, "and now?");

        assert!(matches!(result, Err(GatewayError::Http(_))));
        // The in-flight user turn stays; the completion step added nothing
        assert_eq!(session.turns().len(), 3);
        assert_eq!(session.turns()[2], Turn::user("and now?"));
    }

    #[test]
    fn test_resource_heuristic_flows_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = gateway_with(calls.clone(), Ok("Here are some links.".to_string()));
        let mut session = ChatSession::new();
        session.select_country("Mexico");

        let reply = run_turn(
            &mut session,
            &test_record(),
            &gateway,
            "show me some resources",
        )
        .unwrap();
        assert!(reply.suggest_resources);

        let reply = run_turn(&mut session, &test_record(), &gateway, "what is this").unwrap();
        assert!(!reply.suggest_resources);
    }
}
