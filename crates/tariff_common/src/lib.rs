//! Tariff Common - shared types and logic for the tariff explorer
//!
//! Dataset access, session state, prompt assembly, the completion gateway
//! and the conversational turn pipeline. The presentation layer lives in
//! the `tariffctl` crate.

pub mod config;
pub mod dataset;
pub mod llm;
pub mod pipeline;
pub mod projection;
pub mod prompt;
pub mod session;
pub mod shortcut;

pub use config::{ExplorerConfig, GatewaySettings};
pub use dataset::{CountryRecord, DatasetError, TariffDataset};
pub use llm::{CompletionBackend, CompletionGateway, GatewayError};
pub use pipeline::{run_turn, PipelineReply, ReplySource};
pub use session::{ChatSession, Role, Turn};
