//! Routecheck: smoke-test harness for OpenAI-compatible chat-completion routers.
//!
//! Runs a fixed sequence of chat-completion requests against a router that
//! translates the OpenAI API onto another backend, prints colorized results
//! and tallies them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────┐     │
//! │   │ SuiteRunner│───►│ LlmClient  │───►│ Router under   │     │
//! │   │ (5 cases)  │    │ (reqwest)  │    │ test (/v1)     │     │
//! │   └─────┬──────┘    └────────────┘    └────────────────┘     │
//! │         │ Reporter                                           │
//! │         ▼                                                    │
//! │   console / memory                                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use routecheck::{MemoryReporter, SuiteConfig, SuiteRunner};
//!
//! # async fn demo() -> routecheck::RoutecheckResult<()> {
//! let runner = SuiteRunner::new(SuiteConfig::default())?;
//! let mut reporter = MemoryReporter::new();
//! let report = runner.run(&mut reporter).await;
//! assert_eq!(report.tally.total(), 5);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod llm;
mod result;
pub mod suite;

pub use config::{SuiteConfig, DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_MODELS, DEFAULT_TIMEOUT};
pub use llm::{ChatMessage, ChatRequest, ChatResponse, LlmClient, LlmClientError, Role, Usage};
pub use result::{RoutecheckError, RoutecheckResult};
pub use suite::{
    CaseKind, CaseResult, MemoryReporter, RejectionVerdict, Reporter, SuiteReport, SuiteRunner,
    Tally, Tone,
};
