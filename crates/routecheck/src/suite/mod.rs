//! The smoke suite: five cases, the driver that runs them, and the tally.
//!
//! ```text
//! SuiteRunner::run
//!   ├─ banner + prerequisites
//!   ├─ health probe (warning only)
//!   ├─ basic_completion       ┐
//!   ├─ streaming_completion   │
//!   ├─ model_mapping          ├─ print through a Reporter, return bool
//!   ├─ system_messages        │
//!   ├─ unsupported_feature    ┘
//!   └─ summary (Tally)
//! ```

pub mod cases;
pub mod reporter;
pub mod runner;
pub mod tally;

pub use cases::{
    classify_rejection, drain_stream, probe_model, CaseKind, ModelProbe, RejectionVerdict,
    MULTIPLE_COMPLETIONS_MARKER,
};
pub use reporter::{MemoryReporter, ReportLine, Reporter, Tone, RULE_WIDTH};
pub use runner::{print_summary, SuiteRunner};
pub use tally::{CaseResult, SuiteReport, Tally};
