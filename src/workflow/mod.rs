pub mod domain_ctx;
pub mod domain_flow;
pub mod progress;

pub use domain_ctx::DomainCtx;
pub use domain_flow::DomainFlow;
pub use progress::{DomainStage, ProgressEvent, ProgressSink};
