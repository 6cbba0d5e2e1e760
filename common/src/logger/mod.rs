mod init;
mod span;
mod trace_id;

pub use init::init_logger;
pub use span::{child_span, pass_span};
pub use trace_id::TraceId;
