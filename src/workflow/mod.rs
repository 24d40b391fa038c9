pub mod document_ctx;
pub mod format_flow;

pub use document_ctx::DocumentCtx;
pub use format_flow::{FormatFlow, FormatReport};
