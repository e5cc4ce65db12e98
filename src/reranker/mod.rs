mod client;
mod context;
mod extract;
mod prompt;
mod reranker;
mod result;

pub use client::*;
pub use context::*;
pub use extract::*;
pub use prompt::*;
pub use reranker::*;
pub use result::*;
