mod http;
mod replay;
mod simulator;
mod ws;

pub use http::*;
pub use replay::*;
pub use simulator::*;
pub use ws::*;
