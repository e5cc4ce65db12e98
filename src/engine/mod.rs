mod bans;
mod grouped;
mod picks;
mod recommend;

pub use bans::*;
pub use grouped::*;
pub use picks::*;
pub use recommend::*;
