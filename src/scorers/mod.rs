mod flex;
mod matchup;
mod meta;
mod phase;
mod proficiency;
mod tournament;

pub use flex::*;
pub use matchup::*;
pub use meta::*;
pub use phase::*;
pub use proficiency::*;
pub use tournament::*;
