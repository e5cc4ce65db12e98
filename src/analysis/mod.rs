mod archetype;
mod quality;
mod series;
mod synergy;

pub use archetype::*;
pub use quality::*;
pub use series::*;
pub use synergy::*;
