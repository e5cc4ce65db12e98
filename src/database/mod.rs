mod repository;
mod rows;

pub use repository::*;
pub use rows::*;
