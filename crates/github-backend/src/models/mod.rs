pub mod organization;
pub mod repository;

pub use organization::*;
pub use repository::*;
