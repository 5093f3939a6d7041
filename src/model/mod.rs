pub mod database;
pub mod player;
pub mod types;

pub use database::*;
pub use types::*;
