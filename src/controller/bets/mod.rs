pub mod data_service;
pub mod http_handlers;
pub mod settle;

pub use data_service::*;
pub use http_handlers::*;
