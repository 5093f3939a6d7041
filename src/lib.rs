pub mod args;
pub mod cache;
pub mod error;
pub mod model;
pub mod controller {
    pub mod bets;
    pub mod course;
    pub mod cycle;
    pub mod league;
    pub mod player;
    pub mod roles;
}

pub use cache::PlayerCacheMap;
pub use error::ServiceError;
pub use model::player::get_player;
