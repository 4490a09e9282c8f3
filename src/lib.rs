pub mod board;
pub mod config;
pub mod engine;
pub mod estimate;
pub mod limits;
pub mod model;
pub mod notify;
pub mod observability;
