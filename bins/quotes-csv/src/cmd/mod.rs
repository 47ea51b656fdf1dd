pub mod config;
pub mod error;
pub mod normalize;
pub mod quote;
