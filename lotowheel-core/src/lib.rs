pub mod checker;
pub mod combinations;
pub mod engine;
pub mod stats;
pub mod strategies;
pub mod tracker;
pub mod wheel;
