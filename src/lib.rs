//! Room-scale socket panel and breaker simulator.

pub mod appliances;
pub mod config;
pub mod journal;
pub mod room;
pub mod runner;
pub mod soak;
pub mod source;
