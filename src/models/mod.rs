//! Domain models and the pure lease-accounting functions

pub mod audit;
pub mod book;
pub mod lease;
pub mod user;
