//! Business logic services

pub mod executor;
