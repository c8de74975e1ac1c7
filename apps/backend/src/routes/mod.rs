//! API route handlers

pub mod grading;
pub mod lessons;
