//! Step definitions for offline delivery scenarios.

pub mod given;
pub mod then;
pub mod world;
