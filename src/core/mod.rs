//! Core utilities shared by every layer: console logging, errors,
//! seeded randomness and the pixel <-> simulation unit bridge.

#[path = "utils/log.rs"]
pub mod log;
pub mod error;
pub mod random;
pub mod units;
