//! The two external collaborators, expressed as traits, plus the in-crate
//! backends used by the browser build and the tests.

pub mod physics;
pub mod scene;
