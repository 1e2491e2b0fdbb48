//! miaasctl library - exposes modules for integration tests

pub mod dashboard;
pub mod errors;
pub mod logging;
pub mod output;
