//! Library surface of the dpeak CLI, exposed for integration tests.

pub mod cli;
pub mod logging;
pub mod quality;
