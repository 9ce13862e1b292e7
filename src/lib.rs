pub mod cli;
pub mod logging;
pub mod output;
pub mod runner;

pub use logging::init_tracing;
