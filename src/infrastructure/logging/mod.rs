//! Logging: bracketed line format, dual output (timestamped file + stdout).

mod formatter;
mod setup;

pub use setup::setup_logging;
