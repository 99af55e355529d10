//! Library surface of the `sis` command-line client.
//!
//! The binary wires these pieces to [`sis_core`] controllers and workflows.

pub mod browse;
pub mod logging;
pub mod payload;
pub mod progress;
pub mod prompt;
pub mod render;
