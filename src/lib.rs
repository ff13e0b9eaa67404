// Library surface for the typing session core, reused by the binary and tests.
// Rendering lives in the binary; nothing here touches the terminal directly.
pub mod app_dirs;
pub mod board;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod logging;
pub mod normalize;
pub mod report;
pub mod results;
pub mod runtime;
pub mod scoring;
pub mod text_source;
pub mod timer;

pub use error::{Error, Result};
