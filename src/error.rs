//! Error types for the conversion pipeline.

use std::io;
use thiserror::Error;

/// Result type alias for bodh operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers.
///
/// Missing directives, malformed table rows, unterminated fences and bad
/// color values are not errors; they degrade locally inside the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The document has no non-blank slide after splitting.
    #[error("No slides found in document")]
    NoSlides,

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configuration file is not valid TOML for the expected schema.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The LaTeX engine could not be started.
    #[error("LaTeX engine '{0}' is not available")]
    CompilerUnavailable(String),

    /// The engine ran but produced no output document.
    #[error("{engine} compilation failed:\n{log_tail}")]
    CompileFailed { engine: String, log_tail: String },

    /// The engine did not finish within the configured time.
    #[error("{engine} did not finish within {seconds}s")]
    CompileTimeout { engine: String, seconds: u64 },
}
