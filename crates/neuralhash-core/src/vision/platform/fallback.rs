//! No-op bindings used where the Objective-C runtime does not exist.
//!
//! Mirrors the surface of the real macOS bindings so the rest of the crate
//! compiles everywhere; every computation fails with `Unavailable`.

use std::path::Path;

use crate::encoding::OutputFormat;
use crate::error::{Error, Result};

pub(crate) fn is_available() -> bool {
    false
}

pub(crate) fn compute(path: &Path, _format: OutputFormat) -> Result<String> {
    Err(Error::Unavailable(format!(
        "cannot compute a NeuralHash for '{}': the Vision framework bridge only exists on macOS",
        path.display()
    )))
}
