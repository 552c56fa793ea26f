//! The Vision framework request pipeline.
//!
//! The hash is produced by a private, obfuscated class inside Vision.framework.
//! This module only drives that class through the Objective-C runtime: resolve
//! it by name, configure it, execute the request, and pull the descriptor out
//! of the observations it returns. None of it is guaranteed to survive a macOS
//! release; the class name below in particular is expected to change.

mod platform;

use std::path::Path;

use crate::encoding::OutputFormat;
use crate::error::{Error, Result};

/// Obfuscated name of the private request class inside Vision.framework.
///
/// There is no forward-compatibility guarantee for this symbol. When a macOS
/// update renames it, resolution fails with [`Error::ClassResolution`] and
/// this constant is the one place to update.
pub const SIGNATURE_REQUEST_CLASS: &str = "VN6kBnCOr2mZlSV6yV1dLwB";

/// Value written to `setImageSignatureprintType:` before execution.
///
/// Reverse-engineered constant. Its semantics are unknown; the private API
/// simply requires it to produce the observed NeuralHash output. Not a
/// tunable.
pub const SIGNATURE_PRINT_TYPE: i64 = 3;

/// Value written to `setImageSignatureHashType:` before execution.
///
/// Reverse-engineered constant with unknown semantics, same as
/// [`SIGNATURE_PRINT_TYPE`]. Not a tunable.
pub const SIGNATURE_HASH_TYPE: i64 = 1;

/// Report whether the Objective-C runtime and the Foundation/Vision
/// frameworks are usable on this system.
///
/// Resolved once per process; cheap to call repeatedly. Always false off
/// macOS.
pub fn is_available() -> bool {
    platform::is_available()
}

/// Compute the NeuralHash of the image at `path`, rendered in `format`.
///
/// The path must already be validated to exist and be a regular file; that
/// is the caller's responsibility. Fails with [`Error::Unavailable`] before
/// touching the bridge when the runtime is not usable.
pub fn compute_neural_hash(path: &Path, format: OutputFormat) -> Result<String> {
    if !is_available() {
        return Err(Error::Unavailable(
            "the Objective-C runtime and the Foundation/Vision frameworks are required; \
             this system does not provide them"
                .to_owned(),
        ));
    }
    platform::compute(path, format)
}
