//! Core functionality for computing NeuralHashes on macOS.
//!
//! The hash itself is produced by a private, obfuscated class inside Apple's
//! Vision framework; this library only drives that class through the
//! Objective-C runtime and decodes what it returns:
//! - Availability probing for the runtime and frameworks
//! - Dynamic resolution of the private request class
//! - Request pipeline execution and observation walking
//! - Descriptor decoding into hex, base64, or bit-string output
//!
//! Nothing the private API does is guaranteed to survive a macOS update;
//! when it breaks, the errors here say which layer moved.

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use encoding::OutputFormat;
pub use error::{Error, Result};
pub use vision::{compute_neural_hash, is_available, SIGNATURE_REQUEST_CLASS};

// -- Public Modules --
pub mod encoding;
pub mod vision;
