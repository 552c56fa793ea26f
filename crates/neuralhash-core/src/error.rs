use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the neuralhash-core library
///
/// Every failure in the library is one of these variants, so callers can
/// match broadly on `Error` or narrowly on a single kind. Helpers return
/// the most specific variant; the top-level computation re-wraps broad
/// bridge failures into `VisionApi`.
#[derive(Error, Debug)]
pub enum Error {
    /// Objective-C runtime or the Foundation/Vision frameworks missing
    #[error("Vision runtime unavailable: {0}")]
    Unavailable(String),

    /// Private Vision class could not be resolved at runtime
    #[error("Vision class resolution failed: {0}")]
    ClassResolution(String),

    /// Image URL or request handler construction failed
    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    /// The Vision API misbehaved: nil instances, missing selectors,
    /// execution failure, or an Objective-C exception
    #[error("Vision API error: {0}")]
    VisionApi(String),

    /// Unrecognized output format
    #[error("Invalid output format: {0}")]
    InvalidFormat(String),

    /// Hash could not be obtained or decoded
    #[error("Hash computation failed: {0}")]
    Computation(String),
}
