// Import platform-specific modules conditionally
#[cfg(target_os = "macos")]
mod macos;

#[cfg(not(target_os = "macos"))]
mod fallback;

// Re-export based on platform
#[cfg(target_os = "macos")]
pub(crate) use self::macos::{compute, is_available};

#[cfg(not(target_os = "macos"))]
pub(crate) use self::fallback::{compute, is_available};
