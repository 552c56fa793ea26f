//! Vision framework bindings for macOS.
//!
//! Everything here talks to private API through the Objective-C runtime.
//! Objects originating from the bridge have no fixed static shape, so every
//! selector the pipeline depends on is probed with `respondsToSelector:`
//! before it is sent; an OS update that reshapes the class surfaces as a
//! distinct error instead of an uncaught exception.

use std::ffi::c_void;
use std::os::unix::ffi::OsStrExt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::ptr;

use log::warn;
use objc::rc::{autoreleasepool, StrongPtr};
use objc::runtime::{Class, Object, BOOL, NO};
use objc::{class, msg_send, sel, sel_impl};
use once_cell::sync::Lazy;

use crate::encoding::{self, OutputFormat};
use crate::error::{Error, Result};
use crate::vision::{SIGNATURE_HASH_TYPE, SIGNATURE_PRINT_TYPE, SIGNATURE_REQUEST_CLASS};

#[link(name = "Foundation", kind = "framework")]
extern "C" {}

#[link(name = "Vision", kind = "framework")]
extern "C" {}

// Public runtime classes the pipeline cannot run without, probed once per
// process.
static RUNTIME_AVAILABLE: Lazy<bool> =
    Lazy::new(|| Class::get("NSURL").is_some() && Class::get("VNImageRequestHandler").is_some());

pub(crate) fn is_available() -> bool {
    *RUNTIME_AVAILABLE
}

/// Run the full request pipeline for one image.
///
/// One autorelease pool per computation, torn down on every exit path.
/// Uncaught Objective-C exceptions surface as panics through the objc
/// crate's exception feature and are re-wrapped here, message preserved.
pub(crate) fn compute(path: &Path, format: OutputFormat) -> Result<String> {
    autoreleasepool(|| {
        match panic::catch_unwind(AssertUnwindSafe(|| run_pipeline(path, format))) {
            Ok(result) => result,
            Err(payload) => Err(Error::VisionApi(format!(
                "Objective-C failure while processing '{}': {}",
                path.display(),
                panic_message(payload.as_ref())
            ))),
        }
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown Objective-C exception".to_owned()
    }
}

fn run_pipeline(path: &Path, format: OutputFormat) -> Result<String> {
    let request_class = resolve_request_class()?;
    unsafe {
        let url = file_url(path)?;
        let handler = request_handler(url, path)?;
        let request = instantiate_request(request_class)?;
        configure_request(*request)?;
        perform_request(*handler, *request, path)?;
        extract_hash(*request, path, format)
    }
}

/// Resolve the private request class by its obfuscated name.
///
/// The single most fragile operation in the pipeline: the name carries no
/// stability guarantee, so failure is an expected outcome with its own
/// error kind, distinct from the API misbehaving.
fn resolve_request_class() -> Result<&'static Class> {
    Class::get(SIGNATURE_REQUEST_CLASS).ok_or_else(|| {
        Error::ClassResolution(format!(
            "required Vision class '{}' not found; the obfuscated name may have \
             changed in this macOS release",
            SIGNATURE_REQUEST_CLASS
        ))
    })
}

const UTF8_ENCODING: usize = 4;

unsafe fn file_url(path: &Path) -> Result<*mut Object> {
    let bytes = path.as_os_str().as_bytes();
    let alloc: *mut Object = msg_send![class!(NSString), alloc];
    let raw_path: *mut Object = msg_send![alloc, initWithBytes: bytes.as_ptr() as *const c_void
                                                 length: bytes.len()
                                                 encoding: UTF8_ENCODING];
    if raw_path.is_null() {
        return Err(Error::ImageProcessing(format!(
            "could not create a valid URL for path '{}'",
            path.display()
        )));
    }
    let ns_path = StrongPtr::new(raw_path);

    let url: *mut Object = msg_send![class!(NSURL), fileURLWithPath: *ns_path];
    if url.is_null() {
        return Err(Error::ImageProcessing(format!(
            "could not create a valid URL for path '{}'",
            path.display()
        )));
    }
    // Autoreleased; the pool in `compute` keeps it alive.
    Ok(url)
}

unsafe fn request_handler(url: *mut Object, path: &Path) -> Result<StrongPtr> {
    let alloc: *mut Object = msg_send![class!(VNImageRequestHandler), alloc];
    let options: *mut Object = ptr::null_mut();
    let handler: *mut Object = msg_send![alloc, initWithURL: url options: options];
    if handler.is_null() {
        return Err(Error::ImageProcessing(format!(
            "could not initialize the image request handler for '{}'",
            path.display()
        )));
    }
    Ok(StrongPtr::new(handler))
}

unsafe fn instantiate_request(request_class: &Class) -> Result<StrongPtr> {
    let alloc: *mut Object = msg_send![request_class, alloc];
    let request: *mut Object = msg_send![alloc, init];
    if request.is_null() {
        return Err(Error::VisionApi(format!(
            "failed to initialize an instance of '{}'",
            SIGNATURE_REQUEST_CLASS
        )));
    }
    Ok(StrongPtr::new(request))
}

/// Probe for the two private setters, then write the required magic values.
unsafe fn configure_request(request: *mut Object) -> Result<()> {
    let has_print: BOOL =
        msg_send![request, respondsToSelector: sel!(setImageSignatureprintType:)];
    let has_hash: BOOL = msg_send![request, respondsToSelector: sel!(setImageSignatureHashType:)];
    if has_print == NO || has_hash == NO {
        return Err(Error::VisionApi(format!(
            "'{}' instance is missing the expected configuration setters; \
             the private API shape has changed",
            SIGNATURE_REQUEST_CLASS
        )));
    }

    let () = msg_send![request, setImageSignatureprintType: SIGNATURE_PRINT_TYPE];
    let () = msg_send![request, setImageSignatureHashType: SIGNATURE_HASH_TYPE];
    Ok(())
}

unsafe fn perform_request(handler: *mut Object, request: *mut Object, path: &Path) -> Result<()> {
    let requests: *mut Object = msg_send![class!(NSArray), arrayWithObject: request];
    // Error out-parameter deliberately nil, matching the observed call shape.
    let no_error: *mut c_void = ptr::null_mut();
    let success: BOOL = msg_send![handler, performRequests: requests error: no_error];
    if success == NO {
        return Err(Error::VisionApi(format!(
            "Vision request execution failed for '{}' \
             (performRequests:error: returned NO without raising)",
            path.display()
        )));
    }
    Ok(())
}

/// Walk the observations and return the first usable hash descriptor.
unsafe fn extract_hash(request: *mut Object, path: &Path, format: OutputFormat) -> Result<String> {
    let results: *mut Object = msg_send![request, results];
    let count: usize = if results.is_null() {
        0
    } else {
        msg_send![results, count]
    };
    if count == 0 {
        return Err(Error::Computation(format!(
            "no results returned from the Vision request for '{}'",
            path.display()
        )));
    }

    for index in 0..count {
        let observation: *mut Object = msg_send![results, objectAtIndex: index];
        if observation.is_null() {
            continue;
        }

        let has_accessor: BOOL =
            msg_send![observation, respondsToSelector: sel!(imageSignatureHash)];
        if has_accessor == NO {
            warn!(
                "observation {} (class {}) for '{}' does not expose imageSignatureHash; skipping",
                index,
                class_name(observation),
                path.display()
            );
            continue;
        }

        let hash_obj: *mut Object = msg_send![observation, imageSignatureHash];
        if hash_obj.is_null() {
            warn!(
                "imageSignatureHash returned nil for observation {} of '{}'; skipping",
                index,
                path.display()
            );
            continue;
        }

        // A hash object that cannot encode itself means the whole API
        // surface has drifted; skipping would just hide it.
        let can_encode: BOOL = msg_send![hash_obj,
            respondsToSelector: sel!(encodeHashDescriptorWithBase64EncodingAndReturnError:)];
        if can_encode == NO {
            return Err(Error::VisionApi(format!(
                "hash object (class {}) for '{}' does not support base64 descriptor \
                 encoding; the private API shape has changed",
                class_name(hash_obj),
                path.display()
            )));
        }

        let no_error: *mut c_void = ptr::null_mut();
        let descriptor_data: *mut Object =
            msg_send![hash_obj, encodeHashDescriptorWithBase64EncodingAndReturnError: no_error];
        if descriptor_data.is_null() {
            return Err(Error::VisionApi(format!(
                "encoding the hash descriptor for '{}' returned nil",
                path.display()
            )));
        }

        let descriptor = nsdata_ascii(descriptor_data)?;
        return encoding::descriptor_to_output(&descriptor, format);
    }

    Err(Error::Computation(format!(
        "could not extract a hash from any observation for '{}'",
        path.display()
    )))
}

unsafe fn class_name(obj: *mut Object) -> String {
    (*obj).class().name().to_owned()
}

unsafe fn nsdata_ascii(data: *mut Object) -> Result<String> {
    let len: usize = msg_send![data, length];
    if len == 0 {
        return Ok(String::new());
    }
    let bytes: *const c_void = msg_send![data, bytes];
    if bytes.is_null() {
        return Ok(String::new());
    }
    let slice = std::slice::from_raw_parts(bytes as *const u8, len);
    String::from_utf8(slice.to_vec())
        .map_err(|_| Error::Computation("hash descriptor is not valid ASCII".to_owned()))
}
