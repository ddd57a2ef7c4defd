//! C-compatible FFI API for cross-language bindings.
//!
//! # ABI Contract
//!
//! All exported functions use `extern "C"` calling convention and `#[no_mangle]`
//! to ensure stable symbol names.
//!
//! ## Inputs
//! The three report documents (`params`, `data`, `ranking`) and the optional
//! options document are null-terminated UTF-8 JSON strings.
//!
//! ## Memory management
//! - Buffers returned by `jreport_*` functions are allocated on the Rust heap.
//! - Callers **must** free them with `jreport_free_buffer` / `jreport_free_string`.
//! - Passing a null pointer to a free function is a no-op.
//!
//! ## Error handling
//! Functions that can fail return a `c_int`:
//! - `0` success
//! - `1` null pointer argument
//! - `2` invalid UTF-8
//! - `3` input validation failed
//! - `4` configuration or rendering failed
//!
//! Error details can be retrieved via `jreport_last_error`, which is
//! thread-local.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::slice;

use crate::assets::ReportAssets;
use crate::error::ReportError;
use crate::model::Report;
use crate::pipeline::{compute_report_layout, generate_report, ReportOptions};

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = RefCell::new(None);
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

const ERR_NULL: c_int = 1;
const ERR_UTF8: c_int = 2;
const ERR_VALIDATION: c_int = 3;
const ERR_GENERATION: c_int = 4;

fn error_code(err: &ReportError) -> c_int {
    set_last_error(&err.to_string());
    match err {
        ReportError::Validation(_) => ERR_VALIDATION,
        _ => ERR_GENERATION,
    }
}

/// Borrow a C string as `&str`.
///
/// # Safety
/// `ptr` must be null or point to a valid null-terminated string.
unsafe fn c_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, c_int> {
    if ptr.is_null() {
        set_last_error(&format!("Null pointer argument: {what}"));
        return Err(ERR_NULL);
    }
    CStr::from_ptr(ptr).to_str().map_err(|e| {
        set_last_error(&format!("Invalid UTF-8 in {what}: {e}"));
        ERR_UTF8
    })
}

/// Options from a nullable JSON string; null means defaults.
///
/// # Safety
/// Same as [`c_str`].
unsafe fn options_from_c(ptr: *const c_char) -> Result<ReportOptions, c_int> {
    if ptr.is_null() {
        return Ok(ReportOptions::default());
    }
    let json = c_str(ptr, "options")?;
    serde_json::from_str(json).map_err(|e| {
        error_code(&ReportError::Config(format!("invalid options: {e}")))
    })
}

/// # Safety
/// All three pointers must be null or valid null-terminated strings.
unsafe fn report_from_c(
    params: *const c_char,
    data: *const c_char,
    ranking: *const c_char,
) -> Result<Report, c_int> {
    let params = c_str(params, "params")?;
    let data = c_str(data, "data")?;
    let ranking = c_str(ranking, "ranking")?;
    Report::from_json_strs(params, data, ranking).map_err(|e| error_code(&ReportError::from(e)))
}

// ---------------------------------------------------------------------------
// Core API
// ---------------------------------------------------------------------------

/// Generate the report PDF.
///
/// # Parameters
/// - `params`, `data`, `ranking`: the three input documents
/// - `options`: options JSON, or `NULL` for defaults (logos are read from
///   the paths it names)
/// - `out_buf`: on success, receives a pointer to heap-allocated PDF bytes
/// - `out_len`: on success, receives the length of the PDF buffer
///
/// # Safety
/// - String arguments must be null or valid null-terminated strings.
/// - `out_buf` and `out_len` must be valid pointers.
/// - The caller must free `*out_buf` by calling `jreport_free_buffer`.
#[no_mangle]
pub unsafe extern "C" fn jreport_generate_pdf(
    params: *const c_char,
    data: *const c_char,
    ranking: *const c_char,
    options: *const c_char,
    out_buf: *mut *mut u8,
    out_len: *mut u32,
) -> c_int {
    if out_buf.is_null() || out_len.is_null() {
        set_last_error("Null pointer argument");
        return ERR_NULL;
    }

    let options = match options_from_c(options) {
        Ok(o) => o,
        Err(code) => return code,
    };
    let report = match report_from_c(params, data, ranking) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let result = ReportAssets::load(&options.logos)
        .and_then(|assets| generate_report(&report, &options, &assets));

    match result {
        Ok(generated) => {
            let len = generated.pdf.len() as u32;
            let buf = generated.pdf.into_boxed_slice();
            let raw = Box::into_raw(buf) as *mut u8;
            *out_buf = raw;
            *out_len = len;
            0
        }
        Err(e) => error_code(&e),
    }
}

/// Compute only the page layout (no PDF rendering, no logos needed).
/// Returns JSON.
///
/// # Safety
/// - String arguments must be null or valid null-terminated strings.
/// - `out_json_ptr` must be valid; free the result with `jreport_free_string`.
#[no_mangle]
pub unsafe extern "C" fn jreport_compute_layout(
    params: *const c_char,
    data: *const c_char,
    ranking: *const c_char,
    options: *const c_char,
    out_json_ptr: *mut *mut c_char,
) -> c_int {
    if out_json_ptr.is_null() {
        set_last_error("Null pointer argument");
        return ERR_NULL;
    }

    let options = match options_from_c(options) {
        Ok(o) => o,
        Err(code) => return code,
    };
    let report = match report_from_c(params, data, ranking) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let json = compute_report_layout(&report, &options).to_json();
    match CString::new(json) {
        Ok(cs) => {
            *out_json_ptr = cs.into_raw();
            0
        }
        Err(e) => {
            set_last_error(&format!("Layout JSON contains a NUL byte: {e}"));
            *out_json_ptr = ptr::null_mut();
            ERR_GENERATION
        }
    }
}

// ---------------------------------------------------------------------------
// Memory management
// ---------------------------------------------------------------------------

/// Free a PDF buffer returned by `jreport_generate_pdf`.
///
/// # Safety
/// `buf` must have been returned by a previous `jreport_generate_pdf` call,
/// and `len` must be the corresponding length.
#[no_mangle]
pub unsafe extern "C" fn jreport_free_buffer(buf: *mut u8, len: u32) {
    if !buf.is_null() {
        let _ = Box::from_raw(slice::from_raw_parts_mut(buf, len as usize));
    }
}

/// Free a layout JSON string returned by `jreport_compute_layout`.
///
/// # Safety
/// `s` must have been returned by Rust's `CString::into_raw`.
#[no_mangle]
pub unsafe extern "C" fn jreport_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Retrieve the last error message. Returns a null-terminated string.
///
/// The returned pointer is valid until the next `jreport_*` call on the same
/// thread. The caller should **not** free this pointer.
///
/// Returns null if no error has occurred.
#[no_mangle]
pub extern "C" fn jreport_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        let borrow = e.borrow();
        match borrow.as_ref() {
            Some(cs) => cs.as_ptr(),
            None => ptr::null(),
        }
    })
}

/// Return the library version as a null-terminated string.
/// The caller must **not** free this pointer.
#[no_mangle]
pub extern "C" fn jreport_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
