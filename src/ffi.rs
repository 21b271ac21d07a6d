//! FFI bindings for wellness metrics
//!
//! This module provides C-compatible functions so the tracker's presentation
//! layer can call the calculator from other languages. All functions use C
//! strings (null-terminated) and return allocated memory that must be freed
//! by the caller using `wellness_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_uint};
use std::ptr;

use crate::clock::format_12_hour_parts;
use crate::duration::format_duration;
use crate::insights::InsightConfig;
use crate::pipeline::{checkins_to_metrics, entries_to_metrics, MetricsProcessor};
use crate::rating::{energy_label, mood_color, mood_label};
use crate::types::{RatingScore, SleepDuration};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Calculator
// ============================================================================

/// Format a time of day in 12-hour notation.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL if `hour` or `minute` is out of range; call `wellness_last_error`.
#[no_mangle]
pub unsafe extern "C" fn wellness_format_12_hour(hour: c_uint, minute: c_uint) -> *mut c_char {
    clear_last_error();

    match format_12_hour_parts(hour, minute) {
        Ok(text) => string_to_cstr(&text),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Format a duration given in total minutes; a negative value means unknown.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
#[no_mangle]
pub unsafe extern "C" fn wellness_format_duration(total_minutes: i64) -> *mut c_char {
    clear_last_error();

    let duration = u32::try_from(total_minutes)
        .ok()
        .map(SleepDuration::from_total_minutes);
    string_to_cstr(&format_duration(duration.as_ref()))
}

/// Mood color for a score; off-scale scores get the neutral color.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
#[no_mangle]
pub unsafe extern "C" fn wellness_mood_color(score: i64) -> *mut c_char {
    clear_last_error();
    string_to_cstr(mood_color(Some(RatingScore::new(score))).as_str())
}

/// Mood label for a score.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
#[no_mangle]
pub unsafe extern "C" fn wellness_mood_label(score: i64) -> *mut c_char {
    clear_last_error();
    string_to_cstr(mood_label(RatingScore::new(score)))
}

/// Energy label for a score.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
#[no_mangle]
pub unsafe extern "C" fn wellness_energy_label(score: i64) -> *mut c_char {
    clear_last_error();
    string_to_cstr(energy_label(RatingScore::new(score)))
}

// ============================================================================
// Stateless API
// ============================================================================

/// Process a JSON array of sleep entries and return report JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_entries_to_metrics(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match entries_to_metrics(json_str) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Process a JSON array of check-ins and return report JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_checkins_to_metrics(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match checkins_to_metrics(json_str) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a MetricsProcessor
pub struct MetricsProcessorHandle {
    processor: MetricsProcessor,
}

/// Create a new MetricsProcessor keeping `window_days` nights.
///
/// # Safety
/// - Returns a pointer to a newly allocated processor.
/// - Must be freed with `wellness_processor_free`.
/// - Returns NULL on error.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_new(window_days: c_int) -> *mut MetricsProcessorHandle {
    clear_last_error();

    let mut config = InsightConfig::default();
    if window_days > 0 {
        config.window_days = window_days as usize;
    }

    match MetricsProcessor::with_config(config) {
        Ok(processor) => Box::into_raw(Box::new(MetricsProcessorHandle { processor })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a MetricsProcessor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_free(processor: *mut MetricsProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Process sleep entries with a stateful processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_process_entries(
    processor: *mut MetricsProcessorHandle,
    json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match handle.processor.process_entries_json(&json_str) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Process check-ins with a stateful processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_process_checkins(
    processor: *mut MetricsProcessorHandle,
    json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match handle.processor.process_checkins_json(&json_str) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Current insights of a processor as JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_insights(
    processor: *mut MetricsProcessorHandle,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    match serde_json::to_string(&handle.processor.insights()) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Save processor state to JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - Returns a newly allocated string that must be freed with `wellness_free_string`.
/// - Returns NULL on error; call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_save_state(
    processor: *mut MetricsProcessorHandle,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    match handle.processor.save_state() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Load processor state from JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `wellness_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `wellness_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn wellness_processor_load_state(
    processor: *mut MetricsProcessorHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.processor.load_state(&json_str) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by a `wellness_*` function.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a `wellness_*` function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn wellness_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next `wellness_*` call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn wellness_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn wellness_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
