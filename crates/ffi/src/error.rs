use multilevel_wind_core::WindError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait WindFfiError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> WindErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `WindFfiError`.
///
/// Wraps a `WindErrorCode` with a message. Core [`WindError`]s convert into
/// this type with their `Display` text as the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultWindFfiError {
    code: WindErrorCode,
    msg: String,
}

impl DefaultWindFfiError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: WindErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"Mutex"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: WindErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for a non-finite floating point argument.
    ///
    /// # Arguments
    /// * `param_name` - The name of the invalid parameter (e.g., `"layers[2].altitude"`)
    /// * `value` - The invalid value
    pub fn non_finite(param_name: &str, value: f64) -> Self {
        Self::invalid_parameter(format!("Parameter {param_name} must be finite, got {value}"))
    }

    /// Create error for invalid parameter.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: WindErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl From<WindError> for DefaultWindFfiError {
    fn from(error: WindError) -> Self {
        let code = match error {
            WindError::EmptyLayerTable => WindErrorCode::EmptyLayerTable,
            WindError::DegenerateLayerSpacing { .. } => WindErrorCode::DegenerateLayerSpacing,
            WindError::InvalidTime { .. } | WindError::NonMonotonicTime { .. } => {
                WindErrorCode::InvalidTime
            }
            WindError::LayerIndexOutOfRange { .. } | WindError::UnsortedLayers { .. } => {
                WindErrorCode::InvalidParameter
            }
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl WindFfiError for DefaultWindFfiError {
    fn code(&self) -> WindErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by multi-level wind functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// No wind layers were supplied.
    EmptyLayerTable = 3,

    /// Two bracketing layers share the same altitude.
    DegenerateLayerSpacing = 4,

    /// Query time is negative, not finite, or earlier than the previous query.
    InvalidTime = 5,

    /// Invalid parameter passed to function.
    InvalidParameter = 6,
}

impl From<DefaultWindFfiError> for WindErrorCode {
    fn from(error: DefaultWindFfiError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored here so the pointer handed to C stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, WindErrorCode)> = const { RefCell::new((None, WindErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, WindErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, WindErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded or the message cannot be converted to a C string.
///
/// # Thread Safety
/// Error messages are stored per-thread, so each thread has its own independent error state.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// MultiLevelWindInstance* wind = nullptr;
/// WindErrorCode err = multilevel_wind_new(layers, count, params, 10, &wind);
/// if (err != Ok) {
///     const char* error = multilevel_wind_get_last_error();
///     if (error) {
///         printf("Wind model creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn multilevel_wind_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns:
/// - `WindErrorCode::Ok` (0) if the last call on this thread succeeded
/// - The specific error code from the last failed operation
#[no_mangle]
pub extern "C" fn multilevel_wind_get_last_error_code() -> WindErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
