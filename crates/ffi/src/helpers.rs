use crate::error::{with_last_error_mut, WindErrorCode, WindFfiError};
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `WindFfiError`.
pub(crate) fn set_last_error(error: &impl WindFfiError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl WindFfiError) -> WindErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result and reduce it to its code.
/// Successful results clear the previous error.
#[inline]
pub(crate) fn track_result<T, E: WindFfiError>(result: Result<T, E>) -> Result<T, WindErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = WindErrorCode::Ok;
    });
}
