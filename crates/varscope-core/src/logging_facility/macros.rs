//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use varscope_core::log_op_start;
/// log_op_start!("inspect");
/// log_op_start!("inspect", var_name = "x");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = varscope_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = varscope_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use varscope_core::log_op_end;
/// log_op_end!("inspect", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = varscope_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = varscope_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```ignore
/// # use varscope_core::{log_op_error, errors::VarscopeError};
/// log_op_error!("recorder_drain", VarscopeError::WriterPanicked, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let vs_err: $crate::errors::VsError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = varscope_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?vs_err.kind(),
            err_code = vs_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let vs_err: $crate::errors::VsError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = varscope_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?vs_err.kind(),
            err_code = vs_err.code(),
            $($field)*
        );
    }};
}
