//! C ABI for the multi-level wind model.
//!
//! Functions return a [`WindErrorCode`]; on failure the message is available
//! from [`multilevel_wind_get_last_error`] on the same thread. The C header
//! is generated into the workspace root as `MultiLevelWindFFI.h`.

mod error;
mod helpers;
mod instance;

pub use error::{multilevel_wind_get_last_error, multilevel_wind_get_last_error_code, WindErrorCode};
pub use instance::{
    multilevel_wind_destroy, multilevel_wind_evaluate, multilevel_wind_new,
    MultiLevelWindInstance, WindLayer, WindTurbulence, WindVelocity,
};
