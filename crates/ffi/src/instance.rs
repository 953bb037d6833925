use multilevel_wind_core::{
    LayerTable, Meters, MetersPerSecond, MultiLevelWind, PinkNoiseTurbulence, Radians, Seconds,
    TurbulenceParameters, WindLayerSample,
};
use std::ptr;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::error::{DefaultWindFfiError, WindErrorCode};
use crate::helpers::{track_error, track_result};

/// One wind layer as passed across the FFI boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindLayer {
    /// Altitude in meters
    pub altitude: f64,
    /// Mean wind speed in m/s
    pub speed: f64,
    /// Bearing the wind blows from, in radians
    pub direction: f64,
}

/// Gust parameters for the pink-noise generator.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindTurbulence {
    /// Absolute speed variability in m/s
    pub standard_deviation: f64,
    /// Speed variability as a fraction of the mean speed
    pub turbulence_intensity: f64,
}

/// Wind velocity in m/s (x east, y north, z up).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindVelocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A multi-level wind model with pink-noise gusting.
///
/// # Thread Safety
/// The model keeps noise state between queries, so every evaluation needs
/// exclusive access. The model sits behind a `Mutex`; concurrent callers are
/// serialized. Queries must still be issued in non-decreasing time order
/// across all threads sharing one instance.
pub struct MultiLevelWindInstance {
    pub(crate) model: Mutex<MultiLevelWind<PinkNoiseTurbulence>>,
}

fn check_finite(name: &str, value: f64) -> Result<(), DefaultWindFfiError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DefaultWindFfiError::non_finite(name, value))
    }
}

impl MultiLevelWindInstance {
    /// Creates a new instance from a layer list.
    ///
    /// # Errors
    ///
    /// Returns `WindErrorCode::InvalidParameter` if any value is not finite.
    /// Returns `WindErrorCode::EmptyLayerTable` if `layers` is empty.
    pub(crate) fn new(
        layers: &[WindLayer],
        turbulence: WindTurbulence,
        seed: u64,
    ) -> Result<Box<Self>, DefaultWindFfiError> {
        let mut samples = Vec::with_capacity(layers.len());
        for (i, layer) in layers.iter().enumerate() {
            check_finite(&format!("layers[{i}].altitude"), layer.altitude)?;
            check_finite(&format!("layers[{i}].speed"), layer.speed)?;
            check_finite(&format!("layers[{i}].direction"), layer.direction)?;
            samples.push(WindLayerSample::new(
                Meters::new(layer.altitude),
                MetersPerSecond::new(layer.speed),
                Radians::new(layer.direction),
            ));
        }
        check_finite("standard_deviation", turbulence.standard_deviation)?;
        check_finite("turbulence_intensity", turbulence.turbulence_intensity)?;

        let table = LayerTable::try_from(samples)?;
        let parameters = TurbulenceParameters {
            standard_deviation: MetersPerSecond::new(turbulence.standard_deviation),
            turbulence_intensity: turbulence.turbulence_intensity,
        };
        let model = MultiLevelWind::new(table, parameters, PinkNoiseTurbulence::with_seed(seed));

        Ok(Box::new(Self {
            model: Mutex::new(model),
        }))
    }

    /// Wind velocity at `time` and `altitude`.
    ///
    /// # Errors
    ///
    /// Returns `WindErrorCode::LockPoisoned` if a previous caller panicked
    /// while holding the model, otherwise the model's own error.
    pub(crate) fn evaluate(
        &self,
        time: f64,
        altitude: f64,
    ) -> Result<WindVelocity, DefaultWindFfiError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| DefaultWindFfiError::lock_poisoned("Mutex"))?;
        let v = model.evaluate(Seconds::new(time), Meters::new(altitude))?;
        Ok(WindVelocity {
            x: v.x,
            y: v.y,
            z: v.z,
        })
    }
}

/// Create a new multi-level wind model and return it via out-parameter.
///
/// This function follows standard C error handling conventions:
/// - Returns `WindErrorCode::Ok` (0) on success with valid instance in `out_instance`
/// - Returns non-zero error code on failure with `out_instance` set to null
///
/// Parameters
/// - `layers`: Pointer to `layer_count` layers, ordered by ascending altitude.
///   The layers are copied; the caller may free them after this call.
/// - `layer_count`: Number of layers. Must be at least 1.
/// - `turbulence`: Gust parameters.
/// - `seed`: Seed of the noise process. Equal seeds reproduce equal gusts.
/// - `out_instance`: Pointer to receive the created instance. Must be non-null.
///
/// Returns
/// - `WindErrorCode::Ok` (0): success, `out_instance` contains valid pointer
/// - `WindErrorCode::NullPointer`: `out_instance` is null, or `layers` is null with a non-zero count
/// - `WindErrorCode::EmptyLayerTable`: `layer_count` is zero
/// - `WindErrorCode::InvalidParameter`: a layer or turbulence value is not finite
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - `layers` must point to `layer_count` readable `WindLayer` values.
/// - The caller takes ownership of the returned instance and MUST call
///   `multilevel_wind_destroy` exactly once to avoid memory leaks.
///
/// Example (C)
/// ```c
/// WindLayer layers[] = {{0.0, 3.0, 0.0}, {1000.0, 12.0, 1.57}};
/// WindTurbulence turbulence = {0.2, 0.1};
/// MultiLevelWindInstance* wind = NULL;
/// if (multilevel_wind_new(layers, 2, turbulence, 10, &wind) != Ok) {
///     fprintf(stderr, "%s\n", multilevel_wind_get_last_error());
///     return;
/// }
/// // ... use wind ...
/// multilevel_wind_destroy(wind);
/// ```
#[no_mangle]
pub unsafe extern "C" fn multilevel_wind_new(
    layers: *const WindLayer,
    layer_count: usize,
    turbulence: WindTurbulence,
    seed: u64,
    out_instance: *mut *mut MultiLevelWindInstance,
) -> WindErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultWindFfiError::null_pointer("out_instance"));
    }

    let slice: &[WindLayer] = if layer_count == 0 {
        &[]
    } else if layers.is_null() {
        unsafe {
            *out_instance = ptr::null_mut();
        }
        return track_error(&DefaultWindFfiError::null_pointer("layers"));
    } else {
        // SAFETY: caller guarantees `layers` points to `layer_count` values
        unsafe { std::slice::from_raw_parts(layers, layer_count) }
    };

    match track_result(MultiLevelWindInstance::new(slice, turbulence, seed)) {
        Ok(instance) => {
            info!("Created multi-level wind instance with {} layers", layer_count);
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            WindErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Evaluate the wind velocity at `time` (seconds) and `altitude` (meters).
///
/// Times must be non-negative and non-decreasing across calls on the same
/// instance. Every call advances the instance's gust process.
///
/// Returns
/// - `WindErrorCode::Ok` (0): success, `out_velocity` holds the velocity
/// - `WindErrorCode::NullPointer`: `instance` or `out_velocity` is null
/// - `WindErrorCode::InvalidTime`: time is negative, not finite, or went backwards
/// - `WindErrorCode::DegenerateLayerSpacing`: bracketing layers share an altitude
/// - `WindErrorCode::LockPoisoned`: a previous caller panicked mid-query
///
/// `out_velocity` is left untouched on failure.
///
/// # Safety
///
/// - `instance` must be null or a live pointer returned by `multilevel_wind_new`.
/// - `out_velocity` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn multilevel_wind_evaluate(
    instance: *const MultiLevelWindInstance,
    time: f64,
    altitude: f64,
    out_velocity: *mut WindVelocity,
) -> WindErrorCode {
    if instance.is_null() {
        return track_error(&DefaultWindFfiError::null_pointer("instance"));
    }
    if out_velocity.is_null() {
        return track_error(&DefaultWindFfiError::null_pointer("out_velocity"));
    }

    // SAFETY: non-null and, per contract, created by `multilevel_wind_new`
    let instance = unsafe { &*instance };
    match track_result(instance.evaluate(time, altitude)) {
        Ok(velocity) => {
            unsafe {
                *out_velocity = velocity;
            }
            WindErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Destroys an instance previously created by `multilevel_wind_new`.
///
/// Behavior:
/// - If `ptr` is null, this function is a no-op.
/// - Otherwise the instance and its model are freed.
///
/// # Safety
/// - The pointer MUST have been created by `multilevel_wind_new`.
/// - The pointer MUST NOT have been freed already.
/// - After calling this function, the caller must not use the pointer again.
#[no_mangle]
pub unsafe extern "C" fn multilevel_wind_destroy(ptr: *mut MultiLevelWindInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: The pointer was created by `Box::into_raw` in `multilevel_wind_new`
    // and has not been freed. `Box::from_raw` reclaims ownership and drops it.
    unsafe {
        drop(Box::from_raw(ptr));
    }
    debug!("Destroyed multi-level wind instance");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{multilevel_wind_get_last_error, multilevel_wind_get_last_error_code};
    use std::ffi::CStr;

    const TURBULENCE: WindTurbulence = WindTurbulence {
        standard_deviation: 0.2,
        turbulence_intensity: 0.0,
    };

    fn last_error() -> String {
        let ptr = multilevel_wind_get_last_error();
        assert!(!ptr.is_null());
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }

    fn create(layers: &[WindLayer]) -> (WindErrorCode, *mut MultiLevelWindInstance) {
        let mut instance: *mut MultiLevelWindInstance = ptr::null_mut();
        let code = unsafe {
            multilevel_wind_new(layers.as_ptr(), layers.len(), TURBULENCE, 10, &mut instance)
        };
        (code, instance)
    }

    #[test]
    fn test_round_trip() {
        let layers = [
            WindLayer {
                altitude: 0.0,
                speed: 0.0,
                direction: 0.0,
            },
            WindLayer {
                altitude: 1000.0,
                speed: 20.0,
                direction: 0.0,
            },
        ];
        let (code, instance) = create(&layers);
        assert_eq!(code, WindErrorCode::Ok);
        assert!(!instance.is_null());
        assert_eq!(multilevel_wind_get_last_error_code(), WindErrorCode::Ok);

        let mut velocity = WindVelocity::default();
        let code = unsafe { multilevel_wind_evaluate(instance, 0.0, 500.0, &mut velocity) };
        assert_eq!(code, WindErrorCode::Ok);
        // Intensity 0 under a relative gust scale leaves the mean untouched
        assert!((velocity.y - 10.0).abs() < 1e-9);
        assert_eq!(velocity.z, 0.0);

        unsafe { multilevel_wind_destroy(instance) };
    }

    #[test]
    fn test_empty_layers() {
        let (code, instance) = create(&[]);
        assert_eq!(code, WindErrorCode::EmptyLayerTable);
        assert!(instance.is_null());
        assert_eq!(multilevel_wind_get_last_error_code(), WindErrorCode::EmptyLayerTable);
        assert!(last_error().contains("at least one"));
    }

    #[test]
    fn test_null_pointers() {
        let code = unsafe { multilevel_wind_new(ptr::null(), 0, TURBULENCE, 10, ptr::null_mut()) };
        assert_eq!(code, WindErrorCode::NullPointer);
        assert!(last_error().contains("out_instance"));

        let mut instance: *mut MultiLevelWindInstance = ptr::null_mut();
        let code = unsafe { multilevel_wind_new(ptr::null(), 3, TURBULENCE, 10, &mut instance) };
        assert_eq!(code, WindErrorCode::NullPointer);
        assert!(instance.is_null());

        let mut velocity = WindVelocity::default();
        let code = unsafe { multilevel_wind_evaluate(ptr::null(), 0.0, 0.0, &mut velocity) };
        assert_eq!(code, WindErrorCode::NullPointer);

        unsafe { multilevel_wind_destroy(ptr::null_mut()) };
    }

    #[test]
    fn test_non_finite_layer_rejected() {
        let layers = [WindLayer {
            altitude: f64::NAN,
            speed: 1.0,
            direction: 0.0,
        }];
        let (code, instance) = create(&layers);
        assert_eq!(code, WindErrorCode::InvalidParameter);
        assert!(instance.is_null());
        assert!(last_error().contains("layers[0].altitude"));
    }

    #[test]
    fn test_time_errors_reported() {
        let layers = [WindLayer {
            altitude: 0.0,
            speed: 5.0,
            direction: 1.0,
        }];
        let (_, instance) = create(&layers);
        let mut velocity = WindVelocity::default();

        let code = unsafe { multilevel_wind_evaluate(instance, 2.0, 0.0, &mut velocity) };
        assert_eq!(code, WindErrorCode::Ok);

        let before = velocity;
        let code = unsafe { multilevel_wind_evaluate(instance, 1.0, 0.0, &mut velocity) };
        assert_eq!(code, WindErrorCode::InvalidTime);
        assert_eq!(velocity, before);
        assert!(last_error().contains("backwards"));

        let code = unsafe { multilevel_wind_evaluate(instance, 3.0, 0.0, &mut velocity) };
        assert_eq!(code, WindErrorCode::Ok);
        assert!(multilevel_wind_get_last_error().is_null());

        unsafe { multilevel_wind_destroy(instance) };
    }
}
