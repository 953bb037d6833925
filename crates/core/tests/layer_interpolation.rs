//! Integration tests for the multi-level wind interpolation engine
//!
//! Uses a deterministic generator that echoes the mean wind so the
//! interpolated speed and direction can be read straight off the velocity.

use approx::assert_abs_diff_eq;
use multilevel_wind_core::{
    Bracket, LayerTable, Meters, MetersPerSecond, MultiLevelWind, Radians, Seconds, SteadyWind,
    TurbulenceParameters, Vec3, WindError, WindLayerSample,
};
use std::f64::consts::PI;
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn layer(alt: f64, speed: f64, dir_deg: f64) -> WindLayerSample {
    WindLayerSample::new(
        Meters::new(alt),
        MetersPerSecond::new(speed),
        Radians::new(dir_deg.to_radians()),
    )
}

fn steady(layers: &[WindLayerSample]) -> MultiLevelWind<SteadyWind> {
    MultiLevelWind::new(
        LayerTable::new(layers).unwrap(),
        TurbulenceParameters::default(),
        SteadyWind::new(),
    )
}

/// Horizontal speed and bearing of a velocity vector
fn speed_and_bearing(v: Vec3) -> (f64, f64) {
    (v.x.hypot(v.y), v.x.atan2(v.y))
}

/// Smallest signed difference between two bearings
fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(2.0 * PI);
    if d > PI {
        d - 2.0 * PI
    } else {
        d
    }
}

#[test]
fn test_sample_altitudes_reproduce_samples() {
    let layers = [
        layer(0.0, 2.0, 45.0),
        layer(500.0, 6.0, 90.0),
        layer(1500.0, 11.0, 200.0),
        layer(3000.0, 17.0, 300.0),
    ];
    let mut wind = steady(&layers);

    for (i, sample) in layers.iter().enumerate() {
        let v = wind.evaluate(Seconds::new(i as f64), sample.altitude).unwrap();
        let (speed, bearing) = speed_and_bearing(v);
        assert_abs_diff_eq!(speed, sample.speed.value(), epsilon = 1e-9);
        assert_abs_diff_eq!(angle_diff(bearing, sample.direction.value()), 0.0, epsilon = 1e-9);
        assert_eq!(v.z, 0.0);
    }
}

#[test]
fn test_clamped_outside_layer_range() {
    let mut wind = steady(&[layer(100.0, 3.0, 30.0), layer(900.0, 12.0, 250.0)]);

    let below = wind.mean_wind(Meters::new(-50.0)).unwrap();
    assert_eq!(below.speed, MetersPerSecond::new(3.0));
    assert_eq!(below.direction, Radians::new(30.0_f64.to_radians()));

    let above = wind.mean_wind(Meters::new(20_000.0)).unwrap();
    assert_eq!(above.speed, MetersPerSecond::new(12.0));
    assert_eq!(above.direction, Radians::new(250.0_f64.to_radians()));

    let v = wind.evaluate(Seconds::new(0.0), Meters::new(0.0)).unwrap();
    let (speed, _) = speed_and_bearing(v);
    assert_abs_diff_eq!(speed, 3.0, epsilon = 1e-12);
}

#[test]
fn test_direction_interpolates_through_north() {
    let wind = steady(&[layer(0.0, 5.0, 350.0), layer(1000.0, 5.0, 10.0)]);
    let mid = wind.mean_wind(Meters::new(500.0)).unwrap();
    assert_abs_diff_eq!(angle_diff(mid.direction.value(), 0.0), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mid.speed.value(), 5.0, epsilon = 1e-12);
}

#[test]
fn test_linear_speed_midpoint() {
    let mut wind = steady(&[layer(0.0, 0.0, 0.0), layer(1000.0, 20.0, 0.0)]);
    let v = wind.evaluate(Seconds::new(0.0), Meters::new(500.0)).unwrap();
    assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(v.y, 10.0, epsilon = 1e-12);

    let mean = wind.mean_wind(Meters::new(500.0)).unwrap();
    assert_eq!(mean.direction.value(), 0.0);
}

#[test]
fn test_speed_is_monotonic_between_layers() {
    let wind = steady(&[layer(0.0, 2.0, 0.0), layer(2000.0, 14.0, 90.0)]);
    let mut previous = f64::NEG_INFINITY;
    for step in 0..=20 {
        let alt = f64::from(step) * 100.0;
        let speed = wind.mean_wind(Meters::new(alt)).unwrap().speed.value();
        assert!(speed >= previous, "speed dropped at {alt} m");
        previous = speed;
    }
}

#[test]
fn test_empty_table_rejected() {
    assert_eq!(LayerTable::new(&[]), Err(WindError::EmptyLayerTable));
}

#[test]
fn test_zero_width_bracket_rejected() {
    let lower = layer(700.0, 4.0, 0.0);
    let upper = layer(700.0, 8.0, 0.0);
    let bracket = Bracket::Between {
        lower: &lower,
        upper: &upper,
    };
    assert_eq!(
        bracket.blend(Meters::new(700.0)),
        Err(WindError::DegenerateLayerSpacing {
            altitude: Meters::new(700.0)
        })
    );
}

#[test]
fn test_duplicate_altitudes_resolve_to_first_match() {
    // The scan stops at the first layer at or above the query, so a query
    // at a duplicated altitude never needs the zero-width bracket.
    let mut wind = steady(&[layer(0.0, 1.0, 0.0), layer(500.0, 4.0, 0.0), layer(500.0, 9.0, 0.0)]);
    let v = wind.evaluate(Seconds::new(0.0), Meters::new(500.0)).unwrap();
    assert_abs_diff_eq!(v.y, 4.0, epsilon = 1e-12);

    let v = wind.evaluate(Seconds::new(0.0), Meters::new(600.0)).unwrap();
    assert_abs_diff_eq!(v.y, 9.0, epsilon = 1e-12);
}

#[test]
fn test_reproducible_with_deterministic_generator() {
    let layers = [layer(0.0, 3.0, 120.0), layer(800.0, 9.0, 200.0), layer(2400.0, 15.0, 260.0)];
    let queries = [(0.0, 10.0), (0.5, 400.0), (1.0, 1200.0), (1.5, 5000.0)];

    let run = || {
        let mut wind = steady(&layers);
        queries
            .iter()
            .map(|&(t, alt)| wind.evaluate(Seconds::new(t), Meters::new(alt)).unwrap())
            .collect::<Vec<_>>()
    };

    let first = run();
    let second = run();
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.z.to_bits(), b.z.to_bits());
    }
}

#[test]
fn test_generator_receives_blended_mean() {
    let mut wind = steady(&[layer(0.0, 4.0, 0.0), layer(1000.0, 8.0, 90.0)]);
    assert_eq!(wind.turbulence().mean_speed(), MetersPerSecond::new(4.0));

    wind.evaluate(Seconds::new(0.0), Meters::new(250.0)).unwrap();
    let expected = wind.mean_wind(Meters::new(250.0)).unwrap();
    assert_eq!(wind.turbulence().mean_speed(), expected.speed);
    assert_eq!(wind.turbulence().mean_direction(), expected.direction);
    assert_abs_diff_eq!(expected.speed.value(), 5.0, epsilon = 1e-12);
}
