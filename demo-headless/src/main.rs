use clap::Parser;
use multilevel_wind_core::{
    Degrees, Meters, MetersPerSecond, MultiLevelWind, PinkNoiseTurbulence, Radians, Seconds,
    SteadyWind, TurbulenceGenerator, TurbulenceParameters, WindLayerConfig, WindLayerSample,
    DEFAULT_SEED,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Print a wind profile sampled from a multi-level wind model
#[derive(Parser, Debug)]
#[command(name = "wind-profile")]
#[command(about = "Sample a multi-level wind model over altitude", long_about = None)]
struct Args {
    /// Wind layer as `ALT_M:SPEED_MS:DIR_DEG` (repeatable, ascending altitude).
    /// Defaults to the 13 standard levels with a calm global wind.
    #[arg(short, long = "layer", value_parser = parse_layer)]
    layers: Vec<WindLayerSample>,

    /// Gust standard deviation in m/s
    #[arg(long, default_value_t = 0.2)]
    std_dev: f64,

    /// Turbulence intensity (fraction of mean speed, applied after --std-dev)
    #[arg(short, long, default_value_t = 0.1)]
    intensity: f64,

    /// Seed of the gust process
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Disable gusting and print the mean wind only
    #[arg(long)]
    steady: bool,

    /// Time at which the profile is sampled, in seconds
    #[arg(short, long, default_value_t = 0.0)]
    time: f64,

    /// Highest altitude sampled, in meters
    #[arg(long, default_value_t = 10_000.0)]
    max_altitude: f64,

    /// Altitude step between rows, in meters
    #[arg(long, default_value_t = 500.0)]
    step: f64,
}

/// Parse `ALT_M:SPEED_MS:DIR_DEG`
fn parse_layer(s: &str) -> Result<WindLayerSample, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("expected ALT_M:SPEED_MS:DIR_DEG, got '{s}'"));
    }
    let mut values = [0.0; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{part}': {e}"))?;
    }
    Ok(WindLayerSample::new(
        Meters::new(values[0]),
        MetersPerSecond::new(values[1]),
        Radians::from(Degrees::new(values[2])),
    ))
}

fn print_profile<T: TurbulenceGenerator>(
    wind: &mut MultiLevelWind<T>,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.step <= 0.0 || !args.step.is_finite() {
        return Err(format!("--step must be positive, got {}", args.step).into());
    }

    println!(
        "{:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "alt (m)", "vx (m/s)", "vy (m/s)", "vz (m/s)", "speed", "mean"
    );
    let time = Seconds::new(args.time);
    let rows = (args.max_altitude / args.step).floor().max(0.0) as usize;
    for row in 0..=rows {
        let altitude = Meters::new(row as f64 * args.step);
        let mean = wind.mean_wind(altitude)?;
        let v = wind.evaluate(time, altitude)?;
        println!(
            "{:>10.1} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
            altitude.value(),
            v.x,
            v.y,
            v.z,
            v.x.hypot(v.y),
            mean.speed.value()
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = if args.layers.is_empty() {
        WindLayerConfig::default()
    } else {
        WindLayerConfig::from_levels(args.layers.clone())
    };
    let table = config.layer_table()?;
    println!("{}\n", config.summary());

    let parameters = TurbulenceParameters {
        standard_deviation: MetersPerSecond::new(args.std_dev),
        turbulence_intensity: args.intensity,
    };

    if args.steady {
        info!("Sampling steady profile at {}", Seconds::new(args.time));
        let mut wind = MultiLevelWind::new(table, parameters, SteadyWind::new());
        print_profile(&mut wind, &args)
    } else {
        info!(
            "Sampling gusty profile at {} with seed {}",
            Seconds::new(args.time),
            args.seed
        );
        let mut wind =
            MultiLevelWind::new(table, parameters, PinkNoiseTurbulence::with_seed(args.seed));
        print_profile(&mut wind, &args)
    }
}
