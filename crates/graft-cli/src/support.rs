use crate::config::GraftConfig;
use graft_kernel::{PartialMap, Rational, Vector};
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub type Map = PartialMap<Rational>;

pub fn load_config_or_exit(path: &str) -> GraftConfig {
    GraftConfig::load(Path::new(path)).unwrap_or_else(|e| {
        eprintln!("error: {path}: {e}");
        std::process::exit(1);
    })
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_logging(config: &GraftConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn read_json_file_or_exit<T>(path: &str, label: &str) -> T
where
    T: serde::de::DeserializeOwned,
{
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {label} at {path}: {e}");
        std::process::exit(1);
    });
    serde_json::from_slice::<T>(&bytes).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {label} JSON at {path}: {e}");
        std::process::exit(1);
    })
}

pub fn read_map_or_exit(path: &str) -> Map {
    read_json_file_or_exit(path, "partial map")
}

/// Parse `1,0,2/3` into a vector of rationals.
pub fn parse_vector_or_exit(text: &str, label: &str) -> Vector<Rational> {
    let coords = text
        .split(',')
        .map(|part| part.trim().parse::<Rational>())
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("error: invalid {label} vector: {e}");
            std::process::exit(1);
        });
    Vector::new(coords)
}

/// Parse a named option value through its `FromStr`.
pub fn parse_or_exit<T>(value: &str) -> T
where
    T: std::str::FromStr,
    T::Err: Display,
{
    value.parse().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn or_exit<T, E: Display>(result: Result<T, E>, context: &str) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("error: {context}: {e}");
        std::process::exit(1);
    })
}

pub fn print_json<T: Serialize>(payload: &T) {
    let rendered = or_exit(serde_json::to_string_pretty(payload), "render json");
    println!("{rendered}");
}

pub fn print_map(title: &str, map: &Map) {
    println!("{title}");
    println!("  Shape: {}", map.shape());
    println!("  Domain: {}", map.domain());
    println!("  Total: {}", map.is_total());
    println!("  Fingerprint: {}", map.fingerprint());
    if map.domain().is_zero() {
        println!("  Pairs: (none)");
        return;
    }
    println!("  Pairs:");
    for (x, y) in map.pairs() {
        println!("    - {x} ↦ {y}");
    }
}
