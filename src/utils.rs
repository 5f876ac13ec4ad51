//! Utils

use clap::Parser;

use crate::logging::LogFormat;

/// Arguments for the session demo
#[derive(Debug, Parser)]
pub struct ExampleSessionArgs {
    /// Fixture set to use for the catalog & policies
    #[clap(short, long, default_value = "default")]
    pub fixture: String,

    /// Seed for the promotion random source
    #[clap(short, long, default_value_t = 0)]
    pub seed: u64,

    /// Number of simulated seconds to run the promotion timers for
    #[clap(short, long, default_value_t = 180)]
    pub ticks: u64,

    /// Reference date for pricing (e.g. 2024-01-02); today if omitted
    #[clap(short, long)]
    pub date: Option<jiff::civil::Date>,

    /// Log level (trace, debug, info, warn, error)
    #[clap(short, long, default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[clap(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
