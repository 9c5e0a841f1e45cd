use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "run_plot_json")]
#[command(about = "Plot the boundaries of a simulation config and the rays traced through them")]
pub struct Args {
    /// Simulation config describing the boundaries
    pub config: PathBuf,

    /// Traced ray positions: `ray_id, x, y, angle` rows
    #[arg(long, default_value = "path.csv")]
    pub data: PathBuf,

    /// Skip rays with fewer samples than this (0 keeps every ray)
    #[arg(long, default_value_t = 0)]
    pub min_path_samples: usize,

    /// Points sampled along each conic profile
    #[arg(long, default_value_t = 50)]
    pub conic_samples: usize,

    /// Font file used for boundary labels
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Print the boundaries in the canonical config layout and exit
    #[arg(long)]
    pub print_config: bool,

    /// Logging level, overridden by `RUST_LOG` when it is set
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["run_plot_json", "sim.json"]).unwrap();

        assert_eq!(args.config, PathBuf::from("sim.json"));
        assert_eq!(args.data, PathBuf::from("path.csv"));
        assert_eq!(args.min_path_samples, 0);
        assert_eq!(args.conic_samples, 50);
        assert!(args.font.is_none());
        assert!(!args.print_config);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Info);
    }

    #[test]
    fn all_options() {
        let args = Args::try_parse_from([
            "run_plot_json",
            "sim.json",
            "--data",
            "rays.csv",
            "--min-path-samples",
            "3",
            "--conic-samples",
            "120",
            "--font",
            "label.ttf",
            "--print-config",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.data, PathBuf::from("rays.csv"));
        assert_eq!(args.min_path_samples, 3);
        assert_eq!(args.conic_samples, 120);
        assert_eq!(args.font, Some(PathBuf::from("label.ttf")));
        assert!(args.print_config);
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }

    #[test]
    fn config_is_required() {
        assert!(Args::try_parse_from(["run_plot_json"]).is_err());
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(Args::try_parse_from(["run_plot_json", "a.json", "--log-level", "loud"]).is_err());
    }
}
