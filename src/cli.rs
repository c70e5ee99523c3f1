use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(author, version, about = "Terminal stopwatch with lap times", long_about = None)]
pub struct Arguments {
    #[arg(short = 'v', long = "verbose", env = "LAPWATCH_VERBOSITY", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Refresh period while running, in milliseconds.
    #[arg(
        long,
        env = "LAPWATCH_TICK_MS",
        default_value_t = 100,
        value_parser = clap::value_parser!(u64).range(10..)
    )]
    pub tick_ms: u64,

    /// Write logs here instead of stderr.
    #[arg(long, env = "LAPWATCH_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Arguments {
    pub fn level_filter(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Arguments::try_parse_from(["lapwatch"]).unwrap();
        assert_eq!(args.tick_period(), Duration::from_millis(100));
        assert_eq!(args.level_filter(), LevelFilter::Warn);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_flags() {
        let args =
            Arguments::try_parse_from(["lapwatch", "-vv", "--tick-ms", "50", "--log-file", "lap.log"])
                .unwrap();
        assert_eq!(args.level_filter(), LevelFilter::Debug);
        assert_eq!(args.tick_ms, 50);
        assert_eq!(args.log_file, Some(PathBuf::from("lap.log")));
    }

    #[test]
    fn test_tick_too_small_is_rejected() {
        assert!(Arguments::try_parse_from(["lapwatch", "--tick-ms", "5"]).is_err());
    }
}
