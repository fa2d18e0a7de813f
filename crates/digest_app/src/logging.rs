//! Logger setup for the binary: terminal always, plus `LOG_FILE` when set.

use digest_core::LoggingSettings;
use digest_logging::{digest_warn, parse_level, LogDestination};
use log::LevelFilter;

pub fn initialize(settings: &LoggingSettings) {
    let level = parse_level(&settings.level);
    digest_logging::initialize(destination(settings), level.unwrap_or(LevelFilter::Info));
    if level.is_none() {
        digest_warn!("Unknown LOG_LEVEL {:?}, using info", settings.level);
    }
}

fn destination(settings: &LoggingSettings) -> LogDestination {
    match &settings.file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn log_file_adds_a_file_destination() {
        let settings = LoggingSettings {
            level: "debug".into(),
            file: Some(PathBuf::from("digest.log")),
        };
        assert_eq!(
            destination(&settings),
            LogDestination::Both(PathBuf::from("digest.log"))
        );
    }

    #[test]
    fn terminal_is_the_default_destination() {
        let settings = LoggingSettings {
            level: "info".into(),
            file: None,
        };
        assert_eq!(destination(&settings), LogDestination::Terminal);
    }
}
