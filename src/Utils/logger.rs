use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::error::Error;
use std::fs::File;

/// Installs the global logger: terminal output and, if `log_file` is given, a copy into that file.
/// Fails if a logger is already installed or the file cannot be created.
pub fn init_logger(level: LevelFilter, log_file: Option<&str>) -> Result<(), Box<dyn Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let config = ConfigBuilder::new().set_time_format_rfc3339().build();
        loggers.push(WriteLogger::new(level, config, File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pfr.log");
        // another test may have installed the logger already, the second call must fail anyway
        let _ = init_logger(LevelFilter::Info, path.to_str());
        assert!(init_logger(LevelFilter::Info, None).is_err());
    }
}
