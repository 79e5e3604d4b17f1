use anyhow::{Context, Result};
use log::LevelFilter;
use simple_logger::SimpleLogger;

pub fn init(level: &str) -> Result<()> {
    let level = parse_level(level)?;

    SimpleLogger::new()
        .with_level(level)
        .with_module_level("hyper", LevelFilter::Warn)
        .with_module_level("reqwest", LevelFilter::Warn)
        .init()?;

    Ok(())
}

fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .parse::<LevelFilter>()
        .with_context(|| format!("Unknown log level `{}`", level))
}
