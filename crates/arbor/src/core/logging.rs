//! Tracing subscriber installation.

use tracing::{Level, trace};
use tracing_subscriber::fmt;

use super::{config::Config, error::Result};

/// Install a compact `fmt` subscriber writing to stderr at `level`. Calling
/// this more than once, or after another subscriber is installed, leaves the
/// existing subscriber in place.
pub fn init(level: Level) {
    let format = fmt::format()
        .with_level(true)
        .with_line_number(true)
        .with_target(false)
        .compact();
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .event_format(format)
        .try_init();
    if installed.is_err() {
        trace!("tracing subscriber already installed");
    }
}

/// Install a subscriber at the level named in `config`.
pub fn init_from(config: &Config) -> Result<()> {
    init(config.level()?);
    Ok(())
}
