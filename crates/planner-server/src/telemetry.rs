//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Install the JSON subscriber. `RUST_LOG` directives are honoured on
/// top of `planner=info`.
pub fn init() -> Result<(), ParseError> {
    let filter = EnvFilter::from_default_env().add_directive("planner=info".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .init();

    Ok(())
}
