// SPDX-License-Identifier: MPL-2.0

//! Subscriber setup for the binary. The library only emits events.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVES: &str = "mastofeed=info";

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("a global tracing subscriber is already installed")]
    SubscriberAlreadySet,
}

/// Install a stderr subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_DIRECTIVES`].
pub fn init() -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}
