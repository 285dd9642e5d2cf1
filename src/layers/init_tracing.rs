// Copyright 2024-2025 Irreducible Inc.

use std::sync::Arc;

use cfg_if::cfg_if;
use tracing::{level_filters::LevelFilter, Subscriber};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::{filter::Filtered, Layer};

use crate::{errors::Error, global, recorder::Recorder};

trait WithEnvFilter<S: Subscriber>: Layer<S> + Sized {
    fn with_env_filter(self) -> Filtered<Self, EnvFilter, S> {
        let env_level_filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::DEBUG.into())
            .from_env_lossy();

        self.with_filter(env_level_filter)
    }
}

impl<S: Subscriber, T: Layer<S>> WithEnvFilter<S> for T {}

/// Installs a [`TimingLayer`] feeding the process-wide recorder as the global subscriber.
///
/// Spans are filtered with `RUST_LOG`, defaulting to `debug`. Fails if a
/// global subscriber is already set. Without the `enabled` feature nothing is
/// installed.
pub fn init_tracing() -> Result<(), Error> {
    init_tracing_with(global::recorder().clone())
}

/// Same as [`init_tracing`] for a recorder owned by the caller.
pub fn init_tracing_with(recorder: Arc<Recorder>) -> Result<(), Error> {
    cfg_if! {
        if #[cfg(feature = "enabled")] {
            use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

            tracing_subscriber::registry()
                .with(crate::TimingLayer::new(recorder).with_env_filter())
                .try_init()?;
        } else {
            drop(recorder);
        }
    }

    Ok(())
}
