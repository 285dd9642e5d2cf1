// Copyright 2024-2025 Irreducible Inc.

use tracing::span;
use tracing_subscriber::registry::LookupSpan;

use crate::errors::err_msg;

/// Perform operation with mutable span storage value.
///
/// Spans without storage of type `T` were not selected by the layer, so a
/// missing value is not an error and yields `None`.
pub fn with_span_storage_mut<T, S, R>(
    id: &span::Id,
    ctx: &tracing_subscriber::layer::Context<'_, S>,
    f: impl FnOnce(&mut T) -> R,
) -> Option<R>
where
    T: 'static,
    S: tracing::Subscriber,
    for<'lookup> S: LookupSpan<'lookup>,
{
    let Some(span) = ctx.span(id) else {
        err_msg!("failed to get span");
        return None;
    };

    let mut extensions = span.extensions_mut();
    extensions.get_mut::<T>().map(f)
}
