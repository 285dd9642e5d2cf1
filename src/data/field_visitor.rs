// Copyright 2024 Ulvetanna Inc.

use tracing::field::{Field, Visit};

/// Name of the span field that marks a span as a unit of per-thread work.
pub const THREAD_ID_FIELD: &str = "thread_id";

/// Picks the `thread_id` field out of a span's attributes.
#[derive(Debug, Default)]
pub struct ThreadIdVisitor(pub Option<usize>);

impl Visit for ThreadIdVisitor {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == THREAD_ID_FIELD {
            self.0 = usize::try_from(value).ok();
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == THREAD_ID_FIELD {
            self.0 = usize::try_from(value).ok();
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == THREAD_ID_FIELD {
            self.0 = value.parse().ok();
        }
    }

    fn record_debug(&mut self, _: &Field, _: &dyn std::fmt::Debug) {}
}
