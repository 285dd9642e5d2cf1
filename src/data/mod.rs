// Copyright 2024-2025 Irreducible Inc.

mod field_visitor;
mod row;
mod run_state;
mod sample;
mod span_metadata;
mod storage_utils;

pub(crate) use field_visitor::ThreadIdVisitor;
pub use row::{quote_style, RowRef, TimingRow};
pub(crate) use run_state::{RunSnapshot, RunState};
pub use sample::Sample;
pub(crate) use span_metadata::ThreadSpan;
pub(crate) use storage_utils::with_span_storage_mut;
