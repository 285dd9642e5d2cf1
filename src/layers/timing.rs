// Copyright 2024-2025 Irreducible Inc.

use std::sync::Arc;

use tracing::span;
use tracing_subscriber::registry::LookupSpan;

use crate::{
    clock::now_seconds,
    data::{with_span_storage_mut, ThreadIdVisitor, ThreadSpan},
    recorder::Recorder,
};

/// TimingLayer (internally called layer::timing)
/// This Layer feeds a [`Recorder`] from spans. Every span carrying a `thread_id`
/// field produces one sample per enter/exit pair; all other spans are ignored.
/// The field may also be recorded after the span was created.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use thread_timing::{Recorder, TimingLayer};
/// use tracing::debug_span;
/// use tracing_subscriber::prelude::*;
///
/// let recorder = Arc::new(Recorder::default());
/// tracing_subscriber::registry()
///     .with(TimingLayer::new(recorder.clone()))
///     .init();
///
/// recorder.begin_run(1);
/// debug_span!("render rows", thread_id = 0).in_scope(|| { /* work */ });
/// recorder.end_run();
/// ```
pub struct Layer {
    recorder: Arc<Recorder>,
}

impl Layer {
    pub fn new(recorder: Arc<Recorder>) -> Self {
        Self { recorder }
    }
}

impl<S> tracing_subscriber::Layer<S> for Layer
where
    S: tracing::Subscriber,
    S: for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &span::Attributes<'_>,
        id: &span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = ThreadIdVisitor::default();
        attrs.record(&mut visitor);
        let Some(thread_id) = visitor.0 else {
            return;
        };

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(ThreadSpan::new(thread_id));
        }
    }

    fn on_record(
        &self,
        id: &span::Id,
        values: &span::Record<'_>,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = ThreadIdVisitor::default();
        values.record(&mut visitor);
        let Some(thread_id) = visitor.0 else {
            return;
        };

        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<ThreadSpan>() {
            Some(storage) => storage.thread_id = thread_id,
            None => extensions.insert(ThreadSpan::new(thread_id)),
        }
    }

    fn on_enter(&self, id: &span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let thread = std::thread::current().id();
        with_span_storage_mut(id, &ctx, |storage: &mut ThreadSpan| {
            storage.enter(thread, now_seconds());
        });
    }

    fn on_exit(&self, id: &span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let end_seconds = now_seconds();
        let thread = std::thread::current().id();
        let started = with_span_storage_mut(id, &ctx, |storage: &mut ThreadSpan| {
            storage
                .exit(thread)
                .map(|start_seconds| (storage.thread_id, start_seconds))
        })
        .flatten();

        if let Some((thread_id, start_seconds)) = started {
            self.recorder
                .record_sample(thread_id, start_seconds, end_seconds);
        }
    }
}

#[cfg(all(test, feature = "enabled"))]
mod tests {
    use std::{fs, path::Path, sync::Barrier};

    use tracing::{debug_span, field};
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;
    use crate::{reader::TimingLog, recorder::Config};

    fn recorder(path: &Path) -> Arc<Recorder> {
        Arc::new(Recorder::new(
            Config::default()
                .with_output_path(path)
                .with_label("layer"),
        ))
    }

    #[test]
    fn thread_spans_become_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layer.csv");
        let recorder = recorder(&path);
        let subscriber = tracing_subscriber::registry().with(Layer::new(recorder.clone()));

        tracing::subscriber::with_default(subscriber, || {
            recorder.begin_run(2);
            for thread_id in 0..2_u64 {
                let _scope = debug_span!("tile", thread_id).entered();
                std::thread::sleep(std::time::Duration::from_millis(2));
            }
            // no thread_id, not recorded
            debug_span!("setup").in_scope(|| {});
            recorder.end_run();
        });

        let log = TimingLog::load(&path).unwrap();
        let run = log.run(None).unwrap();
        assert_eq!(run.label(), "layer");
        assert_eq!(run.rows().len(), 2);
        assert!(run.rows().iter().all(|row| row.duration_ms >= 1.5));
    }

    #[test]
    fn late_thread_id_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let recorder = recorder(&path);
        let subscriber = tracing_subscriber::registry().with(Layer::new(recorder.clone()));

        tracing::subscriber::with_default(subscriber, || {
            recorder.begin_run(1);
            let span = debug_span!("tile", thread_id = field::Empty);
            span.record("thread_id", 5_u64);
            span.in_scope(|| {});
            span.in_scope(|| {});
            recorder.end_run();
        });

        let content = fs::read_to_string(&path).unwrap();
        let rows: Vec<_> = content.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.starts_with("1,layer,1,5,")));
    }

    #[test]
    fn span_entered_on_several_threads_at_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.csv");
        let recorder = recorder(&path);
        let dispatch =
            tracing::Dispatch::new(tracing_subscriber::registry().with(Layer::new(recorder.clone())));
        let span =
            tracing::dispatcher::with_default(&dispatch, || debug_span!("band", thread_id = 0_u64));

        recorder.begin_run(4);
        let barrier = Barrier::new(4);
        std::thread::scope(|s| {
            for _ in 0..4 {
                let span = span.clone();
                let barrier = &barrier;
                s.spawn(move || {
                    let _entered = span.enter();
                    barrier.wait();
                });
            }
        });

        assert_eq!(recorder.try_end_run().unwrap(), 4);
    }
}
