//! pipeline/outcome.rs
//! Results and caller callbacks of one write or read.
use crate::pipeline::progress::ProgressCallback;
use crate::telemetry::TelemetrySnapshot;
use crate::types::FileResult;

#[derive(Clone, Debug)]
pub struct WriteOutcome {
    pub result: FileResult,
    pub telemetry: TelemetrySnapshot,
}

#[derive(Clone, Debug)]
pub struct ReadOutcome<T> {
    pub result: FileResult,
    /// Present only when `result` is `Ok`.
    pub value: Option<T>,
    /// Schema version from the header, when it could be parsed.
    pub version: Option<i32>,
    pub telemetry: TelemetrySnapshot,
}

impl<T> ReadOutcome<T> {
    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

/// Optional progress and completion hooks.
///
/// Progress values are non-decreasing and end with exactly one 1.0; the
/// completion hook then fires exactly once, whatever the result.
pub struct Callbacks<'a, O> {
    pub(crate) on_progress: Option<ProgressCallback<'a>>,
    pub(crate) on_complete: Option<Box<dyn FnOnce(&O) + Send + 'a>>,
}

impl<'a, O> Callbacks<'a, O> {
    pub fn none() -> Self {
        Self { on_progress: None, on_complete: None }
    }

    pub fn on_progress(mut self, f: impl FnMut(f32) + Send + 'a) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce(&O) + Send + 'a) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl<'a, O> Default for Callbacks<'a, O> {
    fn default() -> Self {
        Self::none()
    }
}
