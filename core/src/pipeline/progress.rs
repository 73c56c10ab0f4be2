//! pipeline/progress.rs
//! Aggregates stage-local progress into one monotonic 0..1 signal.
//!
//! value = (local + completed) / active_stages, clamped to [0, 1].
//! Only increases are forwarded, intermediate values stay below 1.0, and
//! `finish` emits the single 1.0.

/// Boxed user progress callback.
pub type ProgressCallback<'a> = Box<dyn FnMut(f32) + Send + 'a>;

pub struct ProgressTracker<'a> {
    sink: Option<ProgressCallback<'a>>,
    active: usize,
    completed: usize,
    last: Option<f32>,
    finished: bool,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(active_stages: usize, sink: Option<ProgressCallback<'a>>) -> Self {
        Self {
            sink,
            active: active_stages.max(1),
            completed: 0,
            last: None,
            finished: false,
        }
    }

    /// Number of stages that contribute to the denominator.
    pub fn active_stages(&self) -> usize {
        self.active
    }

    /// Re-plan the denominator once the real stage set is known.
    /// Values that would move backwards are swallowed.
    pub fn set_active_stages(&mut self, active_stages: usize) {
        self.active = active_stages.max(self.completed + 1).max(1);
    }

    /// Emit the initial 0.0.
    pub fn start(&mut self) {
        self.emit(0.0);
    }

    /// Local progress of the current stage; ignored for identity stages.
    pub fn update(&mut self, active: bool, local: f32) {
        if !active {
            return;
        }
        let local = if local.is_finite() { local.clamp(0.0, 1.0) } else { 0.0 };
        let value = ((self.completed as f32 + local) / self.active as f32).clamp(0.0, 1.0);
        self.emit(value);
    }

    /// Close the current stage.
    pub fn stage_done(&mut self, active: bool) {
        if active && self.completed < self.active {
            self.completed += 1;
        }
    }

    /// Emit the terminal 1.0, once.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.last = Some(1.0);
        if let Some(sink) = self.sink.as_mut() {
            sink(1.0);
        }
    }

    pub fn last(&self) -> Option<f32> {
        self.last
    }

    fn emit(&mut self, value: f32) {
        if self.finished || value >= 1.0 {
            return;
        }
        if matches!(self.last, Some(prev) if value <= prev) {
            return;
        }
        self.last = Some(value);
        if let Some(sink) = self.sink.as_mut() {
            sink(value);
        }
    }
}
