//! Step-based mutation progress.
//!
//! Progress moves between fixed milestones. While a step's request is in
//! flight, [`Progress::advance`] may creep the value toward the step's
//! ceiling for display, but only [`Progress::finish_step`] moves it onto the
//! next milestone. The value never decreases except through [`Progress::reset`].
//!
//! State is published on a [`tokio::sync::watch`] channel so a renderer can
//! observe it without holding a reference to the workflow.

use tokio::sync::watch;

/// Fixed progress values reached when a step completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Milestone {
    /// Nothing in flight.
    Idle,
    /// Validation passed, first request about to start.
    Initializing,
    /// Attachment stored.
    Uploaded,
    /// Record written.
    Complete,
}

impl Milestone {
    /// Percentage for this milestone.
    #[must_use]
    pub const fn value(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Initializing => 10,
            Self::Uploaded => 70,
            Self::Complete => 100,
        }
    }
}

/// A network step with a display ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Attachment upload.
    Upload,
    /// Record create, update or delete.
    Write,
}

impl Step {
    /// Highest value cosmetic interpolation may show during this step.
    #[must_use]
    pub const fn ceiling(&self) -> u8 {
        match self {
            Self::Upload => 65,
            Self::Write => 95,
        }
    }
}

/// Observable progress value and status label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Percentage, 0 to 100.
    pub value: u8,
    /// Text describing the current step.
    pub label: String,
    ceiling: u8,
}

impl ProgressSnapshot {
    /// Inputs and dismissal are locked while this is true.
    #[must_use]
    pub fn busy(&self) -> bool {
        self.value > 0
    }

    /// Fraction in `0.0..=1.0` for progress bars.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        f32::from(self.value) / 100.0
    }
}

/// Progress state machine for one workflow.
#[derive(Debug)]
pub struct Progress {
    tx: watch::Sender<ProgressSnapshot>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Idle progress.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ProgressSnapshot::default());
        Self { tx }
    }

    /// Observe future changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.tx.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.tx.borrow().clone()
    }

    /// Current percentage.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.tx.borrow().value
    }

    /// Whether a mutation is in flight.
    #[must_use]
    pub fn busy(&self) -> bool {
        self.tx.borrow().busy()
    }

    /// Enter [`Milestone::Initializing`].
    pub fn begin(&self, label: impl Into<String>) {
        self.finish_step(Milestone::Initializing, label);
    }

    /// Start a network step: relabel and set its ceiling.
    pub fn start_step(&self, step: Step, label: impl Into<String>) {
        let label = label.into();
        self.tx.send_modify(|state| {
            state.label = label;
            state.ceiling = step.ceiling();
        });
    }

    /// Cosmetic creep toward the current ceiling, stopping one short of it.
    pub fn advance(&self, amount: u8) {
        self.tx.send_if_modified(|state| {
            let limit = state.ceiling.saturating_sub(1);
            let next = state.value.saturating_add(amount).min(limit);
            if next > state.value {
                state.value = next;
                true
            } else {
                false
            }
        });
    }

    /// Snap to `milestone`. Never moves backwards.
    pub fn finish_step(&self, milestone: Milestone, label: impl Into<String>) {
        let label = label.into();
        self.tx.send_modify(|state| {
            state.value = state.value.max(milestone.value());
            state.ceiling = state.value;
            state.label = label;
        });
    }

    /// Back to idle (0, empty label).
    pub fn reset(&self) {
        self.tx.send_replace(ProgressSnapshot::default());
    }
}
