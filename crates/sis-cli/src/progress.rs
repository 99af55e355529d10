//! Terminal progress bar fed from a workflow's progress channel.

use indicatif::{ProgressBar, ProgressStyle};
use sis_core::ProgressSnapshot;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const TEMPLATE: &str = "[{bar:30}] {pos:>3}% {msg}";

/// A progress bar that mirrors [`ProgressSnapshot`] updates until finished.
pub struct ProgressDisplay {
    bar: ProgressBar,
    task: JoinHandle<()>,
}

impl ProgressDisplay {
    /// Start mirroring `rx`. A hidden bar still drains the channel.
    pub fn spawn(mut rx: watch::Receiver<ProgressSnapshot>, visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(100)
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);

        let handle = bar.clone();
        let task = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                handle.set_position(u64::from(snapshot.value));
                handle.set_message(snapshot.label);
            }
        });
        Self { bar, task }
    }

    /// Stop mirroring and clear the bar.
    pub fn finish(self) {
        self.task.abort();
        self.bar.finish_and_clear();
    }
}
