//! Single-slot alert state with typed action continuations.
//!
//! Each rendering scope (a page, or a modal stacked above it) owns one
//! [`AlertChannel`]. Showing an alert replaces whatever was visible; there is
//! no queue. Action buttons carry a continuation value of type `A` which
//! [`AlertChannel::activate`] hands back to the owner instead of running a
//! callback, so the owner decides how to resume (e.g. a confirmed delete).

use std::fmt;

/// Alert severity, which also drives the default button style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AlertKind {
    /// Neutral information.
    #[default]
    Info,
    /// A completed operation.
    Success,
    /// Local validation failure or a confirmation prompt.
    Warning,
    /// A failed request.
    Danger,
}

impl AlertKind {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Button style of an alert action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionStyle {
    /// Muted button, used for Cancel.
    Secondary,
    /// Styled like an alert of the given kind.
    Kind(AlertKind),
}

impl From<AlertKind> for ActionStyle {
    fn from(kind: AlertKind) -> Self {
        Self::Kind(kind)
    }
}

/// One button of an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertAction<A> {
    /// Button label.
    pub label: String,
    /// Button style.
    pub style: ActionStyle,
    /// Continuation handed back on activation. `None` only dismisses.
    pub on_activate: Option<A>,
    /// Whether activating also dismisses the alert.
    pub close_on_activate: bool,
}

impl<A> AlertAction<A> {
    /// A button that only dismisses.
    pub fn dismiss(label: impl Into<String>, style: impl Into<ActionStyle>) -> Self {
        Self {
            label: label.into(),
            style: style.into(),
            on_activate: None,
            close_on_activate: true,
        }
    }

    /// A button that hands back `continuation` and then dismisses.
    pub fn continue_with(
        label: impl Into<String>,
        style: impl Into<ActionStyle>,
        continuation: A,
    ) -> Self {
        Self {
            label: label.into(),
            style: style.into(),
            on_activate: Some(continuation),
            close_on_activate: true,
        }
    }

    /// Keep the alert open after activation.
    #[must_use]
    pub fn keep_open(mut self) -> Self {
        self.close_on_activate = false;
        self
    }

    /// Convert the continuation type.
    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> AlertAction<B> {
        AlertAction {
            label: self.label,
            style: self.style,
            on_activate: self.on_activate.map(f),
            close_on_activate: self.close_on_activate,
        }
    }
}

/// Title used when none is supplied.
pub const DEFAULT_TITLE: &str = "Notice";

/// A visible alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert<A> {
    /// Severity.
    pub kind: AlertKind,
    /// Heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Buttons, never empty.
    pub actions: Vec<AlertAction<A>>,
}

impl<A> Alert<A> {
    /// Build an alert. Without actions it gets a single "Close" button of its own kind.
    pub fn new(
        kind: AlertKind,
        message: impl Into<String>,
        actions: Vec<AlertAction<A>>,
        title: Option<String>,
    ) -> Self {
        let actions = if actions.is_empty() {
            vec![AlertAction::dismiss("Close", kind)]
        } else {
            actions
        };
        Self {
            kind,
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            message: message.into(),
            actions,
        }
    }

    /// Alert with the default Close button.
    pub fn simple(kind: AlertKind, message: impl Into<String>) -> Self {
        Self::new(kind, message, Vec::new(), None)
    }
}

/// Where an alert renders. Modal alerts stack above page alerts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlertSurface {
    /// The list page.
    #[default]
    Page,
    /// A modal dialog opened over the page.
    Modal,
}

impl AlertSurface {
    /// Stacking order; higher renders on top.
    #[must_use]
    pub const fn z_index(&self) -> u8 {
        match self {
            Self::Page => 10,
            Self::Modal => 20,
        }
    }
}

/// Capability for raising alerts, injected into controllers and workflows.
pub trait AlertSink<A> {
    /// Replace the visible alert.
    fn show(&mut self, alert: Alert<A>);

    /// Show `message` with the default Close button.
    fn notify(&mut self, kind: AlertKind, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.show(Alert::simple(kind, message));
    }
}

/// One scope's alert slot.
#[derive(Debug, Clone)]
pub struct AlertChannel<A> {
    surface: AlertSurface,
    current: Option<Alert<A>>,
}

impl<A> Default for AlertChannel<A> {
    fn default() -> Self {
        Self::new(AlertSurface::Page)
    }
}

impl<A> AlertChannel<A> {
    /// Empty channel rendering on `surface`.
    #[must_use]
    pub fn new(surface: AlertSurface) -> Self {
        Self {
            surface,
            current: None,
        }
    }

    /// Surface this channel renders on.
    #[must_use]
    pub fn surface(&self) -> AlertSurface {
        self.surface
    }

    /// Replace the visible alert.
    pub fn show_alert(
        &mut self,
        kind: AlertKind,
        message: impl Into<String>,
        actions: Vec<AlertAction<A>>,
        title: Option<String>,
    ) {
        self.current = Some(Alert::new(kind, message, actions, title));
    }

    /// Hide the visible alert.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// The visible alert.
    #[must_use]
    pub fn current(&self) -> Option<&Alert<A>> {
        self.current.as_ref()
    }

    /// Whether an alert is visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    /// Take the visible alert, leaving the slot empty.
    pub fn take(&mut self) -> Option<Alert<A>> {
        self.current.take()
    }
}

impl<A: Clone> AlertChannel<A> {
    /// Press the button at `index`.
    ///
    /// Returns the button's continuation, if any. A button without one always
    /// dismisses; one with a continuation dismisses when `close_on_activate`.
    /// Out-of-range indices do nothing.
    pub fn activate(&mut self, index: usize) -> Option<A> {
        let action = self.current.as_ref()?.actions.get(index)?;
        let continuation = action.on_activate.clone();
        if continuation.is_none() || action.close_on_activate {
            self.current = None;
        }
        continuation
    }
}

impl<A> AlertSink<A> for AlertChannel<A> {
    fn show(&mut self, alert: Alert<A>) {
        self.current = Some(alert);
    }
}
