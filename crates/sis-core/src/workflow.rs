//! Multi-step create/update/delete with progress, confirmation and attachments.
//!
//! A [`MutationWorkflow`] runs at most one mutation at a time. Each attempt
//! validates locally first (a failure raises a warning alert and sends
//! nothing), then walks the network steps while publishing [`Progress`]. On
//! success it raises a success alert, holds 100% for the completion delay and
//! returns [`WorkflowOutcome::Completed`]; the caller then hands the
//! [`MutationKind`] to the list controller's `apply_mutation`. On failure
//! progress resets and a danger alert carries the reason.
//!
//! Destructive actions are two-step: [`MutationWorkflow::request_delete`] only
//! raises a prompt whose "Delete" button carries a [`Confirmation`]. Nothing is
//! sent until that token comes back through [`MutationWorkflow::resolve`].

use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sis_client::{ClientError, ObjectStore, RecordWriter, extension_for, object_key};
use sis_model::{Entity, NewStudent, StudentUpdate, Validate, ValidationError};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::alert::{ActionStyle, Alert, AlertAction, AlertKind, AlertSink};
use crate::controller::MutationKind;
use crate::error::WorkflowError;
use crate::progress::{Milestone, Progress, ProgressSnapshot, Step};

/// How long 100% stays up before the modal may close.
pub const COMPLETION_DELAY: Duration = Duration::from_millis(1000);

/// Interval of the cosmetic progress creep.
pub const PROGRESS_TICK: Duration = Duration::from_millis(100);

const PROGRESS_INCREMENT: u8 = 5;

/// Largest attachment accepted by default (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types accepted by default.
pub const DEFAULT_ALLOWED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Attachment limits checked before any upload starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Accepted MIME types, lowercase.
    pub allowed_mime_types: Vec<String>,
    /// Inclusive size limit in bytes.
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|mime| (*mime).to_string())
                .collect(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Reject attachments of a disallowed type or over the size limit.
    pub fn check(&self, attachment: &FileAttachment) -> Result<(), ValidationError> {
        let content_type = attachment.content_type.trim().to_ascii_lowercase();
        if !self.allowed_mime_types.contains(&content_type) {
            return Err(ValidationError::DisallowedFileType {
                content_type,
                allowed: self.allowed_mime_types.clone(),
            });
        }
        let size = attachment.size();
        if size > self.max_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// A file picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// Original file name, for logs.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    /// Wrap file contents.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Storage extension for the MIME type.
    #[must_use]
    pub fn extension(&self) -> Option<&'static str> {
        extension_for(&self.content_type)
    }
}

impl std::fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Payloads that reference a stored attachment.
pub trait AttachmentTarget {
    /// Identifier the object key is derived from.
    fn attachment_owner(&self) -> &str;

    /// Record the stored object's path.
    fn set_attachment_path(&mut self, path: String);
}

impl AttachmentTarget for NewStudent {
    fn attachment_owner(&self) -> &str {
        &self.id_number
    }

    fn set_attachment_path(&mut self, path: String) {
        self.image_path = Some(path);
    }
}

impl AttachmentTarget for StudentUpdate {
    fn attachment_owner(&self) -> &str {
        &self.id_number
    }

    fn set_attachment_path(&mut self, path: String) {
        self.new_image_path = Some(path);
    }
}

#[derive(Debug, Clone)]
enum Pending<E: Entity> {
    Update(E::Update),
    Delete { key: E::Key },
}

/// Proof that the user confirmed a prompt.
///
/// Only [`MutationWorkflow::request_delete`] and
/// [`MutationWorkflow::request_update`] create these; they travel as the
/// continuation of the prompt's confirm button.
#[derive(Debug, Clone)]
pub struct Confirmation<E: Entity> {
    pending: Pending<E>,
    label: String,
}

impl<E: Entity> Confirmation<E> {
    /// Which mutation this confirms.
    #[must_use]
    pub fn kind(&self) -> MutationKind {
        match self.pending {
            Pending::Update(_) => MutationKind::Update,
            Pending::Delete { .. } => MutationKind::Delete,
        }
    }

    /// Label of the record the prompt named.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// How a workflow call ended.
#[derive(Debug)]
pub enum WorkflowOutcome {
    /// The write was confirmed by the backend.
    Completed(MutationKind),
    /// Another mutation of this workflow is in flight; nothing was done.
    Busy,
    /// A confirmation prompt is showing; nothing was sent.
    AwaitingConfirmation,
    /// Validation or a request failed; an alert was raised.
    Aborted(WorkflowError),
}

impl WorkflowOutcome {
    /// The completed mutation, if any.
    #[must_use]
    pub fn completed(&self) -> Option<MutationKind> {
        match self {
            Self::Completed(kind) => Some(*kind),
            _ => None,
        }
    }
}

struct InFlight<'a> {
    flag: &'a AtomicBool,
    progress: &'a Progress,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.progress.reset();
        self.flag.store(false, Ordering::Release);
    }
}

/// Create, update and delete for one entity, one at a time.
#[derive(Debug)]
pub struct MutationWorkflow<E: Entity> {
    progress: Progress,
    in_flight: AtomicBool,
    policy: UploadPolicy,
    completion_delay: Duration,
    tick: Duration,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for MutationWorkflow<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MutationWorkflow<E> {
    /// Idle workflow with the default upload policy and delays.
    #[must_use]
    pub fn new() -> Self {
        Self {
            progress: Progress::new(),
            in_flight: AtomicBool::new(false),
            policy: UploadPolicy::default(),
            completion_delay: COMPLETION_DELAY,
            tick: PROGRESS_TICK,
            _entity: PhantomData,
        }
    }

    /// Override the attachment policy.
    #[must_use]
    pub fn with_upload_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the hold time at 100%.
    #[must_use]
    pub fn with_completion_delay(mut self, delay: Duration) -> Self {
        self.completion_delay = delay;
        self
    }

    /// Override the progress creep interval. Zero disables creeping.
    #[must_use]
    pub fn with_progress_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// The attachment policy.
    #[must_use]
    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Current progress.
    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// Observe progress changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress.subscribe()
    }

    /// Whether inputs and dismissal should be locked.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate and create a record.
    pub async fn submit_create<W, A, S>(
        &self,
        payload: &E::Create,
        writer: &W,
        alerts: &mut S,
    ) -> WorkflowOutcome
    where
        W: RecordWriter<E>,
        S: AlertSink<A>,
    {
        let Some(_guard) = self.try_begin() else {
            return WorkflowOutcome::Busy;
        };
        if let Err(err) = payload.validate() {
            return self.abort(MutationKind::Create, err.into(), alerts);
        }
        self.progress.begin("Initializing...");
        let result = self
            .animate(Step::Write, self.write_label(MutationKind::Create), writer.create(payload))
            .await;
        self.settle(MutationKind::Create, result, alerts).await
    }

    /// Validate and update a record, without a prompt.
    pub async fn submit_update<W, A, S>(
        &self,
        payload: &E::Update,
        writer: &W,
        alerts: &mut S,
    ) -> WorkflowOutcome
    where
        W: RecordWriter<E>,
        S: AlertSink<A>,
    {
        let Some(_guard) = self.try_begin() else {
            return WorkflowOutcome::Busy;
        };
        self.run_update(payload, writer, alerts).await
    }

    /// Check the attachment, upload it, then create the record referencing it.
    ///
    /// If the record write fails the uploaded object is removed again.
    pub async fn submit_create_with_attachment<W, O, A, S>(
        &self,
        mut payload: E::Create,
        attachment: FileAttachment,
        writer: &W,
        store: &O,
        alerts: &mut S,
    ) -> WorkflowOutcome
    where
        E::Create: AttachmentTarget,
        W: RecordWriter<E>,
        O: ObjectStore,
        S: AlertSink<A>,
    {
        let Some(_guard) = self.try_begin() else {
            return WorkflowOutcome::Busy;
        };
        if let Err(err) = payload.validate().and_then(|()| self.policy.check(&attachment)) {
            return self.abort(MutationKind::Create, err.into(), alerts);
        }
        self.progress.begin("Initializing...");

        let key = attachment_key::<E>(payload.attachment_owner(), &attachment);
        let stored = match self.upload(&key, attachment, store).await {
            Ok(stored) => stored,
            Err(err) => return self.abort(MutationKind::Create, err.into(), alerts),
        };
        payload.set_attachment_path(stored.clone());

        let result = self
            .animate(Step::Write, self.write_label(MutationKind::Create), writer.create(&payload))
            .await;
        if result.is_err() {
            discard_object(store, &stored).await;
        }
        self.settle(MutationKind::Create, result, alerts).await
    }

    /// Check the attachment, upload it, update the record, then drop the
    /// previous object if it lived under a different path.
    pub async fn submit_update_with_attachment<W, O, A, S>(
        &self,
        mut payload: E::Update,
        attachment: FileAttachment,
        previous_path: Option<&str>,
        writer: &W,
        store: &O,
        alerts: &mut S,
    ) -> WorkflowOutcome
    where
        E::Update: AttachmentTarget,
        W: RecordWriter<E>,
        O: ObjectStore,
        S: AlertSink<A>,
    {
        let Some(_guard) = self.try_begin() else {
            return WorkflowOutcome::Busy;
        };
        if let Err(err) = payload.validate().and_then(|()| self.policy.check(&attachment)) {
            return self.abort(MutationKind::Update, err.into(), alerts);
        }
        self.progress.begin("Initializing...");

        let key = attachment_key::<E>(payload.attachment_owner(), &attachment);
        let stored = match self.upload(&key, attachment, store).await {
            Ok(stored) => stored,
            Err(err) => return self.abort(MutationKind::Update, err.into(), alerts),
        };
        payload.set_attachment_path(stored.clone());

        let result = self
            .animate(Step::Write, self.write_label(MutationKind::Update), writer.update(&payload))
            .await;
        if result.is_ok()
            && let Some(previous) = previous_path.filter(|old| !old.is_empty() && *old != stored)
        {
            discard_object(store, previous).await;
        }
        self.settle(MutationKind::Update, result, alerts).await
    }

    /// Show the delete prompt. Nothing is sent until the confirmation is resolved.
    pub fn request_delete<A, S>(&self, key: E::Key, label: &str, alerts: &mut S) -> WorkflowOutcome
    where
        A: From<Confirmation<E>>,
        S: AlertSink<A>,
    {
        if self.is_busy() {
            return WorkflowOutcome::Busy;
        }
        let confirmation = Confirmation {
            pending: Pending::Delete { key },
            label: label.to_string(),
        };
        alerts.show(Alert::new(
            AlertKind::Warning,
            format!(
                "Are you sure you want to delete {} {label}? This action cannot be undone.",
                E::DISPLAY_NAME.to_lowercase()
            ),
            vec![
                AlertAction::dismiss("Cancel", ActionStyle::Secondary),
                AlertAction::continue_with("Delete", AlertKind::Danger, A::from(confirmation)),
            ],
            Some("Confirm Deletion".to_string()),
        ));
        WorkflowOutcome::AwaitingConfirmation
    }

    /// Validate an update and show its confirmation prompt.
    pub fn request_update<A, S>(
        &self,
        payload: E::Update,
        label: &str,
        alerts: &mut S,
    ) -> WorkflowOutcome
    where
        A: From<Confirmation<E>>,
        S: AlertSink<A>,
    {
        if self.is_busy() {
            return WorkflowOutcome::Busy;
        }
        if let Err(err) = payload.validate() {
            return self.abort(MutationKind::Update, err.into(), alerts);
        }
        let confirmation = Confirmation {
            pending: Pending::Update(payload),
            label: label.to_string(),
        };
        alerts.show(Alert::new(
            AlertKind::Warning,
            format!(
                "Are you sure you want to update {} {label}?",
                E::DISPLAY_NAME.to_lowercase()
            ),
            vec![
                AlertAction::dismiss("Cancel", ActionStyle::Secondary),
                AlertAction::continue_with("Update", AlertKind::Info, A::from(confirmation)),
            ],
            Some("Confirm Update".to_string()),
        ));
        WorkflowOutcome::AwaitingConfirmation
    }

    /// Carry out a confirmed prompt.
    pub async fn resolve<W, A, S>(
        &self,
        confirmation: Confirmation<E>,
        writer: &W,
        alerts: &mut S,
    ) -> WorkflowOutcome
    where
        W: RecordWriter<E>,
        S: AlertSink<A>,
    {
        let Some(_guard) = self.try_begin() else {
            return WorkflowOutcome::Busy;
        };
        tracing::debug!(entity = E::PATH, label = %confirmation.label, kind = ?confirmation.kind(), "confirmed");
        match confirmation.pending {
            Pending::Update(payload) => self.run_update(&payload, writer, alerts).await,
            Pending::Delete { key } => {
                self.progress.begin("Initializing...");
                let result = self
                    .animate(Step::Write, self.write_label(MutationKind::Delete), writer.delete(&key))
                    .await;
                self.settle(MutationKind::Delete, result, alerts).await
            }
        }
    }

    // ------------------------------------------------------------------
    // Steps
    // ------------------------------------------------------------------

    fn try_begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight {
                flag: &self.in_flight,
                progress: &self.progress,
            })
    }

    async fn run_update<W, A, S>(
        &self,
        payload: &E::Update,
        writer: &W,
        alerts: &mut S,
    ) -> WorkflowOutcome
    where
        W: RecordWriter<E>,
        S: AlertSink<A>,
    {
        if let Err(err) = payload.validate() {
            return self.abort(MutationKind::Update, err.into(), alerts);
        }
        self.progress.begin("Initializing...");
        let result = self
            .animate(Step::Write, self.write_label(MutationKind::Update), writer.update(payload))
            .await;
        self.settle(MutationKind::Update, result, alerts).await
    }

    async fn upload<O: ObjectStore>(
        &self,
        key: &str,
        attachment: FileAttachment,
        store: &O,
    ) -> Result<String, ClientError> {
        tracing::debug!(entity = E::PATH, key, file = %attachment.file_name, size = attachment.size(), "uploading attachment");
        let FileAttachment {
            content_type, bytes, ..
        } = attachment;
        let stored = self
            .animate(Step::Upload, "Uploading image...".to_string(), store.upload(key, bytes, &content_type))
            .await?;
        self.progress.finish_step(Milestone::Uploaded, "Image uploaded");
        Ok(stored)
    }

    /// Await `step` while creeping progress toward its ceiling.
    async fn animate<F: Future>(&self, step: Step, label: String, step_future: F) -> F::Output {
        self.progress.start_step(step, label);
        if self.tick.is_zero() {
            return step_future.await;
        }
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(step_future);
        loop {
            tokio::select! {
                biased;
                output = &mut step_future => return output,
                _ = ticker.tick() => self.progress.advance(PROGRESS_INCREMENT),
            }
        }
    }

    async fn settle<A, S: AlertSink<A>>(
        &self,
        kind: MutationKind,
        result: Result<String, ClientError>,
        alerts: &mut S,
    ) -> WorkflowOutcome {
        match result {
            Ok(message) => {
                self.progress.finish_step(Milestone::Complete, "Done");
                tracing::info!(entity = E::PATH, ?kind, "mutation completed");
                let message = if message.trim().is_empty() {
                    format!("{} {} successfully.", E::DISPLAY_NAME, kind.past_tense())
                } else {
                    message
                };
                alerts.notify(AlertKind::Success, message);
                tokio::time::sleep(self.completion_delay).await;
                self.progress.reset();
                WorkflowOutcome::Completed(kind)
            }
            Err(err) => self.abort(kind, err.into(), alerts),
        }
    }

    fn abort<A, S: AlertSink<A>>(
        &self,
        kind: MutationKind,
        err: WorkflowError,
        alerts: &mut S,
    ) -> WorkflowOutcome {
        self.progress.reset();
        let message = match &err {
            WorkflowError::Validation(_) => {
                tracing::warn!(entity = E::PATH, ?kind, error = %err, "mutation rejected locally");
                err.user_message()
            }
            WorkflowError::Client(ClientError::Rejected { message }) if message.trim().is_empty() => {
                tracing::error!(entity = E::PATH, ?kind, "mutation rejected without a message");
                failure_message(kind).to_string()
            }
            WorkflowError::Client(client) => {
                tracing::error!(entity = E::PATH, ?kind, error = %client, "mutation failed");
                err.user_message()
            }
        };
        alerts.notify(err.alert_kind(), message);
        WorkflowOutcome::Aborted(err)
    }

    fn write_label(&self, kind: MutationKind) -> String {
        let verb = match kind {
            MutationKind::Create => "Adding",
            MutationKind::Update => "Updating",
            MutationKind::Delete => "Deleting",
        };
        format!("{verb} {}...", E::DISPLAY_NAME.to_lowercase())
    }
}

fn attachment_key<E: Entity>(owner: &str, attachment: &FileAttachment) -> String {
    object_key(E::PATH, owner, attachment.extension().unwrap_or("bin"))
}

async fn discard_object<O: ObjectStore>(store: &O, key: &str) {
    if let Err(err) = store.remove(key).await {
        tracing::warn!(key, error = %err, "could not remove stored attachment");
    }
}

/// Alert text when the server refuses without saying why.
fn failure_message(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::Create => "Add failed.",
        MutationKind::Update => "Update failed.",
        MutationKind::Delete => "Delete failed.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sis_model::{College, CollegeKey, CollegeUpdate, NewCollege};
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use crate::alert::AlertChannel;

    #[derive(Default)]
    struct Writer {
        calls: AtomicUsize,
        reply: Mutex<Option<Result<String, ClientError>>>,
    }

    impl Writer {
        fn replying(reply: Result<String, ClientError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Mutex::new(Some(reply)),
            }
        }

        fn next(&self) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    impl RecordWriter<College> for Writer {
        async fn create(&self, _payload: &NewCollege) -> sis_client::Result<String> {
            self.next()
        }

        async fn update(&self, _payload: &CollegeUpdate) -> sis_client::Result<String> {
            self.next()
        }

        async fn delete(&self, _key: &CollegeKey) -> sis_client::Result<String> {
            self.next()
        }
    }

    fn new_college() -> NewCollege {
        NewCollege {
            college_code: "CCS".to_string(),
            college_name: "College of Computer Studies".to_string(),
        }
    }

    fn workflow() -> MutationWorkflow<College> {
        MutationWorkflow::new().with_completion_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let writer = Writer::default();
        let mut alerts = AlertChannel::<Confirmation<College>>::default();
        let outcome = workflow()
            .submit_create(&NewCollege::default(), &writer, &mut alerts)
            .await;

        assert!(matches!(outcome, WorkflowOutcome::Aborted(WorkflowError::Validation(_))));
        assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
        let alert = alerts.current().unwrap();
        assert_eq!(alert.kind, AlertKind::Warning);
        assert_eq!(
            alert.message,
            "Please fill in the required fields: College Code, College Name"
        );
    }

    #[tokio::test]
    async fn test_success_uses_server_message() {
        let writer = Writer::replying(Ok("College added successfully.".to_string()));
        let mut alerts = AlertChannel::<Confirmation<College>>::default();
        let workflow = workflow();
        let outcome = workflow.submit_create(&new_college(), &writer, &mut alerts).await;

        assert_eq!(outcome.completed(), Some(MutationKind::Create));
        assert_eq!(alerts.current().unwrap().kind, AlertKind::Success);
        assert_eq!(alerts.current().unwrap().message, "College added successfully.");
        assert_eq!(workflow.progress().value, 0);
        assert!(!workflow.is_busy());
    }

    #[tokio::test]
    async fn test_blank_rejection_falls_back() {
        let writer = Writer::replying(Err(ClientError::Rejected {
            message: String::new(),
        }));
        let mut alerts = AlertChannel::<Confirmation<College>>::default();
        let update = CollegeUpdate {
            college_code: "CCS".to_string(),
            new_college_name: "Computing".to_string(),
        };
        let outcome = workflow().submit_update(&update, &writer, &mut alerts).await;

        assert!(matches!(outcome, WorkflowOutcome::Aborted(_)));
        let alert = alerts.current().unwrap();
        assert_eq!(alert.kind, AlertKind::Danger);
        assert_eq!(alert.message, "Update failed.");
    }

    #[tokio::test]
    async fn test_delete_prompt_then_confirm() {
        let writer = Writer::default();
        let mut alerts = AlertChannel::<Confirmation<College>>::default();
        let workflow = workflow();
        let key = College::key_payload("CCS");

        let outcome = workflow.request_delete(key, "CCS", &mut alerts);
        assert!(matches!(outcome, WorkflowOutcome::AwaitingConfirmation));
        assert_eq!(writer.calls.load(Ordering::SeqCst), 0);

        let prompt = alerts.current().unwrap();
        assert_eq!(prompt.title, "Confirm Deletion");
        assert_eq!(
            prompt.message,
            "Are you sure you want to delete college CCS? This action cannot be undone."
        );
        assert_eq!(prompt.actions[0].label, "Cancel");
        assert_eq!(prompt.actions[0].style, ActionStyle::Secondary);
        assert_eq!(prompt.actions[1].style, ActionStyle::Kind(AlertKind::Danger));

        let confirmation = alerts.activate(1).unwrap();
        assert_eq!(confirmation.kind(), MutationKind::Delete);
        let outcome = workflow.resolve(confirmation, &writer, &mut alerts).await;
        assert_eq!(outcome.completed(), Some(MutationKind::Delete));
        assert_eq!(writer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(alerts.current().unwrap().message, "College deleted successfully.");
    }

    #[test]
    fn test_upload_policy_limits() {
        let policy = UploadPolicy::default();
        let png = FileAttachment::new("a.png", "image/PNG", vec![0; 10]);
        assert!(policy.check(&png).is_ok());
        assert_eq!(png.extension(), Some("png"));

        let pdf = FileAttachment::new("a.pdf", "application/pdf", vec![0; 10]);
        assert!(matches!(
            policy.check(&pdf),
            Err(ValidationError::DisallowedFileType { .. })
        ));

        let huge = FileAttachment::new("a.jpg", "image/jpeg", vec![0; 5 * 1024 * 1024 + 1]);
        let err = policy.check(&huge).unwrap_err();
        assert!(err.user_message().contains("5 MB"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_holds_at_complete_until_delay() {
        let writer = Writer::default();
        let workflow = MutationWorkflow::<College>::new();
        let mut rx = workflow.subscribe();
        let mut alerts = AlertChannel::<Confirmation<College>>::default();

        let college = new_college();
        let run = workflow.submit_create(&college, &writer, &mut alerts);
        tokio::pin!(run);

        let mut seen = Vec::new();
        loop {
            tokio::select! {
                outcome = &mut run => {
                    assert_eq!(outcome.completed(), Some(MutationKind::Create));
                    break;
                }
                Ok(()) = rx.changed() => seen.push(rx.borrow_and_update().value),
            }
        }
        assert!(seen.contains(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1] || w[1] == 0));
        assert_eq!(workflow.progress().value, 0);
    }
}
