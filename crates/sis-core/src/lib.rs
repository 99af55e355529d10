//! List and mutation core for the student information system.
//!
//! Framework-free state machines the presentation layer drives:
//!
//! - [`controller`]: [`PaginatedListController`], which owns one list's query,
//!   pagination and [`PageCache`], and issues generation-tagged fetches
//! - [`table`] and [`jump`]: the table/pagination contract and the
//!   "jump to page" input rules
//! - [`workflow`]: [`MutationWorkflow`] with validation, confirmation prompts,
//!   attachments and step [`progress`]
//! - [`alert`]: single-slot [`AlertChannel`] with typed button continuations
//! - [`debounce`]: trailing-edge [`Debouncer`] for search input
//!
//! Network access goes through the `sis-client` traits, so everything here can
//! be exercised against in-memory fakes.

pub mod alert;
pub mod cache;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod jump;
pub mod pagination;
pub mod progress;
pub mod table;
pub mod workflow;

pub use alert::{
    ActionStyle, Alert, AlertAction, AlertChannel, AlertKind, AlertSink, AlertSurface,
    DEFAULT_TITLE,
};
pub use cache::{CachedPage, Generation, PageCache};
pub use controller::{
    Completion, DisplayRow, FetchKind, FetchOutcome, FetchTicket, MutationKind,
    PaginatedListController,
};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use error::WorkflowError;
pub use jump::JumpInput;
pub use pagination::{PaginationState, clamp_page_index, page_count};
pub use progress::{Milestone, Progress, ProgressSnapshot, Step};
pub use table::{
    ColumnDescriptor, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, PaginationMode, TableEvent, TableView,
    page_label, page_size_label,
};
pub use workflow::{
    AttachmentTarget, COMPLETION_DELAY, Confirmation, FileAttachment, MutationWorkflow,
    UploadPolicy, WorkflowOutcome,
};
