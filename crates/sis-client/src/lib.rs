//! Network access for the student information system.
//!
//! - [`ApiClient`]: the `/api` REST backend (search, list, add/update/delete, logout)
//! - [`HttpObjectStore`]: attachment storage for profile images
//! - [`RemoteCollection`], [`RecordWriter`], [`ObjectStore`]: the traits the
//!   list and workflow core is written against
//! - [`ClientConfig`]: TOML configuration with an environment override
//!
//! Errors are [`ClientError`]; [`ClientError::user_message`] gives the alert text.

pub mod client;
pub mod config;
pub mod error;
pub mod storage;
pub mod traits;

pub use client::ApiClient;
pub use config::{BASE_URL_ENV, ClientConfig, StorageConfig};
pub use error::{CONNECTION_ERROR_MESSAGE, ClientError, Result};
pub use storage::{HttpObjectStore, extension_for, object_key};
pub use traits::{ObjectStore, RecordWriter, RemoteCollection};
