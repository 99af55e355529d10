//! Record and query types for the student information system.
//!
//! This crate has no I/O. It describes what travels over the wire between the
//! client and the REST backend, plus the client-side checks that run before a
//! write is attempted:
//!
//! - [`entity`]: the [`Entity`] trait tying a record type to its endpoint,
//!   key, sort columns and table columns
//! - [`student`], [`college`], [`program`]: the three managed records and
//!   their create/update/delete payloads
//! - [`query`]: [`PageQuery`], [`SortDirection`] and the cache filter key
//! - [`envelope`]: response bodies (`rows` + `totalCount`, mutation results)
//! - [`validate`]: required-field and format validation
//!
//! # Example
//!
//! ```
//! use sis_model::{Entity, PageQuery, SortDirection, Student};
//!
//! let query = PageQuery::new(Student::DEFAULT_SORT, 5)
//!     .with_search("Dela Cruz")
//!     .with_direction(SortDirection::Desc);
//!
//! assert_eq!(query.offset(), 0);
//! assert!(query.query_pairs().iter().any(|(k, v)| *k == "q" && v == "Dela Cruz"));
//! ```

pub mod college;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod program;
pub mod query;
pub mod student;
pub mod validate;

pub use college::{College, CollegeKey, CollegeUpdate, NewCollege};
pub use entity::{ColumnSpec, Entity, EntityKind};
pub use envelope::{ListEnvelope, MutationResponse, SearchEnvelope};
pub use error::{ModelError, ValidationError};
pub use program::{NewProgram, Program, ProgramKey, ProgramUpdate};
pub use query::{PageQuery, QueryFilter, SortDirection};
pub use student::{NewStudent, Student, StudentKey, StudentUpdate};
pub use validate::Validate;
