//! # graphconv-error
//!
//! One error type for every graphconv crate.
//!
//! - [`ErrorKind`] says what went wrong (`ParseFailed`, `MalformedFile`, ...)
//! - the operation and context locate it (`json::import`, `index=3`)
//! - the source keeps the XML, JSON or IO error underneath
//!
//! ```rust
//! use graphconv_error::{Error, ErrorKind};
//!
//! fn read_node() -> Result<(), Error> {
//!     Err(Error::missing_field("id")
//!         .with_operation("json::import")
//!         .with_context("index", "3"))
//! }
//!
//! let err = read_node().unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MissingField);
//! assert_eq!(err.context_value("index"), Some("3"));
//! ```
//!
//! Errors are raised once, at the point of failure. Outer layers only add an
//! operation or context, or wrap the error as the source of a broader one.

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

pub type Result<T> = std::result::Result<T, Error>;
