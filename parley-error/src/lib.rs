//! # parley-error
//!
//! Unified error handling for parley.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., InferenceFailed, OrderRejected)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! The drivers branch on kind: a `ParseFailed` or `OrderRejected` means "skip
//! this power and continue the phase", an `EngineFailed` from phase processing
//! means "stop the match". This replaces the original scripts' catch-and-print
//! handling with something a caller can actually dispatch on.
//!
//! ## Usage
//!
//! ```rust
//! use parley_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ParseFailed, "reply is not a JSON object")
//!         .with_operation("wire::parse_directive")
//!         .with_context("power", "FRANCE"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All fallible operations return `Result<T, parley_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using parley Error
pub type Result<T> = std::result::Result<T, Error>;
