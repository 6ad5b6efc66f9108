//! Session orchestration for the remote shell.
//!
//! Provides:
//! - `Session` - Connect, browse, build, call and repeat
//! - `DirectoryCache` - Cached components and methods
//! - `ObjectBuilder` - Interactive construction of composite values
//! - Method resolution and single-slot invocation history

pub mod builder;
pub mod directory;
pub mod error;
pub mod format;
pub mod history;
pub mod resolver;
pub mod session;
pub mod state;

pub use builder::{BuildMode, ObjectBuilder};
pub use directory::{DirectoryCache, ListKind, MatchMode};
pub use error::SessionError;
pub use history::{History, Invocation};
pub use session::{CallOutcome, CompletionKind, Session};
pub use state::{SessionOptions, SessionState};
