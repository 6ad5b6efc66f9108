//! Transport bindings for the remote shell.
//!
//! Provides:
//! - Wire protocol (tagged JSON requests and replies)
//! - HTTP transport (feature: http)
//! - In-process registry (feature: memory)

pub mod protocol;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "http")]
pub use http::{HttpConnector, HttpTransport};
#[cfg(feature = "memory")]
pub use memory::MemoryRegistry;
pub use protocol::{RemoteReply, RemoteRequest};
