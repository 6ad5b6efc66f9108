//! Core abstractions for the remote shell.
//!
//! This crate provides the fundamental building blocks:
//! - `ComponentInfo`/`MethodInfo`/`FieldInfo` - The remote directory model
//! - `Transport`/`Connector` - The RPC channel seam
//! - `Prompter` - The blocking console prompt seam
//! - `value` - Type-directed coercion of text literals
//! - `ContainerStore` - Named session values

pub mod container;
pub mod literal;
pub mod prompt;
pub mod traits;
pub mod value;

pub use container::{Container, ContainerError, ContainerStore};
pub use literal::Token;
pub use prompt::{PromptError, Prompter, ScriptedPrompter};
pub use traits::{
    ComponentInfo, Connector, FieldInfo, InvokeOptions, InvokeResponse, MethodInfo, Param,
    Transport, TransportError,
};
pub use value::{CoercionError, ParsedValue, ScalarKind, TypedValue, Value};
