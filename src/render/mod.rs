//! # Renderer
//!
//! Pure text → HTML conversion on top of a small virtual-node layer.
//! No state; every function is safe to call repeatedly and from any thread.

mod format;
pub mod node;

pub use format::{DEFAULT_LANGUAGE, format, format_nodes};
pub use node::{Element, Html, Node, escape, serialize};
