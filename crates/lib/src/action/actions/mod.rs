//! Individual action implementations.
//!
//! - [`archive`] - Jar/zip packaging and extraction
//! - [`cmd`] - External command execution
//! - [`fetch`] - HTTP download with a reuse-if-present cache
//! - [`fs`] - Directory copy/remove helpers

pub mod archive;
pub mod cmd;
pub mod fetch;
pub mod fs;
