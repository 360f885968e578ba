//! bild-lib: target engine and recipe for the symtab library build
//!
//! This crate provides:
//! - `execute`: the target registry and on-demand executor (`BuildContext`)
//! - `action`: the side-effecting capability set target bodies call into
//! - `manifest`: a structured JAR manifest and its formatter
//! - `recipe`: the symtab targets (`compile`, `mkjar`, `mkdoc`, `install`, ...)

pub mod action;
pub mod config;
pub mod consts;
pub mod execute;
pub mod manifest;
pub mod platform;
pub mod recipe;
pub mod util;
