//! Shared utilities.
//!
//! Currently only test helpers: cross-platform command builders and a
//! recording fake of the action capability set.

#[cfg(test)]
pub mod testutil;
