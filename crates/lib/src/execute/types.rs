//! Types for target registration and execution.
//!
//! This module defines the error types, trace events, and per-target state
//! used by [`BuildContext`](super::BuildContext).

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;

use crate::action::ActionError;

use super::BuildContext;

/// The work performed by a target.
///
/// A body receives the build context so it can require other targets before,
/// after, or instead of doing its own work.
pub type TargetBody = Rc<dyn Fn(&mut BuildContext) -> Result<(), ExecuteError>>;

/// Execution state of a target within one build invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
  /// The body has not been invoked.
  #[default]
  NotRun,
  /// The body is on the call stack.
  Running,
  /// The body completed successfully.
  Done,
  /// The body returned an error. It is not run again in this invocation.
  Failed,
}

/// A named unit of build work.
pub struct Target {
  pub(super) name: String,
  pub(super) description: Option<String>,
  pub(super) body: TargetBody,
  pub(super) state: TargetState,
}

impl Target {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn state(&self) -> TargetState {
    self.state
  }
}

impl fmt::Debug for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Target")
      .field("name", &self.name)
      .field("description", &self.description)
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}

/// One entry of the user-facing build trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum TraceEvent {
  /// A target was requested.
  Require(String),
  /// A target's body started.
  Build(String),
  /// A request was satisfied by an earlier run (verbose mode only).
  Satisfied(String),
  /// Free-form progress message from a target body.
  Note(String),
}

impl fmt::Display for TraceEvent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TraceEvent::Require(name) => write!(f, "require {}", name),
      TraceEvent::Build(name) => write!(f, "build {}", name),
      TraceEvent::Satisfied(name) => write!(f, "skip {} (already built)", name),
      TraceEvent::Note(message) => f.write_str(message),
    }
  }
}

/// Errors that can occur while defining or running targets.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// A target with this name is already registered.
  #[error("target already defined: {0}")]
  DuplicateTarget(String),

  /// No target with this name is registered.
  #[error("unknown target '{name}'; available targets: {}", .available.join(", "))]
  UnknownTarget { name: String, available: Vec<String> },

  /// A target transitively required itself.
  #[error("dependency cycle detected: {}", .chain.join(" -> "))]
  CyclicDependency { chain: Vec<String> },

  /// The invocation did not name a target.
  #[error("{0}")]
  Usage(String),

  /// A target body failed.
  #[error("target '{target}' failed: {source}")]
  TargetFailed {
    target: String,
    #[source]
    source: ActionError,
  },

  /// A target body failed for a reason other than an action, e.g. it
  /// required a target that does not exist.
  #[error("target '{target}' failed: {source}")]
  BodyFailed {
    target: String,
    #[source]
    source: Box<ExecuteError>,
  },

  /// A target that already failed in this invocation was required again.
  #[error("target '{0}' already failed in this build")]
  AlreadyFailed(String),

  /// An action failed before being attributed to a target.
  #[error(transparent)]
  Action(#[from] ActionError),
}

impl ExecuteError {
  /// Name of the innermost target whose body failed, if any.
  pub fn failed_target(&self) -> Option<&str> {
    match self {
      ExecuteError::TargetFailed { target, .. } | ExecuteError::BodyFailed { target, .. } => Some(target),
      ExecuteError::AlreadyFailed(target) => Some(target),
      _ => None,
    }
  }

  /// Whether the error stems from how the tool was invoked rather than the build.
  pub fn is_usage(&self) -> bool {
    matches!(self, ExecuteError::Usage(_))
  }
}
