//! Target registration and on-demand execution.
//!
//! This module provides [`BuildContext`], which owns the set of defined targets
//! and the execution state of one build invocation. It handles:
//! - Registration of named targets
//! - Memoized execution: each body runs at most once per context
//! - Cycle detection through the `Running` state
//! - The require/build trace shown to the user
//!
//! There is no precomputed graph. Edges are discovered while bodies run, since a
//! body decides at runtime which targets it requires.

pub mod types;

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, error, info};

pub use types::{ExecuteError, Target, TargetBody, TargetState, TraceEvent};

type TraceListener = Box<dyn FnMut(&TraceEvent)>;

/// Registry and execution state for a single build invocation.
///
/// A context is constructed once per invocation and threaded through every
/// [`require`](Self::require) call. Nothing survives between contexts.
#[derive(Default)]
pub struct BuildContext {
  /// Targets in definition order.
  targets: Vec<Target>,

  /// Map from target name to index in `targets`.
  index: HashMap<String, usize>,

  /// Names of targets whose bodies are currently on the stack, outermost first.
  running: Vec<String>,

  /// Names of targets in the order they reached `Done`.
  completed: Vec<String>,

  trace: Vec<TraceEvent>,
  listener: Option<TraceListener>,
  verbose: bool,
}

impl BuildContext {
  /// Create an empty context.
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable verbose tracing.
  ///
  /// Verbose mode adds a `Satisfied` trace event for requests of targets that
  /// already ran. It never changes which bodies execute.
  pub fn set_verbose(&mut self, verbose: bool) {
    self.verbose = verbose;
  }

  /// Register a callback that observes trace events as they are recorded.
  pub fn on_trace(&mut self, listener: impl FnMut(&TraceEvent) + 'static) {
    self.listener = Some(Box::new(listener));
  }

  /// Register a target.
  ///
  /// # Errors
  ///
  /// Returns `DuplicateTarget` if `name` is already registered.
  pub fn define<F>(&mut self, name: impl Into<String>, body: F) -> Result<(), ExecuteError>
  where
    F: Fn(&mut BuildContext) -> Result<(), ExecuteError> + 'static,
  {
    self.insert(name.into(), None, Rc::new(body))
  }

  /// Register a target with a one-line description shown in target listings.
  pub fn define_with_description<F>(
    &mut self,
    name: impl Into<String>,
    description: impl Into<String>,
    body: F,
  ) -> Result<(), ExecuteError>
  where
    F: Fn(&mut BuildContext) -> Result<(), ExecuteError> + 'static,
  {
    self.insert(name.into(), Some(description.into()), Rc::new(body))
  }

  fn insert(&mut self, name: String, description: Option<String>, body: TargetBody) -> Result<(), ExecuteError> {
    if self.index.contains_key(&name) {
      return Err(ExecuteError::DuplicateTarget(name));
    }

    debug!(name = %name, "defining target");
    self.index.insert(name.clone(), self.targets.len());
    self.targets.push(Target {
      name,
      description,
      body,
      state: TargetState::NotRun,
    });
    Ok(())
  }

  /// Ensure the named target has run in this invocation.
  ///
  /// The first request runs the body; later requests only record a `require`
  /// trace line. A request for a target whose body is still on the stack fails
  /// with `CyclicDependency`, naming the chain of running targets.
  ///
  /// If the body fails the target is marked `Failed`, so it never runs twice,
  /// and the error is returned to the caller. Errors raised directly by the
  /// body are attributed to this target (`TargetFailed` for actions,
  /// `BodyFailed` otherwise). Cycles and errors already attributed deeper in
  /// the chain pass through unchanged.
  pub fn require(&mut self, name: &str) -> Result<(), ExecuteError> {
    let idx = self.lookup(name)?;
    let state = self.targets[idx].state;

    match state {
      TargetState::Done => {
        self.emit(TraceEvent::Require(name.to_string()));
        if self.verbose {
          self.emit(TraceEvent::Satisfied(name.to_string()));
        }
        debug!(name = %name, "target already satisfied");
        Ok(())
      }
      TargetState::Running => {
        let start = self.running.iter().position(|n| n == name).unwrap_or(0);
        let mut chain: Vec<String> = self.running[start..].to_vec();
        chain.push(name.to_string());
        error!(chain = ?chain, "dependency cycle detected");
        Err(ExecuteError::CyclicDependency { chain })
      }
      TargetState::Failed => Err(ExecuteError::AlreadyFailed(name.to_string())),
      TargetState::NotRun => self.run_body(idx),
    }
  }

  fn run_body(&mut self, idx: usize) -> Result<(), ExecuteError> {
    let name = self.targets[idx].name.clone();

    self.emit(TraceEvent::Require(name.clone()));
    self.targets[idx].state = TargetState::Running;
    self.running.push(name.clone());
    self.emit(TraceEvent::Build(name.clone()));

    let body = Rc::clone(&self.targets[idx].body);
    let result = body(self);

    self.running.pop();

    match result {
      Ok(()) => {
        self.targets[idx].state = TargetState::Done;
        self.completed.push(name.clone());
        debug!(name = %name, "target done");
        Ok(())
      }
      Err(err) => {
        self.targets[idx].state = TargetState::Failed;
        Err(match err {
          ExecuteError::Action(source) => {
            error!(name = %name, error = %source, "target failed");
            ExecuteError::TargetFailed { target: name, source }
          }
          err @ (ExecuteError::UnknownTarget { .. } | ExecuteError::DuplicateTarget(_) | ExecuteError::Usage(_)) => {
            error!(name = %name, error = %err, "target failed");
            ExecuteError::BodyFailed {
              target: name,
              source: Box::new(err),
            }
          }
          attributed => attributed,
        })
      }
    }
  }

  /// Run a root target on behalf of the driver.
  ///
  /// Equivalent to [`require`](Self::require), with start and finish logging.
  pub fn run_root(&mut self, name: &str) -> Result<(), ExecuteError> {
    let start = Instant::now();
    info!(name = %name, "running root target");

    let result = self.require(name);

    match &result {
      Ok(()) => info!(
        name = %name,
        completed = self.completed.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "build succeeded"
      ),
      Err(e) => error!(name = %name, error = %e, "build failed"),
    }

    result
  }

  /// Resolve the root target named on the command line.
  ///
  /// # Errors
  ///
  /// Returns `Usage` when no name was given and `UnknownTarget` when the name
  /// is not registered. Both list the available targets.
  pub fn select_root(&self, requested: Option<&str>) -> Result<String, ExecuteError> {
    let Some(name) = requested else {
      return Err(ExecuteError::Usage(format!(
        "no target given; available targets: {}",
        self.target_names().join(", ")
      )));
    };

    self.lookup(name)?;
    Ok(name.to_string())
  }

  /// Record a progress message from a target body.
  pub fn note(&mut self, message: impl Into<String>) {
    let message = message.into();
    info!(message = %message, "note");
    self.emit(TraceEvent::Note(message));
  }

  fn emit(&mut self, event: TraceEvent) {
    if let Some(listener) = self.listener.as_mut() {
      listener(&event);
    }
    self.trace.push(event);
  }

  fn lookup(&self, name: &str) -> Result<usize, ExecuteError> {
    self.index.get(name).copied().ok_or_else(|| ExecuteError::UnknownTarget {
      name: name.to_string(),
      available: self.target_names(),
    })
  }

  /// Get a registered target by name.
  pub fn target(&self, name: &str) -> Option<&Target> {
    self.index.get(name).map(|&idx| &self.targets[idx])
  }

  /// All registered targets, in definition order.
  pub fn targets(&self) -> &[Target] {
    &self.targets
  }

  /// Names of all registered targets, in definition order.
  pub fn target_names(&self) -> Vec<String> {
    self.targets.iter().map(|t| t.name.clone()).collect()
  }

  /// The trace recorded so far.
  pub fn trace(&self) -> &[TraceEvent] {
    &self.trace
  }

  /// Targets that completed, in completion order.
  pub fn completed(&self) -> &[String] {
    &self.completed
  }
}
