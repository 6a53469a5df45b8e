use std::io;

/// Lifecycle phase of one supervised program.
///
/// Phases only move forward: Starting → Running → Stopping → Stopped.
/// A Stopped record is discarded, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
	Starting,
	Running,
	Stopping,
	Stopped,
}

impl ProcessState {
	pub fn is_running(&self) -> bool {
		matches!(self, ProcessState::Running)
	}
}

impl std::fmt::Display for ProcessState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let label = match self {
			ProcessState::Starting => "starting",
			ProcessState::Running => "running",
			ProcessState::Stopping => "stopping",
			ProcessState::Stopped => "stopped",
		};
		write!(f, "{}", label)
	}
}

/// Errors from supervisor operations.
#[derive(Debug)]
pub enum SupervisorError {
	/// A program with this name is already supervised.
	AlreadyRunning(String),
	/// No runnable program with this name in the program directory.
	NotFound(String),
	/// Stop or restart target is not currently supervised.
	NotRunning(String),
	/// The OS refused to create the child process.
	Spawn { program: String, source: io::Error },
}

impl std::fmt::Display for SupervisorError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SupervisorError::AlreadyRunning(name) => write!(f, "{}: already running", name),
			SupervisorError::NotFound(name) => write!(f, "{}: no such program", name),
			SupervisorError::NotRunning(name) => write!(f, "{}: not running", name),
			SupervisorError::Spawn { program, source } => {
				write!(f, "{}: failed to start: {}", program, source)
			}
		}
	}
}

impl std::error::Error for SupervisorError {}
