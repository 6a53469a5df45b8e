use std::process::ExitStatus;

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

/// Which pipe a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
	Stdout,
	Stderr,
}

impl std::fmt::Display for Source {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Source::Stdout => write!(f, "stdout"),
			Source::Stderr => write!(f, "stderr"),
		}
	}
}

/// One emission from a program's output monitor.
#[derive(Debug, Clone)]
pub enum OutputEvent {
	/// A line read from the child, tagged with its origin.
	Line {
		program: String,
		source: Source,
		text: String,
	},
	/// Both pipes closed and the child was reaped.
	///
	/// `status` is `None` when the monitor could not collect one.
	Exited {
		program: String,
		status: Option<ExitStatus>,
	},
}

/// Fan-out for monitor emissions.
///
/// Cheap to clone. The console subscribes once and renders; tests
/// subscribe to observe emission. A receiver that falls behind loses the
/// oldest events and keeps going.
#[derive(Clone)]
pub struct OutputBus {
	sender: broadcast::Sender<OutputEvent>,
}

impl OutputBus {
	pub fn new() -> Self {
		let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<OutputEvent> {
		self.sender.subscribe()
	}

	pub fn line(&self, program: &str, source: Source, text: String) {
		let _ = self.sender.send(OutputEvent::Line {
			program: program.to_string(),
			source,
			text,
		});
	}

	pub fn exited(&self, program: &str, status: Option<ExitStatus>) {
		let _ = self.sender.send(OutputEvent::Exited {
			program: program.to_string(),
			status,
		});
	}
}
