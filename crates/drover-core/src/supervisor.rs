use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::watch;

use crate::monitor;
use crate::output::OutputBus;
use crate::registry::{ProcessHandle, ProcessRecord, Registry};
use crate::types::{ProcessState, SupervisorError};

pub struct SupervisorConfig {
	/// Directory holding the runnable programs, one executable per name.
	pub program_dir: PathBuf,
	/// How long a stopped program gets to react to SIGTERM before SIGKILL.
	pub stop_grace: Duration,
}

pub struct Supervisor {
	pub registry: Registry,
	pub output: OutputBus,
	pub config: SupervisorConfig,
}

impl Supervisor {
	pub fn new(config: SupervisorConfig) -> Arc<Self> {
		Arc::new(Self {
			registry: Registry::new(),
			output: OutputBus::new(),
			config,
		})
	}

	/// Launch `name` from the program directory and start supervising it.
	///
	/// On success the program sits in the registry with a monitor task
	/// draining its output, and its pid is returned.
	pub async fn launch(&self, name: &str) -> Result<u32, SupervisorError> {
		if self.registry.contains(name).await {
			return Err(SupervisorError::AlreadyRunning(name.to_string()));
		}

		// A program name is a single directory entry, never a path.
		if name.is_empty() || name.contains('/') {
			return Err(SupervisorError::NotFound(name.to_string()));
		}
		let path = self.config.program_dir.join(name);
		if !is_runnable(&path) {
			return Err(SupervisorError::NotFound(name.to_string()));
		}

		let mut child = Command::new(&path)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
			.map_err(|e| SupervisorError::Spawn {
				program: name.to_string(),
				source: e,
			})?;

		let pid = child.id().unwrap_or(0);
		let (exit_tx, exit_rx) = watch::channel(None);

		let mut record = ProcessRecord::new(name, ProcessHandle::new(pid, exit_rx));
		record.state = ProcessState::Running;

		if let Err(e) = self.registry.insert(record).await {
			// Lost the insert race to a concurrent launch of the same
			// name; reap the extra spawn.
			let _ = child.kill().await;
			return Err(e);
		}

		tracing::info!(program = %name, pid, "started");

		tokio::spawn(monitor::run(
			child,
			name.to_string(),
			pid,
			exit_tx,
			self.output.clone(),
			self.registry.clone(),
		));

		Ok(pid)
	}

	/// Stop a supervised program and wait until it is gone.
	///
	/// The registry entry is claimed before the child is signalled, so a
	/// relaunch of the same name is never rejected against a dying
	/// record. Escalates to SIGKILL when the grace period runs out.
	pub async fn stop(&self, name: &str) -> Result<ProcessRecord, SupervisorError> {
		let mut record = match self.registry.remove(name).await {
			Some(record) => record,
			None => return Err(SupervisorError::NotRunning(name.to_string())),
		};

		record.state = ProcessState::Stopping;
		record.handle.terminate();

		let status = match tokio::time::timeout(self.config.stop_grace, record.handle.wait()).await
		{
			Ok(status) => status,
			Err(_) => {
				tracing::warn!(program = %name, pid = record.pid(), "ignored SIGTERM, killing");
				record.handle.force_kill();
				record.handle.wait().await
			}
		};

		record.state = ProcessState::Stopped;
		tracing::info!(
			program = %name,
			pid = record.pid(),
			code = ?status.and_then(|s| s.code()),
			"stopped"
		);
		Ok(record)
	}

	/// Stop then launch. A program that is not running is just launched.
	pub async fn restart(&self, name: &str) -> Result<u32, SupervisorError> {
		match self.stop(name).await {
			Ok(_) | Err(SupervisorError::NotRunning(_)) => {}
			Err(e) => return Err(e),
		}
		self.launch(name).await
	}

	/// Stop every supervised program, in no particular order.
	///
	/// Programs whose monitor reclaimed them mid-shutdown are skipped.
	pub async fn stop_all(&self) -> Vec<ProcessRecord> {
		let mut stopped = Vec::new();
		for name in self.registry.list().await {
			if let Ok(record) = self.stop(&name).await {
				stopped.push(record);
			}
		}
		stopped
	}

	/// Names of the currently supervised programs, sorted.
	pub async fn running(&self) -> Vec<String> {
		self.registry.list().await
	}

	/// Names of runnable programs in the program directory, sorted.
	pub fn available(&self) -> Vec<String> {
		let mut names = Vec::new();
		match std::fs::read_dir(&self.config.program_dir) {
			Ok(entries) => {
				for entry in entries.flatten() {
					if is_runnable(&entry.path()) {
						names.push(entry.file_name().to_string_lossy().into_owned());
					}
				}
			}
			Err(e) => {
				tracing::warn!(
					dir = %self.config.program_dir.display(),
					error = %e,
					"cannot list programs"
				);
			}
		}
		names.sort();
		names
	}
}

fn is_runnable(path: &Path) -> bool {
	use std::os::unix::fs::PermissionsExt;
	match std::fs::metadata(path) {
		Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
		Err(_) => false,
	}
}
