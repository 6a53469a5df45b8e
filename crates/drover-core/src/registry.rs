use std::collections::HashMap;
use std::process::ExitStatus;
use std::sync::Arc;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::sync::{watch, RwLock};

use crate::types::{ProcessState, SupervisorError};

/// Handle to one spawned child: signal it, await its exit.
///
/// The exit status is published exactly once, by the program's output
/// monitor, after both pipes have closed and the child has been reaped.
#[derive(Debug)]
pub struct ProcessHandle {
	pid: u32,
	exited: watch::Receiver<Option<ExitStatus>>,
}

impl ProcessHandle {
	pub fn new(pid: u32, exited: watch::Receiver<Option<ExitStatus>>) -> Self {
		Self { pid, exited }
	}

	pub fn pid(&self) -> u32 {
		self.pid
	}

	/// Ask the child to terminate. A child that is already gone is fine.
	pub fn terminate(&self) {
		let _ = kill(Pid::from_raw(self.pid as i32), Signal::SIGTERM);
	}

	pub fn force_kill(&self) {
		let _ = kill(Pid::from_raw(self.pid as i32), Signal::SIGKILL);
	}

	/// Wait for the exit status published by the output monitor.
	///
	/// Returns `None` if the monitor died before reaping the child.
	pub async fn wait(&mut self) -> Option<ExitStatus> {
		match self.exited.wait_for(|status| status.is_some()).await {
			Ok(status) => *status,
			Err(_) => None,
		}
	}
}

/// One supervised program while the supervisor holds it.
#[derive(Debug)]
pub struct ProcessRecord {
	pub name: String,
	pub state: ProcessState,
	pub handle: ProcessHandle,
}

impl ProcessRecord {
	pub fn new(name: impl Into<String>, handle: ProcessHandle) -> Self {
		Self {
			name: name.into(),
			state: ProcessState::Starting,
			handle,
		}
	}

	pub fn pid(&self) -> u32 {
		self.handle.pid()
	}
}

/// Shared table of currently supervised programs.
///
/// The lock is the single serialization point for the supervisor: every
/// insert and removal goes through one of these methods, and readers
/// never observe a record halfway in or out.
#[derive(Clone)]
pub struct Registry {
	inner: Arc<RwLock<HashMap<String, ProcessRecord>>>,
}

impl Registry {
	pub fn new() -> Self {
		Self {
			inner: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	/// Insert a freshly launched record. Rejects a name that is already
	/// supervised, leaving the existing record untouched.
	pub async fn insert(&self, record: ProcessRecord) -> Result<(), SupervisorError> {
		let mut map = self.inner.write().await;
		if map.contains_key(&record.name) {
			return Err(SupervisorError::AlreadyRunning(record.name.clone()));
		}
		tracing::debug!(program = %record.name, pid = record.pid(), "registry insert");
		map.insert(record.name.clone(), record);
		Ok(())
	}

	pub async fn contains(&self, name: &str) -> bool {
		self.inner.read().await.contains_key(name)
	}

	/// Remove and return the record for `name`, whichever spawn it holds.
	pub async fn remove(&self, name: &str) -> Option<ProcessRecord> {
		let mut map = self.inner.write().await;
		let record = map.remove(name);
		if record.is_some() {
			tracing::debug!(program = %name, "registry remove");
		}
		record
	}

	/// Remove the record for `name` only if it still belongs to the spawn
	/// identified by `pid`. A monitor whose program was stopped and then
	/// relaunched must not evict the successor record.
	pub async fn remove_pid(&self, name: &str, pid: u32) -> Option<ProcessRecord> {
		let mut map = self.inner.write().await;
		match map.get(name) {
			Some(record) if record.pid() == pid => {
				tracing::debug!(program = %name, pid, "registry remove");
				map.remove(name)
			}
			_ => None,
		}
	}

	/// Point-in-time snapshot of supervised names, sorted.
	pub async fn list(&self) -> Vec<String> {
		let map = self.inner.read().await;
		let mut names: Vec<String> = map.keys().cloned().collect();
		names.sort();
		names
	}
}
