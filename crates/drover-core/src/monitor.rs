use std::process::ExitStatus;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::watch;

use crate::output::{OutputBus, Source};
use crate::registry::Registry;

/// Watch one supervised program: forward its output, reap it, and
/// reclaim its registry entry.
///
/// Runs as one task per supervised program. The two pipes are read
/// concurrently so a busy stderr cannot stall stdout or the other way
/// round; within one pipe, line order is preserved. The child is reaped
/// alongside the drains and its exit status goes out on the watch
/// channel as soon as it is collected: a descendant that inherited the
/// pipe write ends can hold the drains open, but never a stop waiting
/// on that channel. The completion notice and the removal at the end
/// wait for both pipes to close, run on every path out of the drain
/// loops, and tolerate a record that an explicit stop already claimed.
pub(crate) async fn run(
	mut child: Child,
	name: String,
	pid: u32,
	exited: watch::Sender<Option<ExitStatus>>,
	bus: OutputBus,
	registry: Registry,
) {
	let stdout = child.stdout.take();
	let stderr = child.stderr.take();

	let (status, _, _) = tokio::join!(
		async {
			let status = match child.wait().await {
				Ok(status) => {
					tracing::info!(program = %name, pid, code = ?status.code(), "exited");
					Some(status)
				}
				Err(e) => {
					tracing::warn!(program = %name, pid, error = %e, "could not collect exit status");
					None
				}
			};
			let _ = exited.send(status);
			status
		},
		drain(stdout, &name, Source::Stdout, &bus),
		drain(stderr, &name, Source::Stderr, &bus),
	);

	bus.exited(&name, status);

	// No-op when an explicit stop claimed the record first, or when the
	// name was relaunched while this monitor was still draining.
	registry.remove_pid(&name, pid).await;
}

async fn drain<R>(reader: Option<R>, name: &str, source: Source, bus: &OutputBus)
where
	R: AsyncRead + Unpin,
{
	let mut lines = match reader {
		Some(reader) => BufReader::new(reader).lines(),
		None => return,
	};

	loop {
		match lines.next_line().await {
			Ok(Some(text)) => bus.line(name, source, text),
			Ok(None) => break,
			Err(e) => {
				tracing::warn!(program = %name, %source, error = %e, "pipe read failed");
				break;
			}
		}
	}
}
