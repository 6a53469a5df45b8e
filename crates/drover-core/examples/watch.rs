use std::time::Duration;

use drover_core::{OutputEvent, Source, Supervisor, SupervisorConfig};

#[tokio::main]
async fn main() {
	let args: Vec<String> = std::env::args().collect();
	let (dir, name) = match (args.get(1), args.get(2)) {
		(Some(dir), Some(name)) => (dir.clone(), name.clone()),
		_ => {
			eprintln!("usage: watch <program-dir> <name>");
			return;
		}
	};

	let sup = Supervisor::new(SupervisorConfig {
		program_dir: dir.into(),
		stop_grace: Duration::from_secs(5),
	});

	let mut events = sup.output.subscribe();
	let pid = sup.launch(&name).await.expect("launch failed");
	println!("{name} running as pid {pid}");

	while let Ok(event) = events.recv().await {
		match event {
			OutputEvent::Line { program, source: Source::Stderr, text } => {
				eprintln!("[{program}:err] {text}");
			}
			OutputEvent::Line { program, text, .. } => {
				println!("[{program}] {text}");
			}
			OutputEvent::Exited { program, status } => {
				println!("[{program}] exited: {status:?}");
				break;
			}
		}
	}
}
