mod commands;
mod config;
mod render;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use drover_core::{Supervisor, SupervisorConfig, SupervisorError};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use commands::Command;

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.init();

	let args: Vec<String> = std::env::args().skip(1).collect();
	match args.first().map(|s| s.as_str()) {
		Some("help" | "--help" | "-h") => {
			print_usage();
			return;
		}
		Some("version" | "--version" | "-V") => {
			println!("drover {}", env!("CARGO_PKG_VERSION"));
			return;
		}
		_ => {}
	}
	if args.len() > 1 {
		eprintln!("usage: drover [dir]");
		std::process::exit(1);
	}

	let mut config = config::load();
	if let Some(dir) = args.first() {
		config.program_dir = PathBuf::from(dir);
	} else if let Ok(dir) = std::env::var("DROVER_DIR") {
		config.program_dir = PathBuf::from(dir);
	}

	if !config.program_dir.exists() {
		if let Err(e) = std::fs::create_dir_all(&config.program_dir) {
			eprintln!("error: cannot create {}: {}", config.program_dir.display(), e);
			std::process::exit(1);
		}
		println!(
			"{}",
			render::note(format!(
				"created program directory {}",
				config.program_dir.display()
			))
		);
	}

	let sup = Supervisor::new(SupervisorConfig {
		program_dir: config.program_dir.clone(),
		stop_grace: config.stop_grace(),
	});

	let mut events = sup.output.subscribe();
	tokio::spawn(async move {
		loop {
			match events.recv().await {
				Ok(event) => println!("{}", render::event(&event)),
				Err(broadcast::error::RecvError::Lagged(n)) => {
					eprintln!("warning: dropped {} output events", n);
				}
				Err(broadcast::error::RecvError::Closed) => break,
			}
		}
	});

	print!("{}", render::banner(&config.program_dir, &sup.available()));

	let mut input = BufReader::new(tokio::io::stdin()).lines();
	loop {
		prompt();
		let line = match input.next_line().await {
			Ok(Some(line)) => line,
			// Ctrl-D or a closed pipe ends the session like `exit`.
			Ok(None) => break,
			Err(e) => {
				eprintln!("error: stdin: {}", e);
				break;
			}
		};

		match commands::parse(&line) {
			Ok(Some(command)) => {
				if dispatch(&sup, command).await {
					break;
				}
			}
			Ok(None) => {}
			Err(e) => println!("{}", render::error(e)),
		}
	}

	shutdown(&sup).await;
}

/// Route one command. Returns true when the console should quit.
async fn dispatch(sup: &Supervisor, command: Command) -> bool {
	match command {
		Command::Run(name) => match sup.launch(&name).await {
			Ok(pid) => println!("{}", render::started(&name, pid)),
			Err(e) => report(e),
		},
		Command::Stop(name) => match sup.stop(&name).await {
			Ok(record) => println!("{}", render::stopped(&record.name, record.pid())),
			Err(e) => report(e),
		},
		Command::Restart(name) => match sup.restart(&name).await {
			Ok(pid) => println!("{}", render::started(&name, pid)),
			Err(e) => report(e),
		},
		Command::List => println!("{}", render::listing("programs", &sup.available())),
		Command::ListRunning => {
			println!("{}", render::listing("running", &sup.running().await))
		}
		Command::Reload => reload(sup).await,
		Command::Exit => return true,
	}
	false
}

fn report(err: SupervisorError) {
	let message = match &err {
		SupervisorError::AlreadyRunning(_) => render::warning(&err),
		_ => render::error(&err),
	};
	println!("{}", message);
}

/// Replace the console with a fresh copy of itself.
///
/// Running programs are not stopped: their monitors die with this
/// process and the new console starts with an empty registry.
async fn reload(sup: &Supervisor) {
	let abandoned = sup.running().await.len();
	if abandoned > 0 {
		println!(
			"{}",
			render::warning(format!(
				"reloading, leaving {} running program(s) behind",
				abandoned
			))
		);
	}

	let exe = match std::env::current_exe() {
		Ok(exe) => exe,
		Err(e) => {
			println!("{}", render::error(format!("reload failed: {}", e)));
			return;
		}
	};

	use std::os::unix::process::CommandExt;
	let err = std::process::Command::new(exe)
		.args(std::env::args().skip(1))
		.exec();
	println!("{}", render::error(format!("reload failed: {}", err)));
}

async fn shutdown(sup: &Supervisor) {
	println!("{}", render::shutdown_notice(sup.running().await.len()));
	for record in sup.stop_all().await {
		println!("{}", render::stopped(&record.name, record.pid()));
	}
	// Give the monitors a beat to flush their completion notices.
	tokio::time::sleep(Duration::from_millis(100)).await;
}

fn prompt() {
	print!("{} ", "drover>".bold());
	let _ = std::io::stdout().flush();
}

fn print_usage() {
	eprintln!(
		"{} {} — interactive program supervisor",
		"drover".bold(),
		env!("CARGO_PKG_VERSION")
	);
	eprintln!();
	eprintln!("usage: {} [dir]", "drover".bold());
	eprintln!();
	eprintln!("  dir     program directory (default: ./programs, or DROVER_DIR)");
	eprintln!();
	eprintln!("{}", "console commands".cyan().bold());
	eprintln!("  {} <name>        launch a program from the directory", "run".bold());
	eprintln!("  {} <name>       stop a running program", "stop".bold());
	eprintln!("  {} <name>    stop a program, then launch it again", "restart".bold());
	eprintln!("  {}               list available programs", "list".bold());
	eprintln!("  {}       list running programs", "list_running".bold());
	eprintln!("  {}             re-exec the console, leaving programs behind", "reload".bold());
	eprintln!("  {}               stop everything and quit", "exit".bold());
	eprintln!();
	eprintln!("  a leading / is accepted: /run web");
}
