use std::path::Path;
use std::process::ExitStatus;

use drover_core::{OutputEvent, Source};
use owo_colors::OwoColorize;

pub fn event(event: &OutputEvent) -> String {
	match event {
		OutputEvent::Line { program, source: Source::Stdout, text } => {
			format!("{} {}", format!("[{}]", program).cyan(), text)
		}
		OutputEvent::Line { program, source: Source::Stderr, text } => {
			format!("{} {}", format!("[{}:err]", program).red(), text.red())
		}
		OutputEvent::Exited { program, status } => exit_notice(program, *status),
	}
}

fn exit_notice(program: &str, status: Option<ExitStatus>) -> String {
	let tag = format!("[{}]", program).cyan().to_string();
	let notice = match status {
		Some(status) if status.success() => "exited".green().to_string(),
		Some(status) => match status.code() {
			Some(code) => format!("exited with code {}", code).yellow().to_string(),
			None => "killed by signal".yellow().to_string(),
		},
		None => "exit status unknown".yellow().to_string(),
	};
	format!("{} {}", tag, notice)
}

pub fn started(name: &str, pid: u32) -> String {
	format!("{} started (pid {})", name, pid).green().to_string()
}

pub fn stopped(name: &str, pid: u32) -> String {
	format!("{} stopped (pid {})", name, pid).yellow().to_string()
}

pub fn warning(message: impl std::fmt::Display) -> String {
	message.to_string().yellow().to_string()
}

pub fn error(message: impl std::fmt::Display) -> String {
	message.to_string().red().to_string()
}

pub fn note(message: impl std::fmt::Display) -> String {
	message.to_string().dimmed().to_string()
}

/// Announcement for the exit path, always printed; carries the count of
/// programs about to be stopped when there are any.
pub fn shutdown_notice(running: usize) -> String {
	if running == 0 {
		return "shutting down".dimmed().to_string();
	}
	format!(
		"{}\n{}",
		"shutting down".dimmed(),
		format!("stopping {} running program(s)", running).yellow()
	)
}

pub fn listing(title: &str, names: &[String]) -> String {
	if names.is_empty() {
		return format!("{} {}", title.cyan().bold(), "(none)".dimmed());
	}
	format!("{}\n  {}", title.cyan().bold(), names.join("\n  "))
}

pub fn banner(dir: &Path, available: &[String]) -> String {
	let mut out = String::new();
	out.push_str(&format!(
		"{} {} — program console, supervising {}\n",
		"drover".bold(),
		env!("CARGO_PKG_VERSION"),
		dir.display()
	));
	if available.is_empty() {
		out.push_str(&format!(
			"{}\n",
			"no programs found; drop executables into the directory above".dimmed()
		));
	} else {
		out.push_str(&format!("{} {}\n", "programs:".cyan(), available.join(", ")));
	}
	out.push_str(&format!(
		"{}\n",
		"commands: run, stop, restart, list, list_running, reload, exit".dimmed()
	));
	out
}
