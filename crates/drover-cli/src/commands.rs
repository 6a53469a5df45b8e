/// One parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	Run(String),
	Stop(String),
	Restart(String),
	List,
	ListRunning,
	Reload,
	Exit,
}

/// Errors from parsing one line of operator input.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
	UnknownCommand(String),
	Usage(&'static str),
}

impl std::fmt::Display for ParseError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ParseError::UnknownCommand(verb) => {
				write!(
					f,
					"unknown command: {} (commands: run, stop, restart, list, list_running, reload, exit)",
					verb
				)
			}
			ParseError::Usage(usage) => write!(f, "usage: {}", usage),
		}
	}
}

impl std::error::Error for ParseError {}

/// Parse one line of input. The leading `/` marker is optional; blank
/// lines parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
	let line = line.trim();
	if line.is_empty() {
		return Ok(None);
	}

	let mut parts = line.split_whitespace();
	let verb = parts.next().unwrap_or_default();
	let verb = verb.strip_prefix('/').unwrap_or(verb);
	let arg = parts.next();
	let extra = parts.next();

	let command = match verb {
		"run" => Command::Run(name_arg("run <name>", arg, extra)?),
		"stop" => Command::Stop(name_arg("stop <name>", arg, extra)?),
		"restart" => Command::Restart(name_arg("restart <name>", arg, extra)?),
		"list" => bare("list", Command::List, arg)?,
		"list_running" => bare("list_running", Command::ListRunning, arg)?,
		"reload" => bare("reload", Command::Reload, arg)?,
		"exit" => bare("exit", Command::Exit, arg)?,
		other => return Err(ParseError::UnknownCommand(other.to_string())),
	};
	Ok(Some(command))
}

fn name_arg(
	usage: &'static str,
	arg: Option<&str>,
	extra: Option<&str>,
) -> Result<String, ParseError> {
	match (arg, extra) {
		(Some(name), None) => Ok(name.to_string()),
		_ => Err(ParseError::Usage(usage)),
	}
}

fn bare(usage: &'static str, command: Command, arg: Option<&str>) -> Result<Command, ParseError> {
	match arg {
		None => Ok(command),
		Some(_) => Err(ParseError::Usage(usage)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_plain_verbs() {
		assert_eq!(parse("run web"), Ok(Some(Command::Run("web".into()))));
		assert_eq!(parse("stop web"), Ok(Some(Command::Stop("web".into()))));
		assert_eq!(parse("restart web"), Ok(Some(Command::Restart("web".into()))));
		assert_eq!(parse("list"), Ok(Some(Command::List)));
		assert_eq!(parse("list_running"), Ok(Some(Command::ListRunning)));
		assert_eq!(parse("reload"), Ok(Some(Command::Reload)));
		assert_eq!(parse("exit"), Ok(Some(Command::Exit)));
	}

	#[test]
	fn parses_marker_prefix() {
		assert_eq!(parse("/run web"), Ok(Some(Command::Run("web".into()))));
		assert_eq!(parse("/list"), Ok(Some(Command::List)));
		assert_eq!(parse("/exit"), Ok(Some(Command::Exit)));
	}

	#[test]
	fn tolerates_surrounding_whitespace() {
		assert_eq!(parse("  run   web  "), Ok(Some(Command::Run("web".into()))));
	}

	#[test]
	fn blank_lines_parse_to_none() {
		assert_eq!(parse(""), Ok(None));
		assert_eq!(parse("   "), Ok(None));
	}

	#[test]
	fn rejects_missing_name() {
		assert_eq!(parse("run"), Err(ParseError::Usage("run <name>")));
		assert_eq!(parse("stop"), Err(ParseError::Usage("stop <name>")));
		assert_eq!(parse("/restart"), Err(ParseError::Usage("restart <name>")));
	}

	#[test]
	fn rejects_extra_arguments() {
		assert_eq!(parse("run a b"), Err(ParseError::Usage("run <name>")));
		assert_eq!(parse("list web"), Err(ParseError::Usage("list")));
		assert_eq!(parse("exit now"), Err(ParseError::Usage("exit")));
	}

	#[test]
	fn rejects_unknown_verbs() {
		assert_eq!(
			parse("frobnicate"),
			Err(ParseError::UnknownCommand("frobnicate".into()))
		);
		assert_eq!(
			parse("/frobnicate web"),
			Err(ParseError::UnknownCommand("frobnicate".into()))
		);
	}
}
