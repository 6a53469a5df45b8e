use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Console settings, read from `config.toml` in the config directory.
///
/// Every field has a default so a missing or partial file still yields a
/// working console.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
	#[serde(default = "default_program_dir")]
	pub program_dir: PathBuf,
	#[serde(default = "default_stop_grace")]
	pub stop_grace_secs: u64,
}

impl Default for ConsoleConfig {
	fn default() -> Self {
		Self {
			program_dir: default_program_dir(),
			stop_grace_secs: default_stop_grace(),
		}
	}
}

fn default_program_dir() -> PathBuf {
	PathBuf::from("programs")
}
fn default_stop_grace() -> u64 {
	5
}

impl ConsoleConfig {
	pub fn stop_grace(&self) -> Duration {
		Duration::from_secs(self.stop_grace_secs)
	}
}

pub fn config_dir() -> PathBuf {
	if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
		PathBuf::from(dir).join("drover")
	} else if let Some(home) = home_dir() {
		home.join(".config").join("drover")
	} else {
		PathBuf::from("/tmp").join("drover").join("config")
	}
}

fn home_dir() -> Option<PathBuf> {
	std::env::var("HOME").ok().map(PathBuf::from)
}

pub fn load() -> ConsoleConfig {
	let path = config_dir().join("config.toml");
	if path.exists() {
		match std::fs::read_to_string(&path) {
			Ok(content) => match toml::from_str(&content) {
				Ok(config) => return config,
				Err(e) => eprintln!("warning: failed to parse {}: {}", path.display(), e),
			},
			Err(e) => eprintln!("warning: failed to read {}: {}", path.display(), e),
		}
	}
	ConsoleConfig::default()
}
