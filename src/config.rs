use clap::Parser;

pub const DEFAULT_PROMPT: &str = "pipesh$ ";

/// A small shell running pipelines of commands with `<`, `>` and `|`
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "pipesh")]
pub struct Config {
	/// Run a single command line and exit with the status of its last stage
	#[arg(short = 'c', long = "command", value_name = "LINE")]
	pub command: Option<String>,

	/// Prompt printed before each line is read
	#[arg(long, default_value = DEFAULT_PROMPT)]
	pub prompt: String,
}

impl Default for Config {
	fn default() -> Config {
		Config { command: None, prompt: DEFAULT_PROMPT.to_string() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = Config::try_parse_from(["pipesh"]).unwrap();
		assert_eq!(config, Config::default());
	}

	#[test]
	fn one_shot_command() {
		let config = Config::try_parse_from(["pipesh", "-c", "ls | wc -l", "--prompt", "> "]).unwrap();
		assert_eq!(config.command.as_deref(), Some("ls | wc -l"));
		assert_eq!(config.prompt, "> ");
	}
}
