use std::ops::Deref;

/// Maximum number of arguments (program name included) a single command may carry.
pub const ARG_MAX: usize = 16;

/// Maximum length in bytes of one command line.
pub const CMDLINE_MAX: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectType { Input, Output }

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
	pub arguments: Vec<String>,
	pub input: Option<String>,
	pub output: Option<String>,
}

impl Command {
	pub fn name(&self) -> &str {
		self.arguments.first().map_or("", |s| s.as_str())
	}

	pub fn redirect(&self, typ: RedirectType) -> Option<&str> {
		match typ {
			RedirectType::Input => self.input.as_deref(),
			RedirectType::Output => self.output.as_deref(),
		}
	}

	pub(crate) fn set_redirect(&mut self, typ: RedirectType, target: &str) {
		let slot = match typ {
			RedirectType::Input => &mut self.input,
			RedirectType::Output => &mut self.output,
		};
		*slot = Some(target.to_owned());
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
	// never empty; `parser::parse` is the only constructor
	pub(crate) commands: Vec<Command>,
}

impl Pipeline {
	pub fn commands(&self) -> &[Command] {
		&self.commands
	}

	pub fn first(&self) -> &Command {
		&self.commands[0]
	}

	pub fn last(&self) -> &Command {
		&self.commands[self.commands.len() - 1]
	}
}

/// A pipeline whose redirections are well placed and whose redirect files can be opened.
/// Only `validate::validate` builds one.
#[derive(Debug)]
pub struct ValidPipeline(pub(crate) Pipeline);

impl Deref for ValidPipeline {
	type Target = Pipeline;

	fn deref(&self) -> &Pipeline {
		&self.0
	}
}
