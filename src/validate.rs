use std::fs;
use std::os::unix::fs::OpenOptionsExt;

use crate::error::ValidationError;
use crate::types::*;

type ValidateResult<T> = Result<T, ValidationError>;

fn check_placement(pipeline: &Pipeline) -> ValidateResult<()> {
	let commands = &pipeline.commands;
	let last = commands.len() - 1;

	if commands[.. last].iter().any(|c| c.output.is_some()) {
		return Err(ValidationError::MislocatedOutputRedirection);
	}
	if last > 0 && commands[last].input.is_some() {
		return Err(ValidationError::MislocatedInputRedirection);
	}
	if last > 1 {
		for command in &commands[1 .. last] {
			if command.output.is_some() {
				return Err(ValidationError::MislocatedOutputRedirection);
			} else if command.input.is_some() {
				return Err(ValidationError::MislocatedInputRedirection);
			}
		}
	}
	Ok(())
}

/// Opens (without truncating) the redirect files so an unreadable input or an
/// unwritable output is reported before anything is spawned.
fn check_files(pipeline: &Pipeline) -> ValidateResult<()> {
	if let Some(path) = pipeline.first().input.as_deref() {
		fs::File::open(path).map_err(|_| ValidationError::CannotOpenInputFile)?;
	}
	if let Some(path) = pipeline.last().output.as_deref() {
		fs::OpenOptions::new().write(true).create(true).mode(0o644).open(path)
			.map_err(|_| ValidationError::CannotOpenOutputFile)?;
	}
	Ok(())
}

pub fn validate(pipeline: Pipeline) -> ValidateResult<ValidPipeline> {
	check_placement(&pipeline)?;
	check_files(&pipeline)?;
	Ok(ValidPipeline(pipeline))
}
