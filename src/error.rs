use std::{ffi, io};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
	#[error("missing command")]
	MissingCommand,
	#[error("no input file")]
	NoInputFile,
	#[error("no output file")]
	NoOutputFile,
	#[error("too many process arguments")]
	TooManyArguments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("mislocated output redirection")]
	MislocatedOutputRedirection,
	#[error("mislocated input redirection")]
	MislocatedInputRedirection,
	#[error("cannot open input file")]
	CannotOpenInputFile,
	#[error("cannot open output file")]
	CannotOpenOutputFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
	#[error("cannot cd into directory")]
	CannotChdir,
	#[error("directory stack empty")]
	DirectoryStackEmpty,
	#[error("command not found")]
	CommandNotFound,
	#[error("pipe creation failed")]
	PipeCreationFailed,
	#[error("cannot spawn process")]
	SpawnFailed,
	#[error("cannot write output")]
	WriteFailed,
}

/// Everything that can abandon a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShellError {
	#[error(transparent)]
	Parse(#[from] ParseError),
	#[error(transparent)]
	Validation(#[from] ValidationError),
	#[error(transparent)]
	Runtime(#[from] RuntimeError),
	#[error("command line too long")]
	LineTooLong,
}

/// OS-level failures while preparing a child for `exec`.
#[derive(Debug, Error)]
pub enum ExecError {
	#[error("Nix error: {0}")]
	NixError(#[from] nix::Error),
	#[error("IO error: {0}")]
	IoError(#[from] io::Error),
	#[error("Nul char error: {0}")]
	NulError(#[from] ffi::NulError),
	#[error(transparent)]
	Redirect(#[from] ValidationError),
}

/// Writes the one-line diagnostic for `e` to standard error.
pub fn report<E: std::fmt::Display>(e: &E) {
	eprintln!("Error: {}", e);
}
