use std::convert::Infallible;
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;

use log::{debug, warn};
use nix::fcntl::OFlag;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::unistd;

use crate::builtin;
use crate::error::{self, ExecError, RuntimeError, ShellError, ValidationError};
use crate::global;
use crate::job;
use crate::parser;
use crate::types::*;
use crate::validate;

struct Pipe {
	read: OwnedFd,
	write: OwnedFd,
}

/// All `count` pipes are created before anything is forked. They are
/// close-on-exec, so a stage only keeps the ends it `dup2`s into place.
fn create_pipes(count: usize) -> Result<Vec<Pipe>, RuntimeError> {
	let mut pipes = Vec::with_capacity(count);
	for _ in 0 .. count {
		let (read, write) = unistd::pipe2(OFlag::O_CLOEXEC).map_err(|e| {
			warn!("pipe2 failed: {}", e);
			RuntimeError::PipeCreationFailed
		})?;
		pipes.push(Pipe { read: read, write: write });
	}
	Ok(pipes)
}

fn open_redirect(typ: RedirectType, path: &str) -> Result<File, ValidationError> {
	match typ {
		RedirectType::Input => File::open(path).map_err(|_| ValidationError::CannotOpenInputFile),
		RedirectType::Output => OpenOptions::new().write(true).create(true).truncate(true).mode(0o644).open(path)
			.map_err(|_| ValidationError::CannotOpenOutputFile),
	}
}

fn redirect_file(file: File, to: RawFd) -> Result<(), ExecError> {
	let fd = file.into_raw_fd();
	unistd::dup2(fd, to)?;
	if fd != to {
		unistd::close(fd)?;
	}
	Ok(())
}

/// Explicit redirections win over the pipe on the same end.
fn wire_stage(command: &Command, i: usize, pipes: &[Pipe]) -> Result<(), ExecError> {
	let is_first = i == 0;
	let is_last = i == pipes.len();

	match command.redirect(RedirectType::Input) {
		Some(path) => redirect_file(open_redirect(RedirectType::Input, path)?, libc::STDIN_FILENO)?,
		None if !is_first => { unistd::dup2(pipes[i - 1].read.as_raw_fd(), libc::STDIN_FILENO)?; },
		None => {},
	}
	match command.redirect(RedirectType::Output) {
		Some(path) => redirect_file(open_redirect(RedirectType::Output, path)?, libc::STDOUT_FILENO)?,
		None if !is_last => { unistd::dup2(pipes[i].write.as_raw_fd(), libc::STDOUT_FILENO)?; },
		None => {},
	}
	Ok(())
}

fn do_exec_command(command: &Command) -> Result<Infallible, ExecError> {
	let argv: Vec<CString> = command.arguments.iter()
		.map(|s| CString::new(s.as_str()))
		.collect::<Result<_, _>>()?;
	// the shell itself ignores SIGPIPE; programs expect the default
	unsafe { signal::signal(Signal::SIGPIPE, SigHandler::SigDfl) }?;
	Ok(unistd::execvp(&argv[0], argv.as_slice())?)
}

fn exec_command(command: &Command, i: usize, pipes: Vec<Pipe>) -> ! {
	if let Err(e) = wire_stage(command, i, &pipes) {
		error::report(&e);
		unsafe { libc::_exit(1) }
	}
	drop(pipes);

	if let Err(e) = do_exec_command(command) {
		debug!("exec {} failed: {}", command.name(), e);
	}
	error::report(&RuntimeError::CommandNotFound);
	unsafe { libc::_exit(1) }
}

fn spawn_commands(pipeline: &Pipeline, job_builder: &mut job::JobBuilder) -> Result<(), RuntimeError> {
	let pipes = create_pipes(pipeline.commands.len() - 1)?;
	let _ = io::stdout().flush();

	for (i, command) in pipeline.commands.iter().enumerate() {
		match job_builder.push_fork() {
			Ok(unistd::ForkResult::Parent { .. }) => {},
			Ok(unistd::ForkResult::Child) => exec_command(command, i, pipes),
			Err(e) => {
				warn!("fork failed after {} of {} stages: {}", job_builder.len(), pipeline.commands.len(), e);
				return Err(RuntimeError::SpawnFailed);
			},
		}
	}
	// dropping `pipes` closes every parent copy, so readers see end-of-stream
	Ok(())
}

fn run_pipeline(pipeline: &Pipeline) -> Result<Vec<i32>, RuntimeError> {
	let mut job_builder = job::JobBuilder::new(pipeline.commands.len());
	let spawned = spawn_commands(pipeline, &mut job_builder);
	let statuses = job_builder.build().wait();
	debug!("statuses {:?}", statuses);
	spawned.map(|_| statuses)
}

fn run_builtin(state: &mut global::State, func: builtin::Builtin, command: &Command) -> Result<(), ShellError> {
	let args = &command.arguments[1 ..];
	match command.redirect(RedirectType::Output) {
		Some(path) => {
			let mut file = open_redirect(RedirectType::Output, path)?;
			func(state, args, &mut file)?;
			file.flush().map_err(|_| RuntimeError::WriteFailed)?;
		},
		None => {
			let stdout = io::stdout();
			let mut out = stdout.lock();
			func(state, args, &mut out)?;
			out.flush().map_err(|_| RuntimeError::WriteFailed)?;
		},
	}
	Ok(())
}

/// Runs a validated pipeline and returns one status per stage, in stage order.
///
/// A single stage naming a builtin runs inside the shell; anything else is
/// forked stage by stage. A failing builtin is reported here and yields 1.
pub fn eval(state: &mut global::State, pipeline: &ValidPipeline) -> Result<Vec<i32>, RuntimeError> {
	let commands = &pipeline.commands;
	assert!(!commands.is_empty());

	if commands.len() == 1 {
		if let Some(func) = builtin::match_builtin(commands[0].name()) {
			let status = match run_builtin(state, func, &commands[0]) {
				Ok(()) => 0,
				Err(e) => {
					warn!("builtin {} failed: {}", commands[0].name(), e);
					error::report(&e);
					1
				},
			};
			return Ok(vec![status]);
		}
	}
	run_pipeline(pipeline)
}

/// Parses, validates and runs one line.
pub fn eval_line(state: &mut global::State, line: &str) -> Result<Vec<i32>, ShellError> {
	if line.len() > CMDLINE_MAX {
		return Err(ShellError::LineTooLong);
	}
	let pipeline = validate::validate(parser::parse(line)?)?;
	Ok(eval(state, &pipeline)?)
}

pub fn completion_message(line: &str, statuses: &[i32]) -> String {
	let mut message = format!("+ completed '{}' ", line);
	for status in statuses {
		message.push_str(&format!("[{}]", status));
	}
	message
}
