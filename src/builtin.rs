use std::env;
use std::io::Write;

use crate::error::RuntimeError;
use crate::global;

pub type Builtin = fn(&mut global::State, &[String], &mut dyn Write) -> Result<(), RuntimeError>;

fn write_line(out: &mut dyn Write, line: &dyn std::fmt::Display) -> Result<(), RuntimeError> {
	writeln!(out, "{}", line).and_then(|_| out.flush()).map_err(|_| RuntimeError::WriteFailed)
}

pub fn builtin_cd(_: &mut global::State, args: &[String], _: &mut dyn Write) -> Result<(), RuntimeError> {
	let dir = args.first().ok_or(RuntimeError::CannotChdir)?;
	env::set_current_dir(dir).map_err(|_| RuntimeError::CannotChdir)
}

pub fn builtin_pwd(_: &mut global::State, _: &[String], out: &mut dyn Write) -> Result<(), RuntimeError> {
	let cwd = env::current_dir().map_err(|_| RuntimeError::CannotChdir)?;
	write_line(out, &cwd.display())
}

pub fn builtin_pushd(state: &mut global::State, args: &[String], _: &mut dyn Write) -> Result<(), RuntimeError> {
	let dir = args.first().ok_or(RuntimeError::CannotChdir)?;
	state.dir_stack.pushd(dir)
}

pub fn builtin_popd(state: &mut global::State, _: &[String], _: &mut dyn Write) -> Result<(), RuntimeError> {
	state.dir_stack.popd()
}

pub fn builtin_dirs(state: &mut global::State, _: &[String], out: &mut dyn Write) -> Result<(), RuntimeError> {
	for frame in state.dir_stack.iter() {
		write_line(out, &frame.display())?;
	}
	Ok(())
}

pub fn match_builtin(name: &str) -> Option<Builtin> {
	match name {
		"cd" => Some(builtin_cd),
		"pwd" => Some(builtin_pwd),
		"pushd" => Some(builtin_pushd),
		"popd" => Some(builtin_popd),
		"dirs" => Some(builtin_dirs),
		_ => None,
	}
}
