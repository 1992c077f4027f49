//! Directory stack used by `pushd`, `popd` and `dirs`.
//!
//! The pairing is deliberately asymmetric: `pushd` records the directory it
//! *enters*, and `popd` returns to the frame *below* the top before dropping
//! the top. With the initial directory as the bottom frame, `pushd a; popd`
//! therefore lands back where the shell was before `pushd`.

use std::env;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::RuntimeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryStack {
	// bottom first; the top frame is the last element
	frames: Vec<PathBuf>,
}

impl DirectoryStack {
	pub fn new(initial: PathBuf) -> DirectoryStack {
		DirectoryStack { frames: vec![initial] }
	}

	/// A stack whose only frame is the process's current working directory.
	pub fn from_current_dir() -> std::io::Result<DirectoryStack> {
		Ok(DirectoryStack::new(env::current_dir()?))
	}

	#[cfg(test)]
	pub(crate) fn len(&self) -> usize {
		self.frames.len()
	}

	/// The frame `popd` would return to.
	pub fn below_top(&self) -> Option<&Path> {
		let len = self.frames.len();
		if len < 2 {
			None
		} else {
			Some(self.frames[len - 2].as_path())
		}
	}

	/// Frames from top to bottom.
	pub fn iter(&self) -> impl Iterator<Item = &Path> {
		self.frames.iter().rev().map(|p| p.as_path())
	}

	fn push_frame(&mut self, dir: PathBuf) {
		self.frames.push(dir);
	}

	fn pop_frame(&mut self) -> Option<PathBuf> {
		if self.frames.len() < 2 {
			None
		} else {
			self.frames.pop()
		}
	}

	/// Enters `dir` and records the directory actually entered as the new top.
	pub fn pushd(&mut self, dir: &str) -> Result<(), RuntimeError> {
		env::set_current_dir(dir).map_err(|_| RuntimeError::CannotChdir)?;
		let entered = env::current_dir().unwrap_or_else(|_| PathBuf::from(dir));
		debug!("pushd {}", entered.display());
		self.push_frame(entered);
		Ok(())
	}

	/// Returns to the frame below the top, then drops the top frame.
	/// Nothing changes if the stack holds only one frame or the change of
	/// directory fails.
	pub fn popd(&mut self) -> Result<(), RuntimeError> {
		let target = self.below_top().ok_or(RuntimeError::DirectoryStackEmpty)?;
		env::set_current_dir(target).map_err(|_| RuntimeError::CannotChdir)?;
		if let Some(dropped) = self.pop_frame() {
			debug!("popd dropped {}", dropped.display());
		}
		Ok(())
	}
}
