use std::io;

use crate::config::Config;
use crate::dirstack::DirectoryStack;

pub struct State {
	pub dir_stack: DirectoryStack,
	pub config: Config,
}

impl State {
	pub fn new(config: Config) -> io::Result<State> {
		let dir_stack = DirectoryStack::from_current_dir()?;
		Ok(State { dir_stack: dir_stack, config: config })
	}
}
