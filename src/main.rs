use std::io;
use std::process;
use io::{BufRead, IsTerminal, Write};

use anyhow::Context;
use clap::Parser;
use log::debug;

use pipesh::config::Config;
use pipesh::{error, eval, global};

/// Runs one line and prints its completion line. Returns the status of the
/// last stage, or `None` when the line was abandoned.
fn run_line(state: &mut global::State, line: &str) -> Option<i32> {
	match eval::eval_line(state, line) {
		Ok(statuses) => {
			eprintln!("{}", eval::completion_message(line, &statuses));
			statuses.last().copied()
		},
		Err(e) => {
			debug!("abandoned '{}': {:?}", line, e);
			error::report(&e);
			None
		},
	}
}

fn main() -> anyhow::Result<()> {
	env_logger::init();
	let config = Config::parse();
	let mut state = global::State::new(config.clone()).context("cannot read the current directory")?;

	if let Some(line) = config.command.as_deref() {
		let code = run_line(&mut state, line.trim()).unwrap_or(1);
		process::exit(code);
	}

	let mut stdout = io::stdout();
	let stdin = io::stdin();
	let echo = !stdin.is_terminal();
	let mut stdin_locked = stdin.lock();
	loop {
		let _ = stdout.write_all(state.config.prompt.as_bytes());
		let _ = stdout.flush();
		let mut buf: Vec<u8> = vec![];
		if stdin_locked.read_until(b'\n', &mut buf).context("cannot read command line")? == 0 {
			break;
		}
		if echo {
			let _ = stdout.write_all(&buf);
			if buf.last() != Some(&b'\n') {
				let _ = stdout.write_all(b"\n");
			}
			let _ = stdout.flush();
		}

		let buf = String::from_utf8_lossy(&buf);
		let line = buf.trim();
		if line.is_empty() {
			continue;
		}
		if line == "exit" {
			eprintln!("Bye...");
			eprintln!("{}", eval::completion_message(line, &[0]));
			break;
		}
		run_line(&mut state, line);
	}
	Ok(())
}
