use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{self, Pid};

pub trait WaitStatusExt {
	fn code(self) -> i32;
}

impl WaitStatusExt for WaitStatus {
	/// Shell-style status: the exit code, or 128 plus the signal number.
	fn code(self) -> i32 {
		match self {
			WaitStatus::Exited(_, code) => code,
			WaitStatus::Signaled(_, signal, _) => 128 + signal as i32,
			_ => 0,
		}
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Proccess {
	pub pid: Pid,
	pub status: Option<WaitStatus>,
}

/// The children of one command line, in the order they were spawned.
#[derive(Debug, Default)]
pub struct Job {
	pub proccesses: Vec<Proccess>,
}

impl Job {
	/// Reaps every child by its own pid, so statuses line up with spawn
	/// order no matter which child finishes first.
	pub fn wait(&mut self) -> Vec<i32> {
		for pr in self.proccesses.iter_mut().filter(|pr| pr.status.is_none()) {
			let status = loop {
				match waitpid(pr.pid, None) {
					Ok(s @ WaitStatus::Exited(..)) | Ok(s @ WaitStatus::Signaled(..)) => break s,
					Ok(_) | Err(Errno::EINTR) => continue,
					Err(e) => {
						warn!("waitpid {} failed: {}; reporting status 0", pr.pid, e);
						break WaitStatus::Exited(pr.pid, 0);
					},
				}
			};
			debug!("reaped {} with {:?}", pr.pid, status);
			pr.status = Some(status);
		}
		self.statuses()
	}

	pub fn statuses(&self) -> Vec<i32> {
		self.proccesses.iter().map(|pr| pr.status.map_or(0, |s| s.code())).collect()
	}
}

#[derive(Debug)]
pub struct JobBuilder {
	imp: Job,
}

impl JobBuilder {
	pub fn new(size_hint: usize) -> JobBuilder {
		JobBuilder {
			imp: Job { proccesses: Vec::with_capacity(size_hint) }
		}
	}

	pub fn push_fork(&mut self) -> nix::Result<unistd::ForkResult> {
		// the shell is single-threaded, so the child may allocate freely
		let r = unsafe { unistd::fork() }?;
		if let unistd::ForkResult::Parent { child } = r {
			debug!("spawned {}", child);
			self.imp.proccesses.push(Proccess { pid: child, status: None });
		}
		Ok(r)
	}

	pub fn len(&self) -> usize {
		self.imp.proccesses.len()
	}

	pub fn build(self) -> Job {
		self.imp
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use nix::sys::signal::Signal;

	#[test]
	fn status_codes() {
		let pid = Pid::from_raw(42);
		assert_eq!(WaitStatus::Exited(pid, 0).code(), 0);
		assert_eq!(WaitStatus::Exited(pid, 3).code(), 3);
		assert_eq!(WaitStatus::Signaled(pid, Signal::SIGKILL, false).code(), 137);
		assert_eq!(WaitStatus::Signaled(pid, Signal::SIGPIPE, false).code(), 141);
	}

	#[test]
	fn statuses_follow_spawn_order() {
		let (a, b) = (Pid::from_raw(10), Pid::from_raw(20));
		let job = Job {
			proccesses: vec![
				Proccess { pid: b, status: Some(WaitStatus::Exited(b, 2)) },
				Proccess { pid: a, status: Some(WaitStatus::Exited(a, 0)) },
			],
		};
		assert_eq!(job.statuses(), [2, 0]);
	}

	#[test]
	fn waiting_on_a_stranger_records_zero() {
		// pid 1 is never our child, so waitpid fails with ECHILD
		let init = Pid::from_raw(1);
		let mut job = Job { proccesses: vec![Proccess { pid: init, status: None }] };
		assert_eq!(job.wait(), [0]);
		assert_eq!(job.proccesses[0].status, Some(WaitStatus::Exited(init, 0)));
	}
}
