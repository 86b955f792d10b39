//! Child process supervision
//!
//! Runs one child at a time with stdout and stderr drained on reader threads
//! and merged in arrival order. Another thread may call
//! [`ProcessSupervisor::terminate`] to kill and reap the child; no timeout is
//! ever applied here.
//!
//! Each child leads its own process group (a process tree on Windows), so
//! terminating it also ends whatever it spawned: the C compiler under `nim`,
//! or the test runner under `sh -c`. Survivors would otherwise hold the
//! output pipes open and keep `run` blocked.

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured result of one supervised child
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Merged stdout and stderr
    pub output: String,
    pub duration: Duration,
    /// True when [`ProcessSupervisor::terminate`] ended the child
    pub terminated: bool,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.terminated
    }
}

#[derive(Debug, Default)]
struct Slot {
    child: Option<Child>,
    /// Exit status collected by `terminate`
    reaped: Option<ExitStatus>,
}

/// Shared handle; clones refer to the same slot
#[derive(Debug, Clone, Default)]
pub struct ProcessSupervisor {
    slot: Arc<Mutex<Slot>>,
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // A panic while holding the lock cannot leave the slot inconsistent
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Spawn `command` and block until it exits or is terminated
    pub fn run(&self, command: &mut Command) -> io::Result<ProcessOutput> {
        let started = Instant::now();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        isolate(command);

        let mut child = command.spawn()?;
        let (tx, rx) = mpsc::channel::<String>();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_reader(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_reader(stderr, tx.clone()));
        }
        drop(tx);

        {
            let mut slot = self.lock();
            slot.reaped = None;
            slot.child = Some(child);
        }

        let (status, terminated) = loop {
            {
                let mut slot = self.lock();
                match slot.child.as_mut() {
                    Some(child) => {
                        if let Some(status) = child.try_wait()? {
                            slot.child = None;
                            break (status, false);
                        }
                    }
                    None => match slot.reaped.take() {
                        Some(status) => break (status, true),
                        None => {
                            return Err(io::Error::other("supervised child vanished"));
                        }
                    },
                }
            }
            thread::sleep(POLL_INTERVAL);
        };

        for reader in readers {
            let _ = reader.join();
        }
        let output: Vec<String> = rx.into_iter().collect();

        Ok(ProcessOutput {
            exit_code: status.code(),
            output: output.concat(),
            duration: started.elapsed(),
            terminated,
        })
    }

    /// Kill the running child, if any, and wait for it.
    ///
    /// Returns true when a child was running.
    pub fn terminate(&self) -> io::Result<bool> {
        let mut slot = self.lock();
        let Some(mut child) = slot.child.take() else {
            return Ok(false);
        };
        tracing::debug!(pid = child.id(), "terminating child process tree");
        if let Err(e) = kill_tree(&child) {
            tracing::warn!(pid = child.id(), error = %e, "failed to signal process group");
        }
        if let Err(e) = child.kill() {
            // Already exited between polls
            if e.kind() != io::ErrorKind::InvalidInput {
                slot.child = Some(child);
                return Err(e);
            }
        }
        let status = child.wait()?;
        slot.reaped = Some(status);
        Ok(true)
    }

    pub fn is_running(&self) -> bool {
        self.lock().child.is_some()
    }

    /// Pid of the running child, which is also its process group id on Unix
    pub fn pid(&self) -> Option<u32> {
        self.lock().child.as_ref().map(Child::id)
    }
}

#[cfg(unix)]
fn isolate(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn isolate(_command: &mut Command) {}

/// SIGKILL the child's whole process group. The group outlives a leader that
/// has not been reaped yet, so this is safe until `wait` runs.
#[cfg(unix)]
fn kill_tree(child: &Child) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let pgid = i32::try_from(child.id()).map_err(io::Error::other)?;
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(io::Error::from(e)),
    }
}

#[cfg(windows)]
fn kill_tree(child: &Child) -> io::Result<()> {
    let status = Command::new("taskkill")
        .args(["/T", "/F", "/PID", &child.id().to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if !status.success() {
        tracing::debug!(pid = child.id(), ?status, "taskkill did not end the tree");
    }
    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn kill_tree(_child: &Child) -> io::Result<()> {
    Ok(())
}

fn spawn_reader<R: Read + Send + 'static>(
    stream: R,
    tx: mpsc::Sender<String>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if tx.send(String::from_utf8_lossy(&buf).into_owned()).is_err() {
                        break;
                    }
                }
            }
        }
    })
}
