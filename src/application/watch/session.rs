//! Watch session state machine
//!
//! Pure bookkeeping for the watch loop: debounce deadlines, the build
//! generation counter, and which finished builds are stale. Time is passed
//! in so transitions can be tested without sleeping.
//!
//! ```text
//! Idle -> Debouncing -> Building -> (Testing) -> Idle
//! ```
//!
//! Every accepted change bumps the generation. A build is tagged with the
//! generation current when it started; if the counter moved while it ran,
//! its result is stale.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Debouncing { deadline: Instant },
    Building { generation: u64 },
    Testing { generation: u64 },
}

/// What the loop should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartBuild {
    pub generation: u64,
    /// Changes collected since the previous build started
    pub changes: Vec<PathBuf>,
}

/// Verdict on a finished build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finished {
    /// Newer changes arrived while building; drop the result
    Stale,
    /// Latest generation; `run_tests` says whether to enter Testing
    Current { run_tests: bool },
}

#[derive(Debug, Clone)]
pub struct WatchSession {
    phase: Phase,
    generation: u64,
    debounce: Duration,
    pending: BTreeSet<PathBuf>,
    /// Deadline for the next generation when changes arrive mid-build
    queued: Option<Instant>,
    test_command: Option<String>,
}

impl WatchSession {
    pub fn new(debounce: Duration, test_command: Option<String>) -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
            debounce,
            pending: BTreeSet::new(),
            queued: None,
            test_command,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn test_command(&self) -> Option<&str> {
        self.test_command.as_deref()
    }

    /// Settings may change with every re-resolved configuration
    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn set_test_command(&mut self, command: Option<String>) {
        self.test_command = command;
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Building { .. } | Phase::Testing { .. })
    }

    /// First build on start, without waiting for a debounce window
    pub fn start(&mut self) -> StartBuild {
        self.generation += 1;
        self.phase = Phase::Building {
            generation: self.generation,
        };
        StartBuild {
            generation: self.generation,
            changes: Vec::new(),
        }
    }

    /// Record an accepted change. While idle or debouncing the timer is
    /// (re)started; while busy the next generation is queued instead.
    pub fn on_change(&mut self, path: PathBuf, now: Instant) {
        self.generation += 1;
        self.pending.insert(path);
        let deadline = now + self.debounce;
        match self.phase {
            Phase::Idle | Phase::Debouncing { .. } => {
                self.phase = Phase::Debouncing { deadline };
            }
            Phase::Building { .. } | Phase::Testing { .. } => {
                self.queued = Some(deadline);
            }
        }
    }

    /// Start a build once the debounce window has passed
    pub fn poll(&mut self, now: Instant) -> Option<StartBuild> {
        let Phase::Debouncing { deadline } = self.phase else {
            return None;
        };
        if now < deadline {
            return None;
        }
        self.phase = Phase::Building {
            generation: self.generation,
        };
        Some(StartBuild {
            generation: self.generation,
            changes: std::mem::take(&mut self.pending).into_iter().collect(),
        })
    }

    /// A build tagged `generation` finished
    pub fn on_build_finished(&mut self, generation: u64, success: bool) -> Finished {
        if generation != self.generation {
            self.resume_queued();
            return Finished::Stale;
        }
        let run_tests = success && self.test_command.is_some();
        self.phase = if run_tests {
            Phase::Testing { generation }
        } else {
            Phase::Idle
        };
        Finished::Current { run_tests }
    }

    pub fn on_tests_finished(&mut self) {
        self.resume_queued();
    }

    fn resume_queued(&mut self) {
        self.phase = match self.queued.take() {
            Some(deadline) => Phase::Debouncing { deadline },
            None => Phase::Idle,
        };
    }
}
