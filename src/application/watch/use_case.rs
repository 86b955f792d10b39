//! Watch Use Case implementation
//!
//! One loop thread owns the [`WatchSession`]; a worker thread runs the
//! long-latency steps (resolve, discover, compile, test) so change events
//! keep advancing the generation counter while a build is in flight.
//! Publication happens on the loop thread after the staleness check, which
//! makes it the only writer of the in-place artifact.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::EffectiveConfig;
use crate::domain::entities::{BuildResult, SourceUnit};
use crate::error::{NuwaError, NuwaResult};

use super::event::{WatchEvent, WatchOptions};
use super::runner::{TestOutcome, WatchRunner};
use super::session::{Finished, StartBuild, WatchSession};
use super::tracked::{ChangeKind, TrackedFiles};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

enum Job {
    Build { generation: u64 },
    Test { command: String, cwd: PathBuf },
}

struct Built {
    config: EffectiveConfig,
    unit: SourceUnit,
    result: BuildResult,
}

enum Message {
    Built {
        generation: u64,
        outcome: NuwaResult<Built>,
    },
    Tested(NuwaResult<TestOutcome>),
}

/// Watch Use Case
///
/// Entry point for `nuwa watch`.
pub struct WatchUseCase<R: WatchRunner> {
    options: WatchOptions,
    runner: Arc<R>,
}

impl<R: WatchRunner> WatchUseCase<R> {
    pub fn new(options: WatchOptions, runner: R) -> Self {
        Self {
            options,
            runner: Arc::new(runner),
        }
    }

    /// Start watching (blocking)
    ///
    /// Returns once `running` is cleared and any in-flight child has been
    /// terminated, or early on an environment error.
    pub fn start<F>(&self, running: Arc<AtomicBool>, on_event: F) -> NuwaResult<()>
    where
        F: Fn(WatchEvent),
    {
        let config = self.runner.resolve()?;
        let root = config.project_root.clone();

        on_event(WatchEvent::WatchStarted {
            project: root.display().to_string(),
            watching: vec![
                config.config_file().display().to_string(),
                config.source_path().display().to_string(),
            ],
            debounce_ms: config.watch.debounce.as_millis() as u64,
        });

        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    for path in event.paths {
                        let _ = tx.send(path);
                    }
                }
            },
            notify::Config::default(),
        )
        .map_err(watch_error)?;
        // The source directory may be recreated, so watch from the root
        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(watch_error)?;

        self.run_loop(config, &rx, &running, &on_event)
    }

    /// Event loop without the filesystem watcher attached
    pub(crate) fn run_loop<F>(
        &self,
        config: EffectiveConfig,
        changes: &Receiver<PathBuf>,
        running: &AtomicBool,
        on_event: &F,
    ) -> NuwaResult<()>
    where
        F: Fn(WatchEvent),
    {
        let (job_tx, job_rx) = mpsc::channel();
        let (msg_tx, msg_rx) = mpsc::channel();
        let worker = spawn_worker(Arc::clone(&self.runner), job_rx, msg_tx);

        let mut state = LoopState {
            tracked: TrackedFiles::new(
                &config.config_file(),
                &config.source_path(),
                self.options.watch_all_sources,
            ),
            session: WatchSession::new(config.watch.debounce, self.test_command(&config)),
            config,
            jobs: job_tx,
        };

        let first = state.session.start();
        state.dispatch_build(first, on_event);

        let mut outcome = Ok(());
        'outer: while running.load(Ordering::SeqCst) {
            if let Ok(path) = changes.recv_timeout(POLL_INTERVAL) {
                self.on_path(&mut state, path, on_event);
                while let Ok(path) = changes.try_recv() {
                    self.on_path(&mut state, path, on_event);
                }
            }

            loop {
                match msg_rx.try_recv() {
                    Ok(message) => {
                        if let Err(e) = self.on_message(&mut state, message, on_event) {
                            outcome = Err(e);
                            break 'outer;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        outcome = Err(NuwaError::Watch {
                            message: "build worker exited unexpectedly".to_string(),
                        });
                        break 'outer;
                    }
                }
            }

            if let Some(start) = state.session.poll(Instant::now()) {
                state.dispatch_build(start, on_event);
            }
        }

        drop(state);
        let stopped = self.stop_worker(worker);
        on_event(WatchEvent::Shutdown);
        stopped.and(outcome)
    }

    fn test_command(&self, config: &EffectiveConfig) -> Option<String> {
        if !self.options.run_tests {
            return None;
        }
        let command = self
            .options
            .test_command
            .as_deref()
            .unwrap_or(&config.watch.test_command)
            .trim();
        (!command.is_empty()).then(|| command.to_string())
    }

    fn on_path<F>(&self, state: &mut LoopState, path: PathBuf, on_event: &F)
    where
        F: Fn(WatchEvent),
    {
        let Some(kind) = state.tracked.classify(&path) else {
            return;
        };
        tracing::debug!(path = %path.display(), ?kind, "change accepted");

        if kind == ChangeKind::Config
            && state.config.watch.abort_on_config_change
            && state.session.is_busy()
        {
            match self.runner.terminate() {
                Ok(killed) => tracing::info!(killed, "config changed, aborting in-flight child"),
                Err(e) => on_event(WatchEvent::Error {
                    message: e.to_string(),
                }),
            }
        }

        on_event(WatchEvent::FileChanged {
            path: display_relative(&path, &state.config.project_root),
        });
        state.session.on_change(path, Instant::now());
    }

    fn on_message<F>(&self, state: &mut LoopState, message: Message, on_event: &F) -> NuwaResult<()>
    where
        F: Fn(WatchEvent),
    {
        match message {
            Message::Built {
                generation,
                outcome,
            } => {
                if generation != state.session.generation() {
                    tracing::debug!(
                        generation,
                        latest = state.session.generation(),
                        "discarding stale build result"
                    );
                    state.session.on_build_finished(generation, false);
                    return Ok(());
                }
                self.on_current_build(state, generation, outcome, on_event)
            }
            Message::Tested(result) => {
                match result {
                    Ok(outcome) => on_event(WatchEvent::TestsComplete {
                        success: outcome.success,
                        exit_code: outcome.exit_code,
                        duration_ms: outcome.duration.as_millis() as u64,
                        output: outcome.output,
                    }),
                    Err(e) => on_event(WatchEvent::Error {
                        message: e.to_string(),
                    }),
                }
                state.session.on_tests_finished();
                Ok(())
            }
        }
    }

    fn on_current_build<F>(
        &self,
        state: &mut LoopState,
        generation: u64,
        outcome: NuwaResult<Built>,
        on_event: &F,
    ) -> NuwaResult<()>
    where
        F: Fn(WatchEvent),
    {
        let built = match outcome {
            Ok(built) => built,
            Err(e @ NuwaError::Environment { .. }) => {
                on_event(WatchEvent::Error {
                    message: e.to_string(),
                });
                return Err(e);
            }
            Err(e) => {
                state.session.on_build_finished(generation, false);
                on_event(WatchEvent::BuildError {
                    generation,
                    message: e.to_string(),
                });
                return Ok(());
            }
        };

        state.tracked.update(&built.config.source_path(), &built.unit);
        state.session.set_debounce(built.config.watch.debounce);
        state.session.set_test_command(self.test_command(&built.config));
        state.config = built.config;

        let artifact = if built.result.success {
            match self.runner.publish(&state.config, &built.result) {
                Ok(artifact) => artifact,
                Err(e) => {
                    state.session.on_build_finished(generation, false);
                    on_event(WatchEvent::BuildError {
                        generation,
                        message: e.to_string(),
                    });
                    return Ok(());
                }
            }
        } else {
            None
        };

        let success = built.result.success && artifact.is_some();
        on_event(WatchEvent::build_complete(generation, &built.result, artifact));

        if let Finished::Current { run_tests: true } =
            state.session.on_build_finished(generation, success)
        {
            if let Some(command) = state.session.test_command().map(str::to_string) {
                on_event(WatchEvent::TestsStarted {
                    command: command.clone(),
                });
                state.send(Job::Test {
                    command,
                    cwd: state.config.project_root.clone(),
                });
            }
        }
        Ok(())
    }

    /// Terminate until the worker has drained; a job may spawn a new child
    /// between two attempts.
    fn stop_worker(&self, worker: JoinHandle<()>) -> NuwaResult<()> {
        while !worker.is_finished() {
            self.runner.terminate()?;
            thread::sleep(POLL_INTERVAL);
        }
        worker.join().map_err(|_| NuwaError::Watch {
            message: "build worker panicked".to_string(),
        })
    }
}

struct LoopState {
    config: EffectiveConfig,
    tracked: TrackedFiles,
    session: WatchSession,
    jobs: Sender<Job>,
}

impl LoopState {
    fn dispatch_build<F>(&mut self, start: StartBuild, on_event: &F)
    where
        F: Fn(WatchEvent),
    {
        tracing::info!(
            generation = start.generation,
            changes = start.changes.len(),
            "starting build"
        );
        on_event(WatchEvent::BuildStarted {
            generation: start.generation,
        });
        self.send(Job::Build {
            generation: start.generation,
        });
    }

    fn send(&self, job: Job) {
        // The worker only exits once this sender is dropped
        let _ = self.jobs.send(job);
    }
}

fn spawn_worker<R: WatchRunner>(
    runner: Arc<R>,
    jobs: Receiver<Job>,
    results: Sender<Message>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for job in jobs {
            let message = match job {
                Job::Build { generation } => Message::Built {
                    generation,
                    outcome: build_generation(runner.as_ref()),
                },
                Job::Test { command, cwd } => Message::Tested(runner.run_tests(&command, &cwd)),
            };
            if results.send(message).is_err() {
                break;
            }
        }
    })
}

/// Configuration and discovery are redone from scratch for every generation
fn build_generation<R: WatchRunner>(runner: &R) -> NuwaResult<Built> {
    let config = runner.resolve()?;
    let (unit, result) = runner.build(&config)?;
    Ok(Built {
        config,
        unit,
        result,
    })
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(crate::application::discovery::canonical(root))
        .unwrap_or(path)
        .display()
        .to_string()
}

fn watch_error(e: notify::Error) -> NuwaError {
    NuwaError::Watch {
        message: format!("cannot watch project: {e}"),
    }
}
