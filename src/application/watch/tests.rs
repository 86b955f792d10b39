//! Tests for the watch module

use super::event::{WatchEvent, WatchOptions};
use super::runner::{TestOutcome, WatchRunner};
use super::use_case::WatchUseCase;
use crate::application::pipeline::ConfigRequest;
use crate::config::EffectiveConfig;
use crate::domain::entities::{BuildResult, Diagnostic, Severity, SourceUnit};
use crate::domain::value_objects::OsFamily;
use crate::error::{NuwaError, NuwaResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::{tempdir, TempDir};

// === Fake runner ===

/// How the next gated build ends
enum Gate {
    Succeed,
    Fail,
    BadConfig,
    MissingCompiler,
}

#[derive(Default)]
struct Counters {
    builds: AtomicUsize,
    published: AtomicUsize,
    terminated: AtomicUsize,
    tests: Mutex<Vec<String>>,
}

struct FakeRunner {
    request: ConfigRequest,
    gate: Mutex<Receiver<Gate>>,
    counters: Arc<Counters>,
}

impl FakeRunner {
    fn new(root: &Path) -> (Self, Sender<Gate>, Arc<Counters>) {
        let (tx, rx) = mpsc::channel();
        let counters = Arc::new(Counters::default());
        let runner = Self {
            request: ConfigRequest::new(root),
            gate: Mutex::new(rx),
            counters: Arc::clone(&counters),
        };
        (runner, tx, counters)
    }
}

impl WatchRunner for FakeRunner {
    fn resolve(&self) -> NuwaResult<EffectiveConfig> {
        self.request.resolve().map(|(config, _)| config)
    }

    fn build(&self, config: &EffectiveConfig) -> NuwaResult<(SourceUnit, BuildResult)> {
        self.counters.builds.fetch_add(1, Ordering::SeqCst);
        let gate = self
            .gate
            .lock()
            .unwrap()
            .recv()
            .map_err(|_| NuwaError::config("gate closed"))?;

        let entry = crate::application::discovery::canonical(&config.source_path().join("demo_lib.nim"));
        let unit = SourceUnit::new(entry.clone(), [entry.clone()]);
        let result = match gate {
            Gate::Succeed => BuildResult {
                success: true,
                artifacts: vec![config.project_root.join("build/nuwa/develop/demo_lib.so")],
                exit_code: Some(0),
                duration: Duration::from_millis(5),
                ..BuildResult::default()
            },
            Gate::Fail => BuildResult {
                success: false,
                diagnostics: vec![Diagnostic::new(Severity::Error, entry, 3, 7, "type mismatch")],
                exit_code: Some(1),
                ..BuildResult::default()
            },
            Gate::BadConfig => return Err(NuwaError::config("unknown profile 'fast'")),
            Gate::MissingCompiler => return Err(NuwaError::environment("nim", "not on PATH")),
        };
        Ok((unit, result))
    }

    fn publish(&self, config: &EffectiveConfig, result: &BuildResult) -> NuwaResult<Option<PathBuf>> {
        assert!(result.success);
        self.counters.published.fetch_add(1, Ordering::SeqCst);
        Ok(Some(config.inplace_artifact(OsFamily::host())))
    }

    fn run_tests(&self, command: &str, _cwd: &Path) -> NuwaResult<TestOutcome> {
        self.counters.tests.lock().unwrap().push(command.to_string());
        Ok(TestOutcome {
            success: true,
            exit_code: Some(0),
            output: "1 passed\n".to_string(),
            duration: Duration::from_millis(1),
        })
    }

    fn terminate(&self) -> NuwaResult<bool> {
        self.counters.terminated.fetch_add(1, Ordering::SeqCst);
        Ok(false)
    }
}

// === Harness ===

#[derive(Clone, Default)]
struct Events(Arc<Mutex<Vec<WatchEvent>>>);

impl Events {
    fn push(&self, event: WatchEvent) {
        self.0.lock().unwrap().push(event);
    }

    fn snapshot(&self) -> Vec<WatchEvent> {
        self.0.lock().unwrap().clone()
    }

    fn wait_for(&self, what: &str, pred: impl Fn(&WatchEvent) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if self.snapshot().iter().any(&pred) {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("timed out waiting for {what}: {:?}", self.snapshot());
    }

    fn completed_generations(&self) -> Vec<u64> {
        self.snapshot()
            .iter()
            .filter_map(|e| match e {
                WatchEvent::BuildComplete { generation, .. } => Some(*generation),
                _ => None,
            })
            .collect()
    }
}

struct Harness {
    project: TempDir,
    gate: Sender<Gate>,
    counters: Arc<Counters>,
    changes: Sender<PathBuf>,
    running: Arc<AtomicBool>,
    events: Events,
    handle: thread::JoinHandle<NuwaResult<()>>,
}

const PYPROJECT: &str = "[project]\nname = \"demo\"\n[tool.nuwa.watch]\ndebounce-ms = 50\n";

impl Harness {
    fn start(options: impl FnOnce(WatchOptions) -> WatchOptions) -> Self {
        Self::start_with(PYPROJECT, options)
    }

    fn start_with(pyproject: &str, options: impl FnOnce(WatchOptions) -> WatchOptions) -> Self {
        let project = tempdir().unwrap();
        fs::write(project.path().join("pyproject.toml"), pyproject).unwrap();
        fs::create_dir_all(project.path().join("nim")).unwrap();
        fs::write(project.path().join("nim/demo_lib.nim"), "proc add*(a, b: int): int = a + b\n").unwrap();

        let (runner, gate, counters) = FakeRunner::new(project.path());
        let config = runner.resolve().unwrap();
        let use_case = WatchUseCase::new(
            options(WatchOptions::new(ConfigRequest::new(project.path()))),
            runner,
        );

        let (changes, change_rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let events = Events::default();
        let handle = {
            let running = Arc::clone(&running);
            let events = events.clone();
            thread::spawn(move || {
                use_case.run_loop(config, &change_rx, &running, &|event: WatchEvent| events.push(event))
            })
        };

        Self {
            project,
            gate,
            counters,
            changes,
            running,
            events,
            handle,
        }
    }

    fn touch(&self, relative: &str, content: &str) {
        let path = self.project.path().join(relative);
        fs::write(&path, content).unwrap();
        self.changes.send(path).unwrap();
    }

    fn stop(self) -> (NuwaResult<()>, Events, Arc<Counters>) {
        self.running.store(false, Ordering::SeqCst);
        let result = self.handle.join().unwrap();
        (result, self.events, self.counters)
    }
}

fn is_build_started(generation: u64) -> impl Fn(&WatchEvent) -> bool {
    move |e| matches!(e, WatchEvent::BuildStarted { generation: g } if *g == generation)
}

// === WatchUseCase tests ===

#[test]
fn test_stale_generation_is_discarded() {
    let harness = Harness::start(|o| o);
    harness.events.wait_for("first build", is_build_started(1));

    // Generation 2 is queued while 1 compiles, and its debounce expires
    harness.touch("nim/extra.nim", "");
    harness
        .events
        .wait_for("file change", |e| matches!(e, WatchEvent::FileChanged { .. }));
    thread::sleep(Duration::from_millis(200));
    assert!(!harness.events.snapshot().iter().any(is_build_started(2)));

    // 1 finishes late: dropped without a report, then 2 runs
    harness.gate.send(Gate::Succeed).unwrap();
    harness.events.wait_for("second build", is_build_started(2));
    assert!(harness.events.completed_generations().is_empty());
    assert_eq!(harness.counters.published.load(Ordering::SeqCst), 0);

    harness.gate.send(Gate::Succeed).unwrap();
    harness
        .events
        .wait_for("completion", |e| matches!(e, WatchEvent::BuildComplete { .. }));

    let (result, events, counters) = harness.stop();
    result.unwrap();
    assert_eq!(events.completed_generations(), vec![2]);
    assert_eq!(counters.builds.load(Ordering::SeqCst), 2);
    assert_eq!(counters.published.load(Ordering::SeqCst), 1);
    assert!(matches!(events.snapshot().last(), Some(WatchEvent::Shutdown)));
}

#[test]
fn test_failed_build_skips_tests_and_keeps_watching() {
    let harness = Harness::start(|o| o.with_run_tests(true).with_test_command(Some("pytest -q".to_string())));
    harness.events.wait_for("first build", is_build_started(1));
    harness.gate.send(Gate::Fail).unwrap();
    harness.events.wait_for("failed build", |e| {
        matches!(e, WatchEvent::BuildComplete { success: false, errors: 1, .. })
    });
    assert!(harness.counters.tests.lock().unwrap().is_empty());

    harness.touch("nim/demo_lib.nim", "proc add*(a, b: int): int = a - b\n");
    harness.events.wait_for("rebuild", is_build_started(2));
    harness.gate.send(Gate::Succeed).unwrap();
    harness
        .events
        .wait_for("tests", |e| matches!(e, WatchEvent::TestsComplete { success: true, .. }));

    let (result, events, counters) = harness.stop();
    result.unwrap();
    assert_eq!(*counters.tests.lock().unwrap(), vec!["pytest -q".to_string()]);
    assert_eq!(events.completed_generations(), vec![1, 2]);
}

#[test]
fn test_identical_save_does_not_rebuild() {
    let harness = Harness::start(|o| o);
    harness.events.wait_for("first build", is_build_started(1));
    harness.gate.send(Gate::Succeed).unwrap();
    harness
        .events
        .wait_for("completion", |e| matches!(e, WatchEvent::BuildComplete { .. }));

    harness.touch("nim/demo_lib.nim", "proc add*(a, b: int): int = a + b\n");
    thread::sleep(Duration::from_millis(300));

    let (result, events, counters) = harness.stop();
    result.unwrap();
    assert_eq!(counters.builds.load(Ordering::SeqCst), 1);
    assert!(!events
        .snapshot()
        .iter()
        .any(|e| matches!(e, WatchEvent::FileChanged { .. })));
}

#[test]
fn test_config_error_is_reported_not_fatal() {
    let harness = Harness::start(|o| o);
    harness.events.wait_for("first build", is_build_started(1));
    harness.gate.send(Gate::BadConfig).unwrap();
    harness
        .events
        .wait_for("build error", |e| matches!(e, WatchEvent::BuildError { generation: 1, .. }));

    let (result, _, _) = harness.stop();
    result.unwrap();
}

#[test]
fn test_missing_compiler_ends_watch() {
    let harness = Harness::start(|o| o);
    harness.events.wait_for("first build", is_build_started(1));
    harness.gate.send(Gate::MissingCompiler).unwrap();

    let result = harness.handle.join().unwrap();
    assert!(matches!(result, Err(NuwaError::Environment { .. })));
    let events = harness.events.snapshot();
    assert!(events.iter().any(|e| matches!(e, WatchEvent::Error { .. })));
    assert!(matches!(events.last(), Some(WatchEvent::Shutdown)));
}

#[test]
fn test_config_change_aborts_in_flight_build_when_enabled() {
    let pyproject = format!("{PYPROJECT}abort-on-config-change = true\n");
    let harness = Harness::start_with(&pyproject, |o| o);
    harness.events.wait_for("first build", is_build_started(1));

    harness.touch("pyproject.toml", &format!("{pyproject}test-command = \"pytest -x\"\n"));
    harness
        .events
        .wait_for("config change", |e| matches!(e, WatchEvent::FileChanged { .. }));
    assert_eq!(harness.counters.terminated.load(Ordering::SeqCst), 1);

    // The killed compile comes back as a failure for a stale generation
    harness.gate.send(Gate::Fail).unwrap();
    harness.events.wait_for("rebuild", is_build_started(2));
    harness.gate.send(Gate::Succeed).unwrap();
    harness
        .events
        .wait_for("completion", |e| matches!(e, WatchEvent::BuildComplete { .. }));

    let (result, events, _) = harness.stop();
    result.unwrap();
    assert_eq!(events.completed_generations(), vec![2]);
}

#[test]
fn test_config_change_queues_without_abort_by_default() {
    let harness = Harness::start(|o| o);
    harness.events.wait_for("first build", is_build_started(1));

    harness.touch("pyproject.toml", &format!("{PYPROJECT}test-command = \"pytest -x\"\n"));
    harness
        .events
        .wait_for("config change", |e| matches!(e, WatchEvent::FileChanged { .. }));
    assert_eq!(harness.counters.terminated.load(Ordering::SeqCst), 0);

    harness.gate.send(Gate::Succeed).unwrap();
    harness.events.wait_for("rebuild", is_build_started(2));
    harness.gate.send(Gate::Succeed).unwrap();
    harness
        .events
        .wait_for("completion", |e| matches!(e, WatchEvent::BuildComplete { .. }));

    let (result, events, _) = harness.stop();
    result.unwrap();
    assert_eq!(events.completed_generations(), vec![2]);
}

// === Stop with a live child ===

#[cfg(unix)]
struct SupervisedRunner {
    request: ConfigRequest,
    supervisor: crate::infrastructure::compiler::ProcessSupervisor,
    build_script: Option<String>,
}

#[cfg(unix)]
fn sh(script: &str) -> std::process::Command {
    let mut command = std::process::Command::new("sh");
    command.args(["-c", script]);
    command
}

#[cfg(unix)]
impl WatchRunner for SupervisedRunner {
    fn resolve(&self) -> NuwaResult<EffectiveConfig> {
        self.request.resolve().map(|(config, _)| config)
    }

    fn build(&self, config: &EffectiveConfig) -> NuwaResult<(SourceUnit, BuildResult)> {
        let entry = crate::application::discovery::canonical(&config.source_path().join("demo_lib.nim"));
        let unit = SourceUnit::new(entry.clone(), [entry]);
        let success = match &self.build_script {
            Some(script) => self.supervisor.run(&mut sh(script))?.success(),
            None => true,
        };
        let result = BuildResult {
            success,
            artifacts: vec![config.project_root.join("build/nuwa/develop/demo_lib.so")],
            ..BuildResult::default()
        };
        Ok((unit, result))
    }

    fn publish(&self, config: &EffectiveConfig, _result: &BuildResult) -> NuwaResult<Option<PathBuf>> {
        Ok(Some(config.inplace_artifact(OsFamily::host())))
    }

    fn run_tests(&self, command: &str, cwd: &Path) -> NuwaResult<TestOutcome> {
        let output = self.supervisor.run(sh(command).current_dir(cwd))?;
        Ok(TestOutcome {
            success: output.success(),
            exit_code: output.exit_code,
            output: output.output,
            duration: output.duration,
        })
    }

    fn terminate(&self) -> NuwaResult<bool> {
        self.supervisor.terminate().map_err(|e| NuwaError::Watch {
            message: e.to_string(),
        })
    }
}

/// Start the loop, wait until `ready` holds and a child is running, then stop.
/// Returns how long stopping took.
#[cfg(unix)]
fn stop_with_live_child(
    project: &Path,
    build_script: Option<String>,
    options: impl FnOnce(WatchOptions) -> WatchOptions,
    ready: impl Fn(&WatchEvent) -> bool,
) -> (Duration, NuwaResult<()>, Vec<WatchEvent>, crate::infrastructure::compiler::ProcessSupervisor) {
    fs::write(project.join("pyproject.toml"), PYPROJECT).unwrap();
    fs::create_dir_all(project.join("nim")).unwrap();
    fs::write(project.join("nim/demo_lib.nim"), "proc add*(a, b: int): int = a + b\n").unwrap();

    let supervisor = crate::infrastructure::compiler::ProcessSupervisor::new();
    let runner = SupervisedRunner {
        request: ConfigRequest::new(project),
        supervisor: supervisor.clone(),
        build_script,
    };
    let config = runner.resolve().unwrap();
    let use_case = WatchUseCase::new(options(WatchOptions::new(ConfigRequest::new(project))), runner);

    let (_changes, change_rx) = mpsc::channel::<PathBuf>();
    let running = Arc::new(AtomicBool::new(true));
    let events = Events::default();
    let handle = {
        let running = Arc::clone(&running);
        let events = events.clone();
        thread::spawn(move || {
            use_case.run_loop(config, &change_rx, &running, &|event: WatchEvent| events.push(event))
        })
    };

    events.wait_for("child phase", &ready);
    let deadline = Instant::now() + Duration::from_secs(10);
    while supervisor.pid().is_none() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(supervisor.pid().is_some(), "no child started");
    thread::sleep(Duration::from_millis(100));

    let stopping = Instant::now();
    running.store(false, Ordering::SeqCst);
    let result = handle.join().unwrap();
    (stopping.elapsed(), result, events.snapshot(), supervisor)
}

#[cfg(unix)]
#[test]
fn test_stop_during_build_kills_compiler_tree() {
    let project = tempdir().unwrap();
    let marker = project.path().join("compiled-late");
    let script = format!("sleep 2; touch '{}'", marker.display());

    let (elapsed, result, events, supervisor) =
        stop_with_live_child(project.path(), Some(script), |o| o, is_build_started(1));

    result.unwrap();
    assert!(elapsed < Duration::from_millis(1500), "stop took {elapsed:?}");
    assert!(!supervisor.is_running());
    assert!(matches!(events.last(), Some(WatchEvent::Shutdown)));
    assert!(!events.iter().any(|e| matches!(e, WatchEvent::BuildComplete { .. })));

    thread::sleep(Duration::from_millis(2500));
    assert!(!marker.exists());
}

#[cfg(unix)]
#[test]
fn test_stop_during_tests_kills_test_command_tree() {
    let project = tempdir().unwrap();
    let marker = project.path().join("tested-late");
    let script = format!("sleep 2; touch '{}'", marker.display());

    let (elapsed, result, events, supervisor) = stop_with_live_child(
        project.path(),
        None,
        |o| o.with_run_tests(true).with_test_command(Some(script)),
        |e| matches!(e, WatchEvent::TestsStarted { .. }),
    );

    result.unwrap();
    assert!(elapsed < Duration::from_millis(1500), "stop took {elapsed:?}");
    assert!(!supervisor.is_running());
    assert!(matches!(events.last(), Some(WatchEvent::Shutdown)));
    assert!(!events.iter().any(|e| matches!(e, WatchEvent::TestsComplete { .. })));

    thread::sleep(Duration::from_millis(2500));
    assert!(!marker.exists());
}

// === WatchEvent tests ===

#[test]
fn test_watch_event_to_json_file_changed() {
    let event = WatchEvent::FileChanged {
        path: "nim/helpers.nim".to_string(),
    };
    let json: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
    assert_eq!(json["event"], "file_changed");
    assert_eq!(json["command"], "watch");
    assert_eq!(json["path"], "nim/helpers.nim");
    assert!(json["timestamp"].is_string());
}

#[test]
fn test_watch_event_build_complete_counts() {
    let result = BuildResult {
        success: false,
        diagnostics: vec![
            Diagnostic::new(Severity::Error, "demo_lib.nim", 3, 7, "type mismatch"),
            Diagnostic::new(Severity::Warning, "demo_lib.nim", 1, 1, "unused import"),
            Diagnostic::new(Severity::Hint, "demo_lib.nim", 2, 1, "XDeclaredButNotUsed"),
        ],
        duration: Duration::from_millis(1250),
        ..BuildResult::default()
    };
    let json: serde_json::Value =
        serde_json::from_str(&WatchEvent::build_complete(4, &result, None).to_json()).unwrap();
    assert_eq!(json["event"], "build_complete");
    assert_eq!(json["generation"], 4);
    assert_eq!(json["errors"], 1);
    assert_eq!(json["warnings"], 1);
    assert_eq!(json["duration_ms"], 1250);
    assert!(json["artifact"].is_null());
    assert_eq!(json["diagnostics"][0]["message"], "type mismatch");
}

#[test]
fn test_watch_event_to_json_error_escapes() {
    let event = WatchEvent::Error {
        message: "Something \"failed\"".to_string(),
    };
    let json = event.to_json();
    assert!(json.contains("\"event\":\"error\""));
    assert!(json.contains("\\\"failed\\\""));
}
