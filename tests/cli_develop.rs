//! Integration tests for `nuwa develop`.
#![cfg(unix)]

mod common;

use common::*;

#[test]
fn develop_places_library_inside_package() {
    let env = TestEnv::demo();

    let result = env.run(&["develop"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert_eq!(
        std::fs::read_to_string(env.project_path("demo/demo_lib.so")).unwrap(),
        "fake-binary"
    );
    assert!(result.stdout.contains("Develop Complete"));
    assert!(result.stderr.contains("imported and not used"));
}

#[test]
fn develop_passes_flags_in_precedence_order() {
    let env = TestEnv::demo();

    let result = env.run(&["develop", "--profile", "fast", "--nim-flag", "-d:cli"]);
    assert!(result.is_success(), "{}", result.combined_output());

    let log = std::fs::read_to_string(env.compiler_log()).unwrap();
    let args: Vec<&str> = log.lines().next().unwrap().split(' ').collect();
    let pos = |flag: &str| args.iter().position(|a| *a == flag).unwrap();
    assert_eq!(args[0], "c");
    assert!(pos("-d:base") < pos("--opt:speed"));
    assert!(pos("--opt:speed") < pos("-d:cli"));
    assert!(!args.contains(&"-d:release"));
    assert!(args.last().unwrap().ends_with("demo_lib.nim"));
}

#[test]
fn develop_release_adds_release_define() {
    let env = TestEnv::demo();

    assert!(env.run(&["develop", "--release"]).is_success());

    let log = std::fs::read_to_string(env.compiler_log()).unwrap();
    assert!(log.contains("-d:release"));
    assert!(log.contains("build/nuwa/release/demo_lib.so"));
}

#[test]
fn develop_compile_failure_exits_one_and_keeps_old_artifact() {
    let env = TestEnv::demo();
    env.write_project_file("demo/demo_lib.so", "previous");
    env.write_project_file("nim/demo_lib.nim", ENTRY_BROKEN);

    let result = env.run(&["develop"]);

    assert_eq!(result.exit_code, 1, "{}", result.combined_output());
    assert!(result.stderr.contains("undeclared identifier: 'BREAK'"));
    // Source excerpt around line 4
    assert!(result.stderr.contains("4 |   BREAK"));
    assert_eq!(
        std::fs::read_to_string(env.project_path("demo/demo_lib.so")).unwrap(),
        "previous"
    );
}

#[test]
fn develop_json_emits_single_result_event() {
    let env = TestEnv::demo();
    env.write_project_file("nim/demo_lib.nim", ENTRY_BROKEN);

    let result = env.run(&["develop", "--json"]);

    assert_eq!(result.exit_code, 1);
    let events = result.json_lines();
    assert_eq!(events.len(), 1, "{}", result.stdout);
    let event = &events[0];
    assert_eq!(event["event"], "result");
    assert_eq!(event["command"], "develop");
    assert_eq!(event["success"], false);
    assert_eq!(event["errors"], 1);
    let diagnostic = &event["diagnostics"][0];
    assert_eq!(diagnostic["severity"], "error");
    assert_eq!(diagnostic["line"], 4);
    assert_eq!(diagnostic["column"], 3);
    assert!(diagnostic["file"].as_str().unwrap().ends_with("demo_lib.nim"));
}

#[test]
fn develop_missing_compiler_exits_three() {
    let env = TestEnv::demo();

    let result = env.run_with_env(&["develop"], &[("NUWA_COMPILER", "/nonexistent/nim")]);

    assert_eq!(result.exit_code, 3, "{}", result.combined_output());
    assert!(result.stderr.contains("MISSING TOOL"));
}

#[test]
fn develop_unknown_profile_is_config_error() {
    let env = TestEnv::demo();

    let result = env.run(&["develop", "--profile", "nope", "--json"]);

    assert_eq!(result.exit_code, 2);
    let events = result.json_lines();
    assert_eq!(events[0]["event"], "error");
    assert_eq!(events[0]["exit_code"], 2);
    assert!(events[0]["message"].as_str().unwrap().contains("nope"));
    assert!(!env.compiler_log().exists());
}

#[test]
fn develop_ambiguous_entry_point_is_config_error() {
    let env = TestEnv::empty();
    env.write_project_file("pyproject.toml", "[project]\nname = \"demo\"\n");
    env.write_project_file("nim/one.nim", ENTRY_OK);
    env.write_project_file("nim/two.nim", ENTRY_OK);

    let result = env.run(&["develop"]);

    assert_eq!(result.exit_code, 2, "{}", result.combined_output());
    assert!(result.stderr.contains("one.nim"));
    assert!(result.stderr.contains("two.nim"));
}

#[test]
fn develop_warns_about_unknown_config_keys() {
    let env = TestEnv::demo();
    env.write_project_file(
        "pyproject.toml",
        "[project]\nname = \"demo\"\n\n[tool.nuwa]\nnim-flag = [\"-d:x\"]\n",
    );

    let result = env.run(&["develop"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(result.stderr.contains("Unknown config key 'tool.nuwa.nim-flag'"));
    assert!(result.stderr.contains("Did you mean 'nim-flags'?"));
}

#[test]
fn develop_finds_project_root_from_subdirectory() {
    let env = TestEnv::demo();

    let result = env.run(&["develop", "-C", "nim"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(env.project_path("demo/demo_lib.so").exists());
}
