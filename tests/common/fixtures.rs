//! Project and tool fixtures

pub const PYPROJECT: &str = r#"[project]
name = "demo"
version = "0.2.0"
description = "Demo extension"
dependencies = ["numpy>=1.26"]

[tool.nuwa]
nim-flags = ["-d:base"]

[tool.nuwa.profiles]
fast = ["--opt:speed"]

[tool.nuwa.watch]
debounce-ms = 100
"#;

pub const ENTRY_OK: &str = "import nimpy\n\nproc add(a, b: int): int {.exportpy.} = a + b\n";

/// The fake compiler fails on any source containing this marker
pub const FAIL_MARKER: &str = "BREAK";

pub const ENTRY_BROKEN: &str = "import nimpy\n\nproc add(a, b: int): int {.exportpy.} =\n  BREAK\n";

/// Stands in for `nim`: records its arguments, then writes `--out:` or
/// prints a diagnostic pointing at line 4 of the entry file.
pub const FAKE_NIM: &str = r#"#!/bin/sh
out=""
entry=""
for arg in "$@"; do
  case "$arg" in
    --out:*) out="${arg#--out:}" ;;
  esac
  entry="$arg"
done
if [ -n "$FAKE_NIM_LOG" ]; then
  echo "$@" >> "$FAKE_NIM_LOG"
fi
if grep -q BREAK "$entry"; then
  echo "$(basename "$entry")(4, 3) Error: undeclared identifier: 'BREAK'"
  exit 1
fi
echo "$(basename "$entry")(1, 8) Warning: imported and not used: 'nimpy' [UnusedImport]"
mkdir -p "$(dirname "$out")"
printf 'fake-binary' > "$out"
"#;

pub const FAKE_PYTHON: &str = r#"#!/bin/sh
echo '{"implementation":"cpython","major":3,"minor":12,"abiflags":"","soabi":"cpython-312-x86_64-linux-gnu","platform":"linux-x86_64"}'
"#;

pub const WHEEL_TAG: &str = "cp312-cp312-linux_x86_64";
