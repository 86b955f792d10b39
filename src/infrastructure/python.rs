//! Runtime probe that asks the configured Python interpreter about itself

use std::process::Command;

use crate::domain::ports::RuntimeProbe;
use crate::domain::value_objects::RuntimeInfo;
use crate::error::{NuwaError, NuwaResult};

const PROBE_SCRIPT: &str = r#"
import json, platform, struct, sys, sysconfig

def first_platform_tag():
    for module in ("packaging.tags", "pip._vendor.packaging.tags"):
        try:
            tags = __import__(module, fromlist=["sys_tags"])
            return next(iter(tags.sys_tags())).platform
        except Exception:
            continue
    return None

print(json.dumps({
    "implementation": sys.implementation.name,
    "major": sys.version_info[0],
    "minor": sys.version_info[1],
    "abiflags": getattr(sys, "abiflags", "") or ("t" if sysconfig.get_config_var("Py_GIL_DISABLED") else ""),
    "soabi": sysconfig.get_config_var("SOABI"),
    "platform": sysconfig.get_platform(),
    "platform_tag": first_platform_tag(),
    "machine": platform.machine() or None,
    "mac_version": platform.mac_ver()[0] or None,
    "pointer_bits": struct.calcsize("P") * 8,
}))
"#;

#[derive(Debug, Clone)]
pub struct PythonProbe {
    interpreter: String,
}

impl PythonProbe {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl RuntimeProbe for PythonProbe {
    fn probe(&self) -> NuwaResult<RuntimeInfo> {
        let output = Command::new(&self.interpreter)
            .args(["-c", PROBE_SCRIPT])
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    NuwaError::environment(
                        self.interpreter.clone(),
                        "the Python interpreter is not installed or not on PATH",
                    )
                } else {
                    NuwaError::environment(self.interpreter.clone(), e.to_string())
                }
            })?;

        if !output.status.success() {
            return Err(NuwaError::environment(
                self.interpreter.clone(),
                format!(
                    "runtime probe failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
            .map_err(|message| NuwaError::environment(self.interpreter.clone(), message))
    }
}

/// Last non-empty line of the probe output, as JSON
fn parse_probe_output(stdout: &str) -> Result<RuntimeInfo, String> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| "runtime probe printed nothing".to_string())?;
    let info: RuntimeInfo =
        serde_json::from_str(line).map_err(|e| format!("unexpected runtime probe output: {e}"))?;
    tracing::debug!(?info, "probed Python runtime");
    Ok(info)
}
