//! Compatibility Tag Value Object
//!
//! `{interpreter}-{abi}-{platform}` computed from a probed runtime. The tag is
//! a pure function of [`RuntimeInfo`]; nothing here looks at the host.
//!
//! The platform part prefers the interpreter's own most specific tag (the
//! first of `packaging.tags.sys_tags()`). Without it, the `sysconfig`
//! platform is corrected for what the interpreter really runs as: a
//! universal macOS build reports its fat architecture, and a 32-bit
//! interpreter on a 64-bit kernel reports the kernel's.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the runtime probe reports about the target interpreter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    /// `sys.implementation.name`, e.g. `cpython`, `pypy`
    pub implementation: String,
    pub major: u32,
    pub minor: u32,
    /// `sys.abiflags`; contains `t` on free-threaded builds
    #[serde(default)]
    pub abiflags: String,
    /// `sysconfig.get_config_var("SOABI")`
    #[serde(default)]
    pub soabi: Option<String>,
    /// `sysconfig.get_platform()`
    pub platform: String,
    /// Platform of the first `sys_tags()` entry, when `packaging` is importable
    #[serde(default)]
    pub platform_tag: Option<String>,
    /// `platform.machine()` as seen by the interpreter
    #[serde(default)]
    pub machine: Option<String>,
    /// `platform.mac_ver()[0]`, macOS only
    #[serde(default)]
    pub mac_version: Option<String>,
    /// Pointer width of the interpreter build
    #[serde(default)]
    pub pointer_bits: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CompatibilityTag {
    pub interpreter: String,
    pub abi: String,
    pub platform: String,
}

impl CompatibilityTag {
    pub fn from_runtime(info: &RuntimeInfo) -> Self {
        let version = format!("{}{}", info.major, info.minor);
        let implementation = info.implementation.to_ascii_lowercase();

        let interpreter = match implementation.as_str() {
            "cpython" => format!("cp{version}"),
            "pypy" => format!("pp{version}"),
            _ => format!("py{version}"),
        };

        let abi = if implementation == "cpython" {
            let flags: String = info
                .abiflags
                .chars()
                .filter(|c| c.is_ascii_alphabetic())
                .map(|c| c.to_ascii_lowercase())
                .collect();
            format!("cp{version}{flags}")
        } else {
            match info.soabi.as_deref().map(str::trim) {
                Some(soabi) if !soabi.is_empty() => normalize(soabi),
                _ => "none".to_string(),
            }
        };

        Self {
            interpreter,
            abi,
            platform: platform_tag(info),
        }
    }
}

fn platform_tag(info: &RuntimeInfo) -> String {
    if let Some(tag) = non_empty(info.platform_tag.as_deref()) {
        return normalize(tag);
    }

    let platform = normalize(&info.platform);
    if let Some(rest) = platform.strip_prefix("macosx_") {
        return macos_platform(rest, info);
    }
    if info.pointer_bits == Some(32) {
        match platform.as_str() {
            "linux_x86_64" => return "linux_i686".to_string(),
            "linux_aarch64" => return "linux_armv8l".to_string(),
            "win_amd64" => return "win32".to_string(),
            _ => {}
        }
    }
    platform
}

/// `rest` is `<major>_<minor>_<arch>` from a normalized `macosx-*` platform
fn macos_platform(rest: &str, info: &RuntimeInfo) -> String {
    let mut parts = rest.splitn(3, '_');
    let (Some(major), Some(minor), Some(arch)) = (parts.next(), parts.next(), parts.next()) else {
        return format!("macosx_{rest}");
    };

    let is_fat = matches!(arch, "universal" | "universal2" | "intel") || arch.starts_with("fat");
    let arch = match non_empty(info.machine.as_deref()) {
        Some(machine) if is_fat => normalize(machine),
        _ => arch.to_string(),
    };

    // The extension is built for the running macOS, not the interpreter's
    // deployment target. Since macOS 11 only the major version counts.
    let (major, minor) = match non_empty(info.mac_version.as_deref()).and_then(parse_mac_version) {
        Some((m, _)) if m >= 11 => (m, 0),
        Some(version) => version,
        None => {
            let major: u32 = major.parse().unwrap_or(10);
            let minor: u32 = minor.parse().unwrap_or(0);
            if arch == "arm64" && major < 11 {
                (11, 0)
            } else {
                (major, minor)
            }
        }
    };
    format!("macosx_{major}_{minor}_{arch}")
}

fn parse_mac_version(raw: &str) -> Option<(u32, u32)> {
    let mut parts = raw.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().and_then(|m| m.parse().ok()).unwrap_or(0);
    Some((major, minor))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['-', '.'], "_")
}

impl fmt::Display for CompatibilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.interpreter, self.abi, self.platform)
    }
}
