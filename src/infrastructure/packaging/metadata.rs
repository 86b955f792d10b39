//! Generated `.dist-info` text

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};

use crate::config::ProjectMetadata;
use crate::domain::value_objects::CompatibilityTag;

/// Distribution name as used in archive file names: lowercase, with runs of
/// `-`, `_` and `.` collapsed to a single `_`
pub fn normalize_dist_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            pending_sep = !out.is_empty();
            continue;
        }
        if pending_sep {
            out.push('_');
            pending_sep = false;
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Version as used in archive file names: lowercase, no leading `v`, and
/// `-` (the file name field separator) escaped to `_`
pub fn normalize_dist_version(version: &str) -> String {
    let version = version.trim();
    let version = version
        .strip_prefix(['v', 'V'])
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(version);
    version
        .chars()
        .map(|c| match c {
            '-' => '_',
            c if c.is_whitespace() => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

pub fn dist_info_dir(dist_name: &str, version: &str) -> String {
    format!("{dist_name}-{version}.dist-info")
}

pub fn wheel_file(tag: &CompatibilityTag) -> String {
    format!(
        "Wheel-Version: 1.0\nGenerator: nuwa {}\nRoot-Is-Purelib: false\nTag: {tag}\n",
        env!("CARGO_PKG_VERSION")
    )
}

pub fn metadata_file(name: &str, metadata: &ProjectMetadata) -> String {
    let mut out = format!(
        "Metadata-Version: 2.1\nName: {name}\nVersion: {}\n",
        metadata.version
    );
    if let Some(summary) = &metadata.summary {
        out.push_str(&format!("Summary: {}\n", summary.lines().next().unwrap_or("")));
    }
    if let Some(requires) = &metadata.requires_python {
        out.push_str(&format!("Requires-Python: {requires}\n"));
    }
    for dep in &metadata.dependencies {
        out.push_str(&format!("Requires-Dist: {dep}\n"));
    }
    for (extra, deps) in &metadata.optional_dependencies {
        out.push_str(&format!("Provides-Extra: {extra}\n"));
        for dep in deps {
            out.push_str(&format!("Requires-Dist: {}\n", with_extra_marker(dep, extra)));
        }
    }
    out
}

fn with_extra_marker(requirement: &str, extra: &str) -> String {
    match requirement.split_once(';') {
        Some((spec, marker)) => {
            format!("{}; ({}) and extra == '{extra}'", spec.trim(), marker.trim())
        }
        None => format!("{}; extra == '{extra}'", requirement.trim()),
    }
}

/// One `RECORD` row: `path,sha256=<digest>,<size>`
pub fn record_line(path: &str, content: &[u8]) -> String {
    let digest = URL_SAFE_NO_PAD.encode(Sha256::digest(content));
    format!("{path},sha256={digest},{}", content.len())
}

/// Full `RECORD` body; the record itself is listed last without a hash
pub fn record_file<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a [u8])>,
    record_path: &str,
) -> String {
    let mut out = String::new();
    for (path, content) in entries {
        out.push_str(&record_line(path, content));
        out.push('\n');
    }
    out.push_str(&format!("{record_path},,\n"));
    out
}
