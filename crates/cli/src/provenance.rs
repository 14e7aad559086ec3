use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Metadata used to generate a provenance sidecar.
pub struct Payload {
    pub params: Value,
    pub tag: Option<String>,
}

impl Payload {
    pub fn new(params: Value, tag: Option<String>) -> Self {
        Self { params, tag }
    }
}

/// Write `<artifact>.provenance.json` with the git commit, library version,
/// callsite, params, and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "locellipse_version": locellipse::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "tag": payload.tag,
        "params": payload.params,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    tracing::debug!(path = %provenance_path.display(), "provenance sidecar");
    Ok(provenance_path)
}

/// `<dir>/<stem>.provenance.json` next to the artifact.
fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map_or_else(|| OsString::from("artifact"), |s| s.to_os_string());
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Commit id from `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`,
/// else `"unknown"`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .filter(|rev| !rev.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok().filter(|rev| !rev.is_empty()));
    if let Some(rev) = from_env {
        return rev;
    }
    match Command::new("git").args(["rev-parse", "HEAD"]).output() {
        Ok(out) if out.status.success() => {
            if let Some(rev) = parse_rev(&out.stdout) {
                return rev;
            }
            tracing::debug!("git rev-parse printed no commit id");
        }
        Ok(out) => tracing::debug!(status = %out.status, "git rev-parse failed"),
        Err(err) => tracing::debug!(%err, "git not available"),
    }
    "unknown".to_string()
}

fn parse_rev(stdout: &[u8]) -> Option<String> {
    let rev = std::str::from_utf8(stdout).ok()?.trim();
    (!rev.is_empty()).then(|| rev.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn provenance_path_rewrites_extension() {
        let base = Path::new("/tmp/output/boundary.csv");
        let derived = provenance_path(base);
        assert_eq!(derived, Path::new("/tmp/output/boundary.provenance.json"));
    }

    #[test]
    fn provenance_path_handles_trailing_separator() {
        assert_eq!(
            provenance_path(Path::new("/tmp/out/")),
            Path::new("/tmp/out.provenance.json")
        );
    }

    #[test]
    fn parse_rev_trims_and_rejects_blank_output() {
        assert_eq!(parse_rev(b"abc123\n"), Some("abc123".to_string()));
        assert_eq!(parse_rev(b"  \n"), None);
        assert_eq!(parse_rev(&[0xff, 0xfe]), None);
        assert!(!current_git_rev().is_empty());
    }

    #[test]
    fn write_sidecar_records_tag_and_version() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("records.csv");
        fs::write(&artifact, "row\n").unwrap();
        let payload = Payload::new(json!({"command": "batch"}), Some("run-7".into()));
        let prov_path = write_sidecar(&artifact, payload).unwrap();
        assert!(prov_path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["tag"], "run-7");
        assert_eq!(parsed["params"]["command"], "batch");
        assert_eq!(parsed["locellipse_version"], locellipse::VERSION);
    }
}
