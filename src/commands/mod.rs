use std::io::Read;
use std::path::{Path, PathBuf};

pub type CmdResult<T> = scaffold::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub root: PathBuf,
}

// ============================================================================
// JSON Input Parsing (CLI layer)
// ============================================================================

/// Read JSON spec from string, file (@path), or stdin (-).
fn read_json_spec_to_string(spec: &str) -> scaffold::Result<String> {
    use std::io::IsTerminal;

    if spec.trim() == "-" {
        let mut buf = String::new();
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(scaffold::Error::validation_invalid_argument(
                "json",
                "Cannot read JSON from stdin when stdin is a TTY",
                None,
                None,
            ));
        }
        stdin.read_to_string(&mut buf).map_err(|e| {
            scaffold::Error::internal_io(e.to_string(), Some("read stdin".to_string()))
        })?;
        return Ok(buf);
    }

    if let Some(path) = spec.strip_prefix('@') {
        if path.trim().is_empty() {
            return Err(scaffold::Error::validation_invalid_argument(
                "json",
                "Invalid JSON spec '@' (missing file path)",
                None,
                None,
            ));
        }
        return std::fs::read_to_string(Path::new(path)).map_err(|e| {
            scaffold::Error::internal_io(e.to_string(), Some(format!("read {}", path)))
        });
    }

    Ok(spec.to_string())
}

/// Parse a JSON spec (inline, @file, or -) into a typed value.
pub fn parse_json_spec<T: serde::de::DeserializeOwned>(spec: &str) -> scaffold::Result<T> {
    let raw = read_json_spec_to_string(spec)?;
    serde_json::from_str(&raw).map_err(|e| {
        scaffold::Error::validation_invalid_json(e, Some("parse JSON spec".to_string()))
    })
}

pub mod component;
pub mod versions;
