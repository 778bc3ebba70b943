pub mod access;
pub mod batches;
pub mod transfer;
pub mod users;

use std::io::Write;
use std::path::PathBuf;

use serde_json::Value;

/// Request body from `--json` or `-f <file>`.
pub fn read_body(json_body: Option<String>, file: Option<PathBuf>) -> anyhow::Result<Value> {
    let body = if let Some(path) = file {
        std::fs::read_to_string(&path)?
    } else if let Some(json) = json_body {
        json
    } else {
        anyhow::bail!("Provide --json or -f <file>.");
    };
    parse_json(&body)
}

pub fn parse_json(body: &str) -> anyhow::Result<Value> {
    serde_json::from_str(body).map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))
}

/// Ask on stderr, read y/N from stdin.
pub fn confirm() -> anyhow::Result<bool> {
    eprint!("Are you sure? [y/N]: ");
    std::io::stderr().flush()?;
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    if s.trim().eq_ignore_ascii_case("y") {
        Ok(true)
    } else {
        println!("Cancelled.");
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_from_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.json");
        std::fs::write(&path, r#"{"from": "file"}"#).unwrap();

        let body = read_body(Some(r#"{"from": "flag"}"#.into()), Some(path)).unwrap();
        assert_eq!(body["from"], "file");
    }

    #[test]
    fn body_required_and_must_parse() {
        assert!(read_body(None, None).is_err());
        let err = read_body(Some("{nope".into()), None).unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON"));
    }
}
