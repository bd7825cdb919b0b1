//! Reading targets from files and stdin.

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Reads one target per line, skipping blank lines and `#` comments.
///
/// Lines that fail to decode are logged and skipped.
pub async fn read_targets<R: AsyncBufRead + Unpin>(reader: R) -> Vec<String> {
    let mut targets = Vec::new();
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read line from input: {e}");
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        targets.push(trimmed.to_string());
    }
    targets
}

/// Loads targets from `path`, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub async fn load_targets(path: &Path) -> Result<Vec<String>> {
    if path.as_os_str() == "-" {
        info!("Reading targets from stdin");
        return Ok(read_targets(BufReader::new(tokio::io::stdin())).await);
    }
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open input file {}", path.display()))?;
    let targets = read_targets(BufReader::new(file)).await;
    info!("Total targets in file: {}", targets.len());
    Ok(targets)
}
