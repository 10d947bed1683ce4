//! System clipboard access via the OSC 52 escape sequence.
//!
//! Works over SSH and inside multiplexers that pass the sequence through.
//! Terminals that do not support OSC 52 drop it silently, so a reported
//! success only means the sequence was written.

use anyhow::{bail, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::{self, Write};

/// Refuse payloads some terminals would truncate mid-sequence
const MAX_COPY_BYTES: usize = 100_000;

/// Write `text` to the system clipboard selection.
pub fn copy(text: &str) -> Result<()> {
    if text.len() > MAX_COPY_BYTES {
        bail!("clipboard payload too large ({} bytes)", text.len());
    }

    let encoded = STANDARD.encode(text.as_bytes());
    let mut out = io::stdout().lock();
    write!(out, "\x1b]52;c;{}\x07", encoded)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversized_payload_rejected() {
        let big = "A".repeat(MAX_COPY_BYTES + 1);
        assert!(copy(&big).is_err());
    }
}
