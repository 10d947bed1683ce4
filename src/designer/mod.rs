//! Hand-off to the external primer designer command.
//!
//! The app never computes primers itself. A user-configured command receives
//! the normalized sequence on stdin, the product size range and tuning
//! parameters as arguments, and prints primer blocks on stdout.

use std::process::{Command, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

use crate::config::DesignerParams;

/// Hard cap on a design run; primer3-style searches can crawl on long inputs
pub const DESIGN_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum DesignerError {
    #[error("no designer command configured (set designer_command in config.toml)")]
    NotConfigured,
    #[error("designer command is empty")]
    EmptyCommand,
    #[error("designer timed out after {0:?}")]
    Timeout(Duration),
    #[error("designer failed: {0}")]
    Failed(String),
    #[error("designer task failed: {0}")]
    Task(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One block of designer output, shown as a copyable card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimerCard {
    pub title: String,
    pub body: String,
}

impl PrimerCard {
    /// Text placed on the clipboard when the card is copied
    pub fn copy_text(&self) -> String {
        format!("{}\n{}", self.title, self.body).trim().to_string()
    }
}

/// Run the designer over a validated submission and return its raw stdout.
pub async fn run(
    command: &str,
    sequence: &str,
    lower: u32,
    upper: u32,
    params: &DesignerParams,
) -> Result<String, DesignerError> {
    let mut words = command.split_whitespace().map(str::to_string);
    let program = words.next().ok_or(DesignerError::EmptyCommand)?;
    let mut args: Vec<String> = words.collect();

    args.push(format!("--product-size-range={}-{}", lower, upper));
    args.push(format!("--primer-tm={},{},{}", params.primer_min_tm, params.primer_opt_tm, params.primer_max_tm));
    args.push(format!("--probe-tm={},{},{}", params.probe_min_tm, params.probe_opt_tm, params.probe_max_tm));
    args.push(format!("--salt-mono={}", params.salt_mono));
    args.push(format!("--salt-div={}", params.salt_div));
    args.push(format!("--dntp={}", params.dntp_conc));

    let stdin_data = sequence.to_string();

    let result = timeout(DESIGN_TIMEOUT, tokio::task::spawn_blocking(move || {
        use std::io::Write;

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(stdin_data.as_bytes())?;
        }

        child.wait_with_output()
    }))
    .await;

    let output = match result {
        Ok(Ok(output)) => output?,
        Ok(Err(e)) => return Err(DesignerError::Task(e.to_string())),
        Err(_) => return Err(DesignerError::Timeout(DESIGN_TIMEOUT)),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr.lines().next().unwrap_or("non-zero exit").to_string();
        return Err(DesignerError::Failed(reason));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Split designer stdout into cards: blocks separated by blank lines, first
/// line of each block is the title.
pub fn parse_cards(output: &str) -> Vec<PrimerCard> {
    let mut cards = Vec::new();
    let mut title: Option<String> = None;
    let mut body: Vec<String> = Vec::new();

    let mut flush = |title: &mut Option<String>, body: &mut Vec<String>| {
        if let Some(t) = title.take() {
            cards.push(PrimerCard {
                title: t,
                body: body.join("\n"),
            });
        }
        body.clear();
    };

    for line in output.lines() {
        if line.trim().is_empty() {
            flush(&mut title, &mut body);
        } else if title.is_none() {
            title = Some(line.trim_end().to_string());
        } else {
            body.push(line.trim_end().to_string());
        }
    }
    flush(&mut title, &mut body);

    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cards_splits_on_blank_lines() {
        let output = "\
Primer set 1 (methylated)
Forward: TTAGGTTTCGTAGGTTTC
Reverse: AAACCCTAAACGAAAACG

Primer set 2 (unmethylated)
Forward: TTAGGTTTTGTAGGTTTT
Reverse: AAACCCTAAACAAAAACA
";
        let cards = parse_cards(output);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title, "Primer set 1 (methylated)");
        assert!(cards[0].body.contains("Reverse:"));
        assert_eq!(cards[1].title, "Primer set 2 (unmethylated)");
    }

    #[test]
    fn test_parse_cards_empty_and_trailing_blanks() {
        assert!(parse_cards("").is_empty());
        assert!(parse_cards("\n\n\n").is_empty());

        let cards = parse_cards("Only title\n\n\n");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].body, "");
    }

    #[test]
    fn test_copy_text_is_trimmed() {
        let card = PrimerCard {
            title: "Set 1".to_string(),
            body: "Forward: ACGT\n".to_string(),
        };
        assert_eq!(card.copy_text(), "Set 1\nForward: ACGT");
    }
}
