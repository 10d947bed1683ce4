//! Submission gate for the primer design form.
//!
//! Two ordered checks with early exit: the product size range first, then the
//! sequence. An invalid range stops the pipeline before the sequence is
//! looked at, so only one error is ever reported per attempt. These mirror
//! the constraints the designer backend enforces, so anything accepted here
//! is safe to hand off.

use regex::Regex;
use std::sync::OnceLock;

use super::DEFAULT_SIZE_RANGE;

/// Lowest product size the designer will accept
const MIN_LOWER_BOUND: u32 = 50;

pub const RANGE_FORMAT_MSG: &str =
    "⚠ Please enter a valid product size range like '70-150' (min ≥ 50 and min < max).";
pub const SEQUENCE_CHARS_MSG: &str = "⚠ Please enter a valid DNA sequence (A/T/C/G only).";

fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+-\d+$").unwrap())
}

fn sequence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ACGT]+$").unwrap())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Sequence,
    SizeRange,
}

/// Inline error attached to the field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Result of the size-range stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeCheck {
    Valid { lower: u32, upper: u32 },
    Invalid,
}

/// Result of the whole pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted {
        /// Trimmed, uppercased sequence ready for hand-off
        sequence: String,
        lower: u32,
        upper: u32,
    },
    Rejected(FieldError),
}

/// Resolve the raw size-range field: an empty or whitespace-only value falls
/// back to the default. A malformed non-empty value is kept as-is so the
/// range check can reject it.
pub fn resolve_size_range(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_SIZE_RANGE
    } else {
        trimmed
    }
}

/// Stage one: syntactic and semantic check of the resolved size range.
///
/// Valid means `<lower>-<upper>` with `lower >= 50` and `upper > lower`
/// strictly. Equal bounds are rejected even though the format matches.
pub fn check_size_range(resolved: &str) -> RangeCheck {
    if !range_re().is_match(resolved) {
        return RangeCheck::Invalid;
    }

    // Format guarantees exactly one '-' between digit runs
    let (lo, hi) = match resolved.split_once('-') {
        Some(pair) => pair,
        None => return RangeCheck::Invalid,
    };
    let (lower, upper) = match (lo.parse::<u32>(), hi.parse::<u32>()) {
        (Ok(l), Ok(u)) => (l, u),
        _ => return RangeCheck::Invalid,
    };

    if lower < MIN_LOWER_BOUND || upper <= lower {
        RangeCheck::Invalid
    } else {
        RangeCheck::Valid { lower, upper }
    }
}

/// Full pipeline over the two raw field values.
///
/// Ordering matters: a rejected range returns before the sequence is checked
/// at all, and the effective minimum length only exists when the range stage
/// passed. Within the sequence stage, character validity is checked before
/// length, so a short sequence with bad characters reports the character
/// error.
pub fn validate_submission(raw_sequence: &str, raw_size_range: &str) -> Outcome {
    let sequence = raw_sequence.trim().to_uppercase();
    let resolved = resolve_size_range(raw_size_range);

    let (lower, upper) = match check_size_range(resolved) {
        RangeCheck::Valid { lower, upper } => (lower, upper),
        RangeCheck::Invalid => {
            return Outcome::Rejected(FieldError {
                field: FormField::SizeRange,
                message: RANGE_FORMAT_MSG.to_string(),
            });
        }
    };

    if !sequence_re().is_match(&sequence) {
        return Outcome::Rejected(FieldError {
            field: FormField::Sequence,
            message: SEQUENCE_CHARS_MSG.to_string(),
        });
    }

    let min_len = lower as usize;
    if sequence.len() < min_len {
        return Outcome::Rejected(FieldError {
            field: FormField::Sequence,
            message: format!(
                "⚠ Sequence must be at least {} bp to match the minimum product size.",
                min_len
            ),
        });
    }

    Outcome::Accepted {
        sequence,
        lower,
        upper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bases(n: usize) -> String {
        "ACGT".chars().cycle().take(n).collect()
    }

    #[test]
    fn test_empty_range_defaults() {
        assert_eq!(resolve_size_range(""), "70-150");
        assert_eq!(resolve_size_range("   "), "70-150");
        // Malformed non-empty input is NOT defaulted
        assert_eq!(resolve_size_range("junk"), "junk");
    }

    #[test]
    fn test_range_format_rejections() {
        for bad in ["70-150-200", "70150", "70 - 150", "abc", "70-", "-150", "70--150"] {
            assert_eq!(check_size_range(bad), RangeCheck::Invalid, "{bad}");
        }
    }

    #[test]
    fn test_range_bounds() {
        // Lower below 50
        assert_eq!(check_size_range("40-100"), RangeCheck::Invalid);
        // Equal bounds: strict inequality required
        assert_eq!(check_size_range("100-100"), RangeCheck::Invalid);
        // Inverted
        assert_eq!(check_size_range("150-70"), RangeCheck::Invalid);
        // Boundary accepted
        assert_eq!(
            check_size_range("50-51"),
            RangeCheck::Valid { lower: 50, upper: 51 }
        );
        assert_eq!(
            check_size_range("70-150"),
            RangeCheck::Valid { lower: 70, upper: 150 }
        );
    }

    #[test]
    fn test_bad_range_skips_sequence_check() {
        // Sequence is garbage too, but the range error is the one reported
        let outcome = validate_submission("NNNN", "40-100");
        match outcome {
            Outcome::Rejected(err) => {
                assert_eq!(err.field, FormField::SizeRange);
                assert_eq!(err.message, RANGE_FORMAT_MSG);
            }
            Outcome::Accepted { .. } => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_sequence_normalized_but_too_short() {
        // Mixed case trims and uppercases first, then fails the length gate
        let outcome = validate_submission("  acgtACGT ", "");
        match outcome {
            Outcome::Rejected(err) => {
                assert_eq!(err.field, FormField::Sequence);
                assert!(err.message.contains("at least 70 bp"), "{}", err.message);
            }
            Outcome::Accepted { .. } => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_invalid_characters_beat_length() {
        // Long enough for the default range, but carries an N
        let seq = format!("{}N", bases(80));
        let outcome = validate_submission(&seq, "");
        match outcome {
            Outcome::Rejected(err) => {
                assert_eq!(err.field, FormField::Sequence);
                assert_eq!(err.message, SEQUENCE_CHARS_MSG);
            }
            Outcome::Accepted { .. } => panic!("expected rejection"),
        }

        // Same message for a short invalid sequence
        match validate_submission("ACGTN", "") {
            Outcome::Rejected(err) => assert_eq!(err.message, SEQUENCE_CHARS_MSG),
            Outcome::Accepted { .. } => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_empty_sequence_rejected() {
        match validate_submission("", "70-150") {
            Outcome::Rejected(err) => assert_eq!(err.field, FormField::Sequence),
            Outcome::Accepted { .. } => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_exact_minimum_accepted() {
        let seq = bases(70).to_lowercase();
        match validate_submission(&seq, "") {
            Outcome::Accepted {
                sequence,
                lower,
                upper,
            } => {
                assert_eq!(sequence, bases(70));
                assert_eq!((lower, upper), (70, 150));
            }
            Outcome::Rejected(err) => panic!("expected acceptance, got {:?}", err),
        }
    }

    #[test]
    fn test_custom_range_sets_minimum() {
        // 90 bases is fine for the default but short for a 100-200 range
        let seq = bases(90);
        assert!(matches!(
            validate_submission(&seq, "70-150"),
            Outcome::Accepted { .. }
        ));
        match validate_submission(&seq, "100-200") {
            Outcome::Rejected(err) => {
                assert!(err.message.contains("at least 100 bp"), "{}", err.message);
            }
            Outcome::Accepted { .. } => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_internal_whitespace_is_invalid() {
        // Only leading/trailing whitespace is trimmed; a newline inside the
        // pasted sequence fails the character check
        let seq = format!("{}\n{}", bases(40), bases(40));
        match validate_submission(&seq, "") {
            Outcome::Rejected(err) => assert_eq!(err.message, SEQUENCE_CHARS_MSG),
            Outcome::Accepted { .. } => panic!("expected rejection"),
        }
    }
}
