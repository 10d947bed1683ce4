pub mod validate;

pub use validate::{validate_submission, FieldError, FormField, Outcome};

/// Fallback product size range when the field is left empty
pub const DEFAULT_SIZE_RANGE: &str = "70-150";

/// Editable state of the two submit-gated fields plus the inline error.
///
/// At most one error exists at a time; it is cleared at the start of every
/// submit attempt and re-created against whichever field failed.
#[derive(Debug, Default)]
pub struct FormState {
    pub sequence: String,
    pub size_range: String,
    pub error: Option<FieldError>,
}

impl FormState {
    /// Run the full validation pipeline against the current field contents.
    ///
    /// On acceptance the sequence buffer is replaced with its normalized
    /// (trimmed, uppercased) value before returning, so the field visibly
    /// holds what gets handed to the designer.
    pub fn submit(&mut self) -> Outcome {
        // Drop any stale error before evaluating the new attempt
        self.error = None;

        let outcome = validate_submission(&self.sequence, &self.size_range);
        match &outcome {
            Outcome::Accepted { sequence, .. } => {
                self.sequence = sequence.clone();
            }
            Outcome::Rejected(err) => {
                self.error = Some(err.clone());
            }
        }
        outcome
    }

    /// Error message attached to a specific field, if any
    pub fn error_for(&self, field: FormField) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_normalizes_sequence_in_place() {
        let mut form = FormState {
            sequence: format!("  {}  ", "acgt".repeat(20)),
            size_range: String::new(),
            error: None,
        };

        let outcome = form.submit();
        assert!(matches!(outcome, Outcome::Accepted { .. }));
        assert_eq!(form.sequence, "ACGT".repeat(20));
        assert!(form.error.is_none());
    }

    #[test]
    fn test_resubmit_replaces_stale_error() {
        let mut form = FormState {
            sequence: "ACGTN".to_string(),
            size_range: "banana".to_string(),
            error: None,
        };

        // First attempt fails on the range; the sequence is never checked
        form.submit();
        assert!(form.error_for(FormField::SizeRange).is_some());
        assert!(form.error_for(FormField::Sequence).is_none());

        // Fixing the range surfaces the sequence error and drops the old one
        form.size_range = "70-150".to_string();
        form.submit();
        assert!(form.error_for(FormField::SizeRange).is_none());
        assert!(form.error_for(FormField::Sequence).is_some());

        // A clean attempt leaves no error behind
        form.sequence = "ACGT".repeat(20);
        form.submit();
        assert!(form.error.is_none());
    }
}
