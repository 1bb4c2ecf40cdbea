//! Profile inference from incoming user text.
//!
//! This is a literal substring heuristic, not entity extraction: the text is
//! case-folded, the remainder after the last "my name is" is trimmed of
//! whitespace, and punctuation is kept as-is.

const NAME_TRIGGER: &str = "my name is";

/// Profile key written by [`extract_name`] consumers.
pub const NAME_KEY: &str = "name";

/// Extract a name from `text` when it contains "my name is" (any case).
///
/// `"Hi! My name is Alice."` yields `Some("alice.")`. A trigger with nothing
/// but whitespace after it (`"my name is   "`) yields `None`, so an empty
/// name is never stored over an existing one.
pub fn extract_name(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    let (_, rest) = lowered.rsplit_once(NAME_TRIGGER)?;
    let name = rest.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::extract_name;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_trailing_punctuation_and_folds_case() {
        assert_eq!(
            extract_name("Hi! My name is Alice."),
            Some("alice.".to_string())
        );
    }

    #[test]
    fn absent_trigger_yields_none() {
        assert_eq!(extract_name("What's my name?"), None);
        assert_eq!(extract_name(""), None);
    }

    #[test]
    fn empty_remainder_yields_none() {
        assert_eq!(extract_name("my name is   "), None);
    }

    #[test]
    fn last_occurrence_wins() {
        assert_eq!(
            extract_name("My name is Bob, no wait, my name is  Carol "),
            Some("carol".to_string())
        );
    }

    #[test]
    fn trigger_inside_sentence_takes_everything_after() {
        assert_eq!(
            extract_name("hello there my name is Dana and I like tea"),
            Some("dana and i like tea".to_string())
        );
    }
}
