//! Inline picker query parsing.
//!
//! Users type `@bot query` in any chat. A leading `files:` (any case)
//! narrows results to uploaded files; an empty query lists recent items.

const FILES_PREFIX: &str = "files:";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerQuery {
    pub text: String,
    pub files_only: bool,
}

impl PickerQuery {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let has_prefix = trimmed
            .get(..FILES_PREFIX.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(FILES_PREFIX));

        if has_prefix {
            return Self {
                text: trimmed[FILES_PREFIX.len()..].trim().to_string(),
                files_only: true,
            };
        }

        Self {
            text: trimmed.to_string(),
            files_only: false,
        }
    }

    /// Blank queries show recent items instead of search hits.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Parses the opaque offset Telegram echoes back for the next page.
pub fn parse_page_offset(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{parse_page_offset, PickerQuery};

    #[test]
    fn files_prefix_is_case_insensitive_and_stripped() {
        let query = PickerQuery::parse("  FILES:  onboarding policy ");
        assert!(query.files_only);
        assert_eq!(query.text, "onboarding policy");
    }

    #[test]
    fn bare_files_prefix_means_recent_files() {
        let query = PickerQuery::parse("files:");
        assert!(query.files_only);
        assert!(query.is_blank());
    }

    #[test]
    fn plain_text_keeps_all_kinds() {
        let query = PickerQuery::parse("profiles: x");
        assert!(!query.files_only);
        assert_eq!(query.text, "profiles: x");
        assert!(PickerQuery::parse("   ").is_blank());
    }

    #[test]
    fn non_ascii_input_does_not_panic() {
        let query = PickerQuery::parse("файлы: отчёт");
        assert!(!query.files_only);
    }

    #[test]
    fn page_offset_defaults_to_zero() {
        assert_eq!(parse_page_offset(""), 0);
        assert_eq!(parse_page_offset("25"), 25);
        assert_eq!(parse_page_offset("abc"), 0);
    }
}
