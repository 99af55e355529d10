//! "Jump to page" input.
//!
//! Typing is asymmetric: a value above the page count is clamped and navigated
//! to at once, while a value below 1 (or empty) stays as typed and only
//! resolves on commit (blur or Enter).

use crate::pagination::clamp_page_index;

/// Text state of the jump field. Displays one-based page numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpInput {
    text: String,
}

impl Default for JumpInput {
    fn default() -> Self {
        Self::new(0)
    }
}

impl JumpInput {
    /// Field showing `page_index + 1`.
    #[must_use]
    pub fn new(page_index: usize) -> Self {
        Self {
            text: page_index.saturating_add(1).to_string(),
        }
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mirror navigation that happened elsewhere (buttons, filter reset).
    pub fn sync(&mut self, page_index: usize) {
        self.text = page_index.saturating_add(1).to_string();
    }

    /// Handle a keystroke. Returns the zero-based page to navigate to now, if any.
    pub fn on_change(&mut self, value: &str, page_count: usize) -> Option<usize> {
        let pages = page_count.max(1);
        let trimmed = value.trim();
        match parse_page_number(trimmed) {
            Some(n) if n > pages as i64 => {
                self.text = pages.to_string();
                Some(pages - 1)
            }
            Some(n) if n >= 1 => {
                self.text = trimmed.to_string();
                Some(clamp_page_index(n - 1, pages))
            }
            _ => {
                self.text = value.to_string();
                None
            }
        }
    }

    /// Handle blur or Enter. Always resolves to a page.
    ///
    /// Unparseable or too-low input becomes page 1; too-high input becomes the last page.
    pub fn on_commit(&mut self, page_count: usize) -> usize {
        let pages = page_count.max(1);
        let requested = parse_page_number(self.text.trim()).unwrap_or(1).max(1);
        let index = clamp_page_index(requested - 1, pages);
        self.text = (index + 1).to_string();
        index
    }
}

/// Parse a typed page number. Integers too large for `i64` saturate, so a
/// long run of digits still counts as "above the last page".
fn parse_page_number(text: &str) -> Option<i64> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(n);
    }
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_value_navigates_immediately() {
        let mut input = JumpInput::new(0);
        assert_eq!(input.on_change("9", 5), Some(4));
        assert_eq!(input.text(), "5");
    }

    #[test]
    fn test_low_values_wait_for_commit() {
        let mut input = JumpInput::new(2);
        assert_eq!(input.on_change("0", 5), None);
        assert_eq!(input.text(), "0");
        assert_eq!(input.on_commit(5), 0);
        assert_eq!(input.text(), "1");

        assert_eq!(input.on_change("", 5), None);
        assert_eq!(input.text(), "");
        assert_eq!(input.on_commit(5), 0);
        assert_eq!(input.text(), "1");
    }

    #[test]
    fn test_in_range_value_navigates() {
        let mut input = JumpInput::new(0);
        assert_eq!(input.on_change("3", 5), Some(2));
        assert_eq!(input.text(), "3");
        assert_eq!(input.on_commit(5), 2);
    }

    #[test]
    fn test_garbage_is_kept_until_commit() {
        let mut input = JumpInput::new(0);
        assert_eq!(input.on_change("-2", 5), None);
        assert_eq!(input.on_change("abc", 5), None);
        assert_eq!(input.text(), "abc");
        assert_eq!(input.on_commit(5), 0);
    }

    #[test]
    fn test_overlong_number_goes_to_last_page() {
        let mut input = JumpInput::new(0);
        assert_eq!(input.on_change("99999999999999999999", 5), Some(4));
        assert_eq!(input.text(), "5");

        input.sync(0);
        assert_eq!(input.on_change("-99999999999999999999", 5), None);
        assert_eq!(input.on_commit(5), 0);
    }

    #[test]
    fn test_commit_of_overlong_number_clamps_to_last_page() {
        let mut input = JumpInput::new(0);
        input.text = "99999999999999999999".to_string();
        assert_eq!(input.on_commit(5), 4);
        assert_eq!(input.text(), "5");
    }

    #[test]
    fn test_commit_clamps_after_page_count_shrinks() {
        let mut input = JumpInput::new(0);
        input.on_change("4", 5);
        assert_eq!(input.on_commit(2), 1);
        assert_eq!(input.text(), "2");
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let mut input = JumpInput::new(0);
        assert_eq!(input.on_change("3", 0), Some(0));
        assert_eq!(input.text(), "1");
    }

    #[test]
    fn test_sync_mirrors_external_navigation() {
        let mut input = JumpInput::new(0);
        input.sync(6);
        assert_eq!(input.text(), "7");
    }
}
