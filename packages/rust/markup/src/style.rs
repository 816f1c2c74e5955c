//! Terminal styling for rendered help.

use crossterm::style::Stylize;

/// Maps each kind of help markup onto a terminal style.
///
/// With color disabled every method returns its input unchanged, which keeps
/// rendered text usable in pipes and logs.
#[derive(Debug, Clone, Copy)]
pub struct Styles {
    color: bool,
}

impl Styles {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// No escape sequences at all.
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn colored() -> Self {
        Self::new(true)
    }

    pub fn is_colored(&self) -> bool {
        self.color
    }

    /// Entry title.
    pub fn header(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Section labels (`.Label` and `Label::` lines).
    pub fn topic(&self, text: &str) -> String {
        if self.color {
            text.bold().underlined().to_string()
        } else {
            text.to_string()
        }
    }

    /// Backtick-quoted names.
    pub fn keyword(&self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    /// Literal blocks and `+mono+` spans.
    pub fn block(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::colored()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_styles_are_identity() {
        let styles = Styles::plain();
        assert!(!styles.is_colored());
        assert_eq!(styles.header("Title"), "Title");
        assert_eq!(styles.topic("Usage"), "Usage");
        assert_eq!(styles.keyword("status"), "status");
        assert_eq!(styles.block("crm node"), "crm node");
    }

    #[test]
    fn colored_styles_wrap_text() {
        let styles = Styles::colored();
        assert!(styles.is_colored());
        assert!(Styles::default().is_colored());
        let keyword = styles.keyword("status");
        assert!(keyword.contains("status"));
        assert!(keyword.contains('\u{1b}'));
        assert_ne!(styles.block("x"), "x");
    }
}
