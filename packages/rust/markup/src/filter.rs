//! Line filter turning the help document's markup into styled terminal text.
//!
//! Supported subset:
//! - literal blocks delimited by `....` or `****` (four or more)
//! - `.Label` lines and `Label::` lines as section labels
//! - `` `keyword` `` and `+mono+` inline spans

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::style::Styles;

/// Matches a literal block delimiter.
static BLOCK_EDGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\.{4,}|\*{4,})").expect("block edge regex"));

/// Matches `` `quoted` `` spans.
static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("quoted regex"));

/// Matches `+mono+` spans.
static MONO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+([^+]+)\+").expect("mono regex"));

/// Matches a line ending in `::`.
static LABEL_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)::$").expect("label suffix regex"));

/// Matches a `.Label` line.
static LABEL_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\w").expect("label prefix regex"));

/// Stateful filter over the lines of one help body.
///
/// Create a fresh filter per body; the literal block flag carries over from
/// line to line.
#[derive(Debug)]
pub struct HelpFilter<'a> {
    styles: &'a Styles,
    in_block: bool,
}

impl<'a> HelpFilter<'a> {
    pub fn new(styles: &'a Styles) -> Self {
        Self {
            styles,
            in_block: false,
        }
    }

    /// Filter a whole body. The result always ends with a newline.
    pub fn apply(mut self, text: &str) -> String {
        let mut out = text
            .lines()
            .map(|line| self.filter_line(line))
            .collect::<Vec<_>>()
            .join("\n");
        out.push('\n');
        out
    }

    /// Filter a single line, updating the literal block state.
    pub fn filter_line(&mut self, line: &str) -> String {
        if BLOCK_EDGE_RE.is_match(line) {
            self.in_block = !self.in_block;
            return String::new();
        }

        if self.in_block {
            return self.styles.block(line);
        }

        if LABEL_PREFIX_RE.is_match(line) {
            return self.styles.topic(&line[1..]);
        }

        let line = QUOTED_RE.replace_all(line, |caps: &Captures| self.styles.keyword(&caps[1]));
        let line = MONO_RE.replace_all(&line, |caps: &Captures| self.styles.block(&caps[1]));
        LABEL_SUFFIX_RE
            .replace(&line, |caps: &Captures| self.styles.topic(&caps[1]))
            .into_owned()
    }

    /// Whether the filter is currently inside a literal block.
    pub fn in_block(&self) -> bool {
        self.in_block
    }
}
