//! Rendering of help entries for terminal display.
//!
//! The help document uses a small asciidoc subset. [`HelpFilter`] converts
//! that subset line by line into styled text, and [`render_entry`] assembles
//! a full page (title, alias redirect note, body) from a [`HelpEntry`].

mod filter;
mod style;

use tracing::{instrument, trace};

use shellhelp_shared::HelpEntry;

pub use filter::HelpFilter;
pub use style::Styles;

/// Render `text` through a fresh [`HelpFilter`].
pub fn render_markup(text: &str, styles: &Styles) -> String {
    HelpFilter::new(styles).apply(text)
}

/// Render a complete help page for `entry`.
///
/// The body always starts on its own line below the title. Alias entries get
/// a note naming the command they redirect to.
#[instrument(skip_all, fields(short = %entry.short()))]
pub fn render_entry(entry: &HelpEntry, styles: &Styles) -> String {
    let header = styles.header(entry.short());

    let mut long = String::new();
    if !entry.long().is_empty() {
        long = render_markup(entry.long(), styles);
        if !long.starts_with('\n') {
            long.insert(0, '\n');
        }
    }

    let prefix = match entry.alias_for() {
        Some(alias) => render_markup(
            &format!(
                "(Redirected from `{}` to `{}`)\n",
                alias.alias, alias.canonical
            ),
            styles,
        ),
        None => String::new(),
    };

    trace!(len = long.len(), alias = entry.is_alias(), "rendered entry");
    format!("{header}\n{prefix}{long}")
}
