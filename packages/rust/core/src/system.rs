//! Lazily loaded help system owned by a shell session.
//!
//! The help document is read and parsed on the first query, exactly once.
//! Static registrations may happen at any time and never trigger a load.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{info, instrument, warn};

use shellhelp_markup::{Styles, render_entry};
use shellhelp_shared::{HelpEntry, HelpError, LevelNode, Result};

use crate::kb::KnowledgeBase;
use crate::parser::{self, LoadStats};
use crate::resolver;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Receives human-readable messages about problems loading help.
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Default sink: log through `tracing`.
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, message: &str) {
        warn!("{message}");
    }
}

impl<F> ErrorSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// Shows a rendered help page to the user.
pub trait Pager {
    fn page(&self, title: &str, text: &str) -> Result<()>;
}

/// Where the help document comes from.
#[derive(Debug, Clone)]
pub enum HelpSource {
    /// Read from a file on first use.
    File(PathBuf),
    /// Already in memory (embedded document, tests).
    Text(String),
}

// ---------------------------------------------------------------------------
// HelpSystem
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct State {
    kb: KnowledgeBase,
    loaded: bool,
}

/// The knowledge base plus its one-time load.
///
/// All access goes through one mutex, so concurrent callers either see the
/// knowledge base before the load started or after it finished.
pub struct HelpSystem {
    source: HelpSource,
    hierarchy: Option<LevelNode>,
    sink: Box<dyn ErrorSink>,
    state: Mutex<State>,
}

impl HelpSystem {
    pub fn new(source: HelpSource) -> Self {
        Self {
            source,
            hierarchy: None,
            sink: Box::new(TracingSink),
            state: Mutex::new(State::default()),
        }
    }

    /// Synthesize alias entries from the shell's command hierarchy.
    pub fn with_hierarchy(mut self, root: LevelNode) -> Self {
        self.hierarchy = Some(root);
        self
    }

    /// Report load failures to `sink` instead of the log.
    pub fn with_error_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the state, loading the help document first if nobody has yet.
    ///
    /// A load failure is reported after the lock is released, so the error
    /// sink may call back into the help system.
    fn loaded(&self) -> MutexGuard<'_, State> {
        let mut state = self.lock();
        if state.loaded {
            return state;
        }
        state.loaded = true;
        match self.load_into(&mut state.kb) {
            Ok(_) => state,
            Err(err) => {
                drop(state);
                self.sink.report(&err.to_string());
                self.lock()
            }
        }
    }

    #[instrument(skip_all)]
    fn load_into(&self, kb: &mut KnowledgeBase) -> Result<LoadStats> {
        let text = match &self.source {
            HelpSource::Text(text) => Cow::Borrowed(text.as_str()),
            HelpSource::File(path) => {
                let bytes =
                    std::fs::read(path).map_err(|e| HelpError::source_unavailable(path, e))?;
                Cow::Owned(decode_lossy(path, bytes))
            }
        };

        let stats = parser::load(kb, &text, self.hierarchy.as_ref());
        info!(
            entries = stats.committed,
            aliases = stats.aliases,
            "help loaded"
        );
        Ok(stats)
    }

    /// Load the help document now unless a load was already attempted.
    pub fn ensure_loaded(&self) {
        drop(self.loaded());
    }

    /// Whether a load has been attempted, successful or not.
    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    // -----------------------------------------------------------------------
    // Static registration
    // -----------------------------------------------------------------------

    /// See [`KnowledgeBase::register_topic`].
    pub fn register_topic(&self, name: &str, entry: HelpEntry) -> bool {
        self.lock().kb.register_topic(name, entry)
    }

    /// See [`KnowledgeBase::register_level`].
    pub fn register_level(&self, name: &str, entry: HelpEntry) -> bool {
        self.lock().kb.register_level(name, entry)
    }

    /// See [`KnowledgeBase::register_command`].
    pub fn register_command(&self, level: &str, name: &str, entry: HelpEntry) -> bool {
        self.lock().kb.register_command(level, name, entry)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn topic(&self, name: &str) -> HelpEntry {
        self.loaded().kb.topic(name).clone()
    }

    pub fn level(&self, name: &str) -> HelpEntry {
        self.loaded().kb.level(name).clone()
    }

    pub fn command(&self, level: &str, name: &str) -> Result<HelpEntry> {
        self.loaded().kb.command(level, name).cloned()
    }

    pub fn topic_names(&self) -> Vec<String> {
        self.loaded().kb.topic_names()
    }

    pub fn overview(&self) -> HelpEntry {
        self.loaded().kb.overview()
    }

    pub fn topics(&self) -> HelpEntry {
        self.loaded().kb.topics_entry()
    }

    /// See [`resolver::resolve`].
    pub fn resolve(
        &self,
        context: &str,
        subject: Option<&str>,
        subtopic: Option<&str>,
    ) -> Result<HelpEntry> {
        resolver::resolve(&self.loaded().kb, context, subject, subtopic)
    }

    /// Resolve a query, render the entry, and hand it to `pager`.
    pub fn show(
        &self,
        context: &str,
        subject: Option<&str>,
        subtopic: Option<&str>,
        styles: &Styles,
        pager: &dyn Pager,
    ) -> Result<()> {
        let entry = self.resolve(context, subject, subtopic)?;
        let text = render_entry(&entry, styles);
        pager.page(entry.short(), &text)
    }

    /// Run `f` against the loaded knowledge base.
    pub fn with_knowledge_base<R>(&self, f: impl FnOnce(&KnowledgeBase) -> R) -> R {
        f(&self.loaded().kb)
    }
}

/// Decode the help document, replacing invalid UTF-8 instead of rejecting it.
fn decode_lossy(path: &Path, bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| {
        warn!(path = %path.display(), "help document is not valid UTF-8, replacing invalid bytes");
        String::from_utf8_lossy(e.as_bytes()).into_owned()
    })
}
