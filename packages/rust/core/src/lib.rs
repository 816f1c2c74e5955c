//! Help knowledge base, document parser, and query resolution for shellhelp.
//!
//! A [`HelpSystem`] owns the knowledge base for one shell session. It reads
//! the help document on the first query, parses it into topics, levels, and
//! per-level commands, and answers `help [subject [subtopic]]` queries.

pub mod kb;
pub mod ordered;
pub mod parser;
pub mod resolver;
pub mod system;

pub use kb::{HIDDEN_COMMANDS, KnowledgeBase, ROOT_LEVEL};
pub use ordered::OrderedMap;
pub use parser::{LoadStats, load};
pub use resolver::resolve;
pub use system::{ErrorSink, HelpSource, HelpSystem, Pager, TracingSink};
