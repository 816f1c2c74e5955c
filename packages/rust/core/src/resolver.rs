//! Contextual resolution of `help [subject [subtopic]]` queries.

use tracing::trace;

use shellhelp_shared::{HelpEntry, HelpError, Result};

use crate::kb::{KnowledgeBase, ROOT_LEVEL};

/// Map a help query issued at level `context` to exactly one entry.
///
/// Rules, first match wins:
/// 1. no subject: the overview at root, otherwise the current level
/// 2. `overview` / `topics` (any case): the generated listings
/// 3. a capitalized subject: the topic of that name
/// 4. a subtopic: command `subtopic` of level `subject`
/// 5. a command of the current level
/// 6. a level
///
/// Anything else is an undocumented topic.
pub fn resolve(
    kb: &KnowledgeBase,
    context: &str,
    subject: Option<&str>,
    subtopic: Option<&str>,
) -> Result<HelpEntry> {
    let Some(subject) = subject.filter(|s| !s.is_empty()) else {
        trace!(context, "no subject");
        return Ok(if context == ROOT_LEVEL {
            kb.overview()
        } else {
            kb.level(context).clone()
        });
    };

    let lowered = subject.to_lowercase();
    if lowered == "overview" {
        return Ok(kb.overview());
    }
    if lowered == "topics" {
        return Ok(kb.topics_entry());
    }

    if is_topic_name(subject) {
        return Ok(kb.topic(subject).clone());
    }

    if let Some(subtopic) = subtopic.filter(|s| !s.is_empty()) {
        return kb.command(subject, subtopic).cloned();
    }

    if kb.has_command(context, subject) {
        return kb.command(context, subject).cloned();
    }

    if kb.has_level(subject) {
        return Ok(kb.level(subject).clone());
    }

    Err(HelpError::undocumented_in(subject, context))
}

/// Topics are named with a leading capital; levels and commands never are.
fn is_topic_name(subject: &str) -> bool {
    subject.chars().next().is_some_and(char::is_uppercase)
}
