//! Core domain types for the help knowledge base.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// HelpEntry
// ---------------------------------------------------------------------------

/// Title used when a document header carries an empty short description.
const FALLBACK_SHORT: &str = "Help";

/// Back-reference from a synthesized alias entry to its canonical command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasOf {
    /// The alias name the entry is stored under.
    pub alias: String,
    /// The command whose text was copied.
    pub canonical: String,
}

/// One documented unit: a topic, a level, or a command.
///
/// Entries are never mutated after construction. Post-processing that needs
/// to change an entry builds a new one via [`HelpEntry::with_long`].
/// Serialize-only: every entry goes through one of the constructors below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpEntry {
    short: String,
    long: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias_for: Option<AliasOf>,
    generated: bool,
}

impl HelpEntry {
    /// An entry parsed from the help document.
    pub fn new(short: &str, long: impl Into<String>) -> Self {
        Self {
            short: capitalize(short),
            long: long.into(),
            alias_for: None,
            generated: false,
        }
    }

    /// An entry synthesized by the help system itself.
    pub fn generated(short: &str, long: impl Into<String>) -> Self {
        Self {
            generated: true,
            ..Self::new(short, long)
        }
    }

    /// A snapshot of `canonical` stored under the name `alias`.
    pub fn alias(canonical: &HelpEntry, alias: &str, canonical_name: &str) -> Self {
        Self {
            short: canonical.short.clone(),
            long: canonical.long.clone(),
            alias_for: Some(AliasOf {
                alias: alias.to_string(),
                canonical: canonical_name.to_string(),
            }),
            generated: true,
        }
    }

    /// The "no help available" sentinel returned for unknown topics and levels.
    pub fn no_help() -> Self {
        Self::generated("No help available", "")
    }

    /// Copy of this entry with a different body.
    pub fn with_long(&self, long: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            ..self.clone()
        }
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    pub fn alias_for(&self) -> Option<&AliasOf> {
        self.alias_for.as_ref()
    }

    pub fn is_alias(&self) -> bool {
        self.alias_for.is_some()
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }
}

impl std::fmt::Display for HelpEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.long.is_empty() {
            write!(f, "{}", self.short)
        } else {
            write!(f, "{}\n{}", self.short, self.long)
        }
    }
}

/// Uppercase the first character; empty input becomes [`FALLBACK_SHORT`].
fn capitalize(short: &str) -> String {
    let mut chars = short.chars();
    match chars.next() {
        Some(c) => {
            let upper: String = c.to_uppercase().collect();
            format!("{upper}{}", chars.as_str())
        }
        None => FALLBACK_SHORT.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Command hierarchy
// ---------------------------------------------------------------------------

/// A navigable level of the host shell, as declared by the shell itself.
///
/// Only read during alias synthesis; the help document remains the source of
/// the actual help text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelNode {
    /// Level identifier, e.g. `root` or `configure`.
    pub name: String,
    /// Commands available at this level.
    #[serde(default)]
    pub commands: Vec<CommandNode>,
}

/// A command declared at some level, optionally opening a sub-level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandNode {
    /// Canonical command name.
    pub name: String,
    /// Alternate names accepted by the shell.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// The level entered by this command, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LevelNode>,
}

impl LevelNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Add a command with its aliases.
    pub fn command(mut self, name: &str, aliases: &[&str]) -> Self {
        self.commands.push(CommandNode {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            level: None,
        });
        self
    }

    /// Add a command that enters `level`.
    pub fn sublevel(mut self, name: &str, aliases: &[&str], level: LevelNode) -> Self {
        self.commands.push(CommandNode {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            level: Some(level),
        });
        self
    }
}
