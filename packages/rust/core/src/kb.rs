//! The three-tier help knowledge base: topics, levels, and per-level commands.

use tracing::debug;

use shellhelp_shared::{HelpEntry, HelpError, Result};

use crate::ordered::OrderedMap;

/// Identifier of the top level of the shell.
pub const ROOT_LEVEL: &str = "root";

/// Navigation commands left out of the per-level listings in the overview.
pub const HIDDEN_COMMANDS: [&str; 5] = ["up", "cd", "help", "quit", "ls"];

/// Commands of a single level, keyed by command or alias name.
pub type CommandTable = OrderedMap<HelpEntry>;

/// All help known to the shell.
///
/// Parsed content is written with the crate-internal `put_*` methods, which
/// always overwrite. External callers use the `register_*` methods, which
/// only fill empty or generated slots.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBase {
    pub(crate) topics: OrderedMap<HelpEntry>,
    pub(crate) levels: OrderedMap<HelpEntry>,
    pub(crate) commands: OrderedMap<CommandTable>,
    no_help: HelpEntry,
}

impl KnowledgeBase {
    /// An empty knowledge base holding only the built-in topic placeholders.
    pub fn new() -> Self {
        let mut topics = OrderedMap::new();
        topics.insert(
            "Overview",
            HelpEntry::generated("Available help topics and commands", ""),
        );
        topics.insert("Topics", HelpEntry::generated("Available help topics", ""));

        Self {
            topics,
            levels: OrderedMap::new(),
            commands: OrderedMap::new(),
            no_help: HelpEntry::no_help(),
        }
    }

    // -----------------------------------------------------------------------
    // Parse-time writes
    // -----------------------------------------------------------------------

    pub(crate) fn put_topic(&mut self, name: &str, entry: HelpEntry) {
        self.topics.insert(name, entry);
    }

    pub(crate) fn put_level(&mut self, name: &str, entry: HelpEntry) {
        self.levels.insert(name, entry);
    }

    pub(crate) fn put_command(&mut self, level: &str, name: &str, entry: HelpEntry) {
        self.commands
            .get_or_insert_with(level, OrderedMap::new)
            .insert(name, entry);
    }

    // -----------------------------------------------------------------------
    // Static registration
    // -----------------------------------------------------------------------

    /// Install `entry` as topic `name` unless parsed content is already there.
    ///
    /// Returns whether the entry was installed.
    pub fn register_topic(&mut self, name: &str, entry: HelpEntry) -> bool {
        install(&mut self.topics, name, entry)
    }

    /// Install `entry` as the description of level `name` unless parsed
    /// content is already there.
    pub fn register_level(&mut self, name: &str, entry: HelpEntry) -> bool {
        install(&mut self.levels, name, entry)
    }

    /// Install `entry` as command `name` of `level` unless parsed content is
    /// already there.
    ///
    /// An unknown level gets a generated placeholder description.
    pub fn register_command(&mut self, level: &str, name: &str, entry: HelpEntry) -> bool {
        if !self.levels.contains_key(level) {
            self.levels.insert(
                level,
                HelpEntry::generated("No description available", ""),
            );
        }
        let table = self.commands.get_or_insert_with(level, OrderedMap::new);
        install(table, name, entry)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Help for a topic, or the "no help available" entry.
    pub fn topic(&self, name: &str) -> &HelpEntry {
        self.topics.get(name).unwrap_or(&self.no_help)
    }

    /// Help for a level, or the "no help available" entry.
    pub fn level(&self, name: &str) -> &HelpEntry {
        self.levels.get(name).unwrap_or(&self.no_help)
    }

    /// Help for a command within a level.
    pub fn command(&self, level: &str, name: &str) -> Result<&HelpEntry> {
        let table = self
            .commands
            .get(level)
            .filter(|table| !table.is_empty())
            .ok_or_else(|| HelpError::undocumented(level))?;
        table
            .get(name)
            .ok_or_else(|| HelpError::undocumented_in(name, level))
    }

    pub fn has_command(&self, level: &str, name: &str) -> bool {
        self.commands
            .get(level)
            .is_some_and(|table| table.contains_key(name))
    }

    pub fn has_level(&self, name: &str) -> bool {
        self.levels.contains_key(name)
    }

    /// Topic names in document order.
    pub fn topic_names(&self) -> Vec<String> {
        self.topics.keys().map(String::from).collect()
    }

    /// Level names in document order.
    pub fn level_names(&self) -> Vec<String> {
        self.levels.keys().map(String::from).collect()
    }

    /// All commands of a level, aliases included.
    pub fn commands(&self, level: &str) -> Option<&CommandTable> {
        self.commands.get(level)
    }

    /// Listing of all topics.
    pub fn topics_entry(&self) -> HelpEntry {
        let mut s = String::new();
        for (title, topic) in self.topics.iter() {
            s.push('\t');
            s.push_str(&title_line(title, topic.short(), ""));
        }
        HelpEntry::generated("Available topics", s)
    }

    /// Listing of all topics, root commands, and levels with their commands.
    pub fn overview(&self) -> HelpEntry {
        let mut s = String::from("Available topics:\n\n");
        for (title, topic) in self.topics.iter() {
            s.push('\t');
            s.push_str(&title_line(title, topic.short(), ""));
        }

        s.push_str("\nAvailable commands:\n\n");
        if let Some(root) = self.commands.get(ROOT_LEVEL) {
            for (title, command) in root.iter().filter(|(_, c)| !c.is_alias()) {
                s.push('\t');
                s.push_str(&title_line(title, command.short(), ""));
            }
        }
        s.push('\n');

        for (title, level) in self.levels.iter() {
            if title == ROOT_LEVEL {
                continue;
            }
            let Some(table) = self.commands.get(title) else {
                continue;
            };
            s.push('\t');
            s.push_str(&title_line(title, level.short(), "/"));
            for (name, command) in table.iter() {
                if HIDDEN_COMMANDS.contains(&name) || command.is_alias() {
                    continue;
                }
                s.push_str("\t\t");
                s.push_str(&title_line(name, command.short(), ""));
            }
            s.push('\n');
        }

        HelpEntry::generated("Help overview", s)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

/// One listing row: the quoted name padded to 16 columns, then the description.
pub(crate) fn title_line(title: &str, desc: &str, suffix: &str) -> String {
    format!("{:<16} {desc}\n", format!("`{title}`{suffix}"))
}

fn install(map: &mut OrderedMap<HelpEntry>, name: &str, entry: HelpEntry) -> bool {
    if map.get(name).is_some_and(|existing| !existing.is_generated()) {
        debug!(name, "keeping documented entry over static registration");
        return false;
    }
    map.insert(name, entry);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.put_topic("Features", HelpEntry::new("feature list", "All of them."));
        kb.put_level("configure", HelpEntry::new("configuration", ""));
        kb.put_level("history", HelpEntry::new("history", ""));
        kb.put_command(ROOT_LEVEL, "status", HelpEntry::new("show status", ""));
        kb.put_command("configure", "primitive", HelpEntry::new("define a primitive", ""));
        kb.put_command("configure", "cd", HelpEntry::new("navigate", ""));
        kb
    }

    #[test]
    fn new_has_builtin_topics() {
        let kb = KnowledgeBase::new();
        assert_eq!(kb.topic_names(), vec!["Overview", "Topics"]);
        assert!(kb.topic("Overview").is_generated());
    }

    #[test]
    fn unknown_topic_and_level_fall_back() {
        let kb = sample();
        assert_eq!(kb.topic("Nope").short(), "No help available");
        assert_eq!(kb.level("nope").short(), "No help available");
        assert!(kb.level("nope").is_generated());
    }

    #[test]
    fn command_errors_name_level_or_command() {
        let kb = sample();
        assert_eq!(kb.command("configure", "primitive").unwrap().short(), "Define a primitive");

        let err = kb.command("nolevel", "x").unwrap_err();
        assert_eq!(err.to_string(), "undocumented topic 'nolevel'");

        let err = kb.command("configure", "bogus").unwrap_err();
        assert_eq!(err.to_string(), "undocumented topic 'bogus' in 'configure'");
    }

    #[test]
    fn registration_never_overwrites_parsed_content() {
        let mut kb = sample();
        assert!(!kb.register_topic("Features", HelpEntry::new("other", "")));
        assert_eq!(kb.topic("Features").short(), "Feature list");

        assert!(!kb.register_command("configure", "primitive", HelpEntry::new("other", "")));
        assert_eq!(kb.command("configure", "primitive").unwrap().short(), "Define a primitive");
    }

    #[test]
    fn registration_fills_empty_and_generated_slots() {
        let mut kb = sample();
        assert!(kb.register_topic("Overview", HelpEntry::new("custom overview", "")));
        assert_eq!(kb.topic("Overview").short(), "Custom overview");

        assert!(kb.register_level("resource", HelpEntry::new("resources", "")));
        assert_eq!(kb.level("resource").short(), "Resources");
    }

    #[test]
    fn register_command_creates_level_placeholder() {
        let mut kb = KnowledgeBase::new();
        assert!(kb.register_command("node", "standby", HelpEntry::new("put node in standby", "")));
        assert!(kb.has_level("node"));
        assert!(kb.level("node").is_generated());
        assert!(kb.has_command("node", "standby"));

        // The generated placeholder can still be replaced by a real description
        assert!(kb.register_level("node", HelpEntry::new("node management", "")));
        assert_eq!(kb.level("node").short(), "Node management");
    }

    #[test]
    fn commands_lists_a_level_in_document_order() {
        let mut kb = sample();
        let canonical = kb.command("configure", "primitive").unwrap().clone();
        kb.put_command("configure", "prim", HelpEntry::alias(&canonical, "prim", "primitive"));

        let table = kb.commands("configure").expect("configure commands");
        let names: Vec<&str> = table.keys().collect();
        assert_eq!(names, vec!["primitive", "cd", "prim"]);
        assert!(kb.commands("history").is_none());
    }

    #[test]
    fn overview_lists_topics_commands_and_levels() {
        let mut kb = sample();
        let canonical = kb.command("configure", "primitive").unwrap().clone();
        kb.put_command("configure", "prim", HelpEntry::alias(&canonical, "prim", "primitive"));

        let overview = kb.overview();
        let text = overview.long();
        assert!(overview.is_generated());
        assert!(text.starts_with("Available topics:\n\n\t`Overview`"));
        assert!(text.contains("\t`Features`       Feature list\n"));
        assert!(text.contains("Available commands:\n\n\t`status`         Show status\n"));
        assert!(text.contains("\t`configure`/     Configuration\n"));
        assert!(text.contains("\t\t`primitive`      Define a primitive\n"));
        // Hidden navigation commands and aliases are left out
        assert!(!text.contains("`cd`"));
        assert!(!text.contains("`prim`"));
        // Levels without commands are not listed
        assert!(!text.contains("`history`"));
    }

    #[test]
    fn topics_entry_lists_every_topic() {
        let kb = sample();
        let entry = kb.topics_entry();
        assert_eq!(entry.short(), "Available topics");
        assert_eq!(entry.long().lines().count(), 3);
    }

    #[test]
    fn title_line_pads_to_sixteen_columns() {
        assert_eq!(title_line("ls", "list", ""), "`ls`             list\n");
        assert_eq!(
            title_line("a_very_long_command", "desc", ""),
            "`a_very_long_command` desc\n"
        );
    }
}
