//! Help document parser.
//!
//! The help document is an asciidoc manual in which every documented unit is
//! introduced by an anchor line:
//! - `[[topics_<Name>,<title>]]` for a topic
//! - `[[cmdhelp_<level>,<title>]]` for a level
//! - `[[cmdhelp_<level>_<command>,<title>]]` for a command
//!
//! Everything up to the next anchor (or the next `===` heading once some text
//! has been collected) is the entry's body.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, warn};

use shellhelp_shared::{HelpEntry, LevelNode};

use crate::kb::{KnowledgeBase, title_line};

/// Matches `<<target,label>>` cross references.
static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<<[^,]+,(.+)>>").expect("reference regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What an anchor line introduces.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryKind {
    Topic(String),
    Level(String),
    Command { level: String, name: String },
    /// Anchor the help system does not understand; its body is dropped.
    Unknown(String),
}

/// An entry whose body is still being collected.
#[derive(Debug)]
struct PendingEntry {
    kind: EntryKind,
    short: String,
    long: String,
}

/// Counters reported after a load.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Entries written into the knowledge base by the line pass.
    pub committed: usize,
    /// Entries with an unrecognised anchor.
    pub skipped: usize,
    /// Levels removed because they have no commands.
    pub dropped_levels: usize,
    /// Alias entries synthesized from the command hierarchy.
    pub aliases: usize,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Populate `kb` from the text of the help document.
///
/// Malformed input never fails the load; unrecognised anchors are skipped
/// and stray text outside of any entry is ignored. When `hierarchy` is given,
/// every documented command also becomes reachable under its aliases.
#[instrument(skip_all, fields(len = text.len()))]
pub fn load(kb: &mut KnowledgeBase, text: &str, hierarchy: Option<&LevelNode>) -> LoadStats {
    let mut stats = parse_document(kb, text);

    append_command_listings(kb);
    stats.dropped_levels = drop_commandless_levels(kb);
    if let Some(root) = hierarchy {
        stats.aliases = synthesize_aliases(kb, root);
    }

    debug!(
        committed = stats.committed,
        skipped = stats.skipped,
        dropped_levels = stats.dropped_levels,
        aliases = stats.aliases,
        "help document loaded"
    );
    stats
}

// ---------------------------------------------------------------------------
// Line pass
// ---------------------------------------------------------------------------

fn parse_document(kb: &mut KnowledgeBase, text: &str) -> LoadStats {
    let mut stats = LoadStats::default();
    let mut pending: Option<PendingEntry> = None;

    for line in text.lines() {
        if line.starts_with("[[") {
            if let Some(done) = pending.take() {
                commit(kb, done, &mut stats);
            }
            pending = Some(parse_header(line));
            continue;
        }

        let Some(entry) = pending.as_mut() else {
            continue;
        };

        if line.starts_with("===") && !entry.long.is_empty() {
            // A heading after the body closes the entry without opening one
            if let Some(done) = pending.take() {
                commit(kb, done, &mut stats);
            }
        } else {
            entry.long.push_str(&REFERENCE_RE.replace_all(line, "$1"));
            entry.long.push('\n');
        }
    }

    if let Some(done) = pending.take() {
        commit(kb, done, &mut stats);
    }

    stats
}

/// Parse `[[<info>,<short>]]` into a fresh pending entry.
fn parse_header(line: &str) -> PendingEntry {
    let inner = line.trim_end();
    let inner = inner.strip_prefix("[[").unwrap_or(inner);
    let inner = inner.strip_suffix("]]").unwrap_or(inner);
    let (info, short) = inner.split_once(',').unwrap_or((inner, ""));

    let tokens: Vec<&str> = info.split('_').collect();
    let kind = match tokens.as_slice() {
        ["topics", .., last] => EntryKind::Topic(last.to_string()),
        ["topics"] => EntryKind::Topic("topics".to_string()),
        ["cmdhelp", level] => EntryKind::Level(level.to_string()),
        ["cmdhelp", level, rest @ ..] => EntryKind::Command {
            level: level.to_string(),
            name: rest.join("_"),
        },
        _ => EntryKind::Unknown(info.to_string()),
    };

    PendingEntry {
        kind,
        short: short.trim().to_string(),
        long: String::new(),
    }
}

/// Write a finished entry into the knowledge base, overwriting any previous one.
fn commit(kb: &mut KnowledgeBase, entry: PendingEntry, stats: &mut LoadStats) {
    // Drop an echoed section heading
    let long = if entry.long.starts_with("==") {
        entry.long.split_once('\n').map_or("", |(_, rest)| rest)
    } else {
        entry.long.as_str()
    };
    let help = HelpEntry::new(&entry.short, long.trim_end());

    match entry.kind {
        EntryKind::Topic(name) => kb.put_topic(&name, help),
        EntryKind::Level(name) => kb.put_level(&name, help),
        EntryKind::Command { level, name } => kb.put_command(&level, &name, help),
        EntryKind::Unknown(info) => {
            warn!(%info, "skipping help entry with unrecognised anchor");
            stats.skipped += 1;
            return;
        }
    }
    stats.committed += 1;
}

// ---------------------------------------------------------------------------
// Post-processing
// ---------------------------------------------------------------------------

/// Append a command table to the description of every level that has commands.
fn append_command_listings(kb: &mut KnowledgeBase) {
    let KnowledgeBase {
        levels, commands, ..
    } = kb;

    for (name, level) in levels.iter_mut() {
        let Some(table) = commands.get(name).filter(|t| !t.is_empty()) else {
            continue;
        };
        let mut long = format!("{}\n\nCommands:\n", level.long());
        for (cmd_name, cmd) in table.iter() {
            long.push('\t');
            long.push_str(&title_line(cmd_name, cmd.short(), ""));
        }
        *level = level.with_long(long);
    }
}

/// Remove levels without commands.
///
/// The document names root commands `cmdhelp_<command>`, which reads as a
/// level; such entries must not be navigable as levels.
fn drop_commandless_levels(kb: &mut KnowledgeBase) -> usize {
    let KnowledgeBase {
        levels, commands, ..
    } = kb;

    let before = levels.len();
    levels.retain(|name, _| commands.get(name).is_some_and(|t| !t.is_empty()));
    before - levels.len()
}

/// Copy each documented command's help to its aliases.
fn synthesize_aliases(kb: &mut KnowledgeBase, root: &LevelNode) -> usize {
    let mut visited = HashSet::new();
    walk_level(kb, root, &mut visited)
}

fn walk_level<'a>(
    kb: &mut KnowledgeBase,
    level: &'a LevelNode,
    visited: &mut HashSet<&'a str>,
) -> usize {
    if !visited.insert(level.name.as_str()) {
        warn!(level = %level.name, "level appears twice in command hierarchy, skipping");
        return 0;
    }

    let mut added = 0;
    for command in &level.commands {
        for alias in &command.aliases {
            if add_alias(kb, &level.name, &command.name, alias) {
                added += 1;
            }
        }
        if let Some(sublevel) = &command.level {
            added += walk_level(kb, sublevel, visited);
        }
    }
    added
}

fn add_alias(kb: &mut KnowledgeBase, level: &str, command: &str, alias: &str) -> bool {
    let Some(table) = kb.commands.get_mut(level) else {
        return false;
    };
    if table.contains_key(alias) {
        return false;
    }
    let Some(canonical) = table.get(command) else {
        return false;
    };
    let entry = HelpEntry::alias(canonical, alias, command);
    table.insert(alias, entry);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        load(&mut kb, text, None);
        kb
    }

    #[test]
    fn header_kinds() {
        assert_eq!(
            parse_header("[[topics_Features,Features]]").kind,
            EntryKind::Topic("Features".into())
        );
        assert_eq!(
            parse_header("[[topics_Basics_Intro,Intro]]").kind,
            EntryKind::Topic("Intro".into())
        );
        assert_eq!(
            parse_header("[[cmdhelp_configure,CIB configuration]]").kind,
            EntryKind::Level("configure".into())
        );
        assert_eq!(
            parse_header("[[cmdhelp_configure_show_property,Show]]").kind,
            EntryKind::Command {
                level: "configure".into(),
                name: "show_property".into()
            }
        );
        assert!(matches!(
            parse_header("[[other_thing,x]]").kind,
            EntryKind::Unknown(_)
        ));
        assert!(matches!(parse_header("[[cmdhelp,x]]").kind, EntryKind::Unknown(_)));
    }

    #[test]
    fn header_short_is_trimmed() {
        let entry = parse_header("[[cmdhelp_root_status, show status ]]\n");
        assert_eq!(entry.short, "show status");
    }

    #[test]
    fn header_without_comma_degrades() {
        let entry = parse_header("[[cmdhelp_root_status]]");
        assert_eq!(entry.short, "");
        assert_eq!(
            entry.kind,
            EntryKind::Command {
                level: "root".into(),
                name: "status".into()
            }
        );
    }

    #[test]
    fn command_entry_end_to_end() {
        let kb = parse(
            "[[cmdhelp_primitive_start,Start a resource]]\n\
             Starts the given resource.\n\
             [[cmdhelp_primitive_stop,Stop a resource]]\n",
        );
        let entry = kb.command("primitive", "start").expect("documented");
        assert_eq!(entry.short(), "Start a resource");
        assert_eq!(entry.long(), "Starts the given resource.");
        assert!(!entry.is_generated());
    }

    #[test]
    fn consecutive_headers_give_empty_body() {
        let kb = parse("[[cmdhelp_root_quit,exit]]\n[[cmdhelp_root_up,go up]]\n");
        assert_eq!(kb.command("root", "quit").unwrap().long(), "");
        assert_eq!(kb.command("root", "up").unwrap().short(), "Go up");
    }

    #[test]
    fn echoed_heading_is_dropped() {
        let kb = parse("[[topics_Features,Features]]\n=== Features\n\nAll of them.\n\n");
        assert_eq!(kb.topic("Features").long(), "\nAll of them.");
    }

    #[test]
    fn heading_after_body_closes_entry() {
        let kb = parse(
            "[[topics_Intro,Intro]]\nWelcome.\n=== Appendix\nNot part of intro.\n",
        );
        assert_eq!(kb.topic("Intro").long(), "Welcome.");
    }

    #[test]
    fn cross_references_become_labels() {
        let kb = parse("[[topics_Intro,Intro]]\nSee <<topics_Features,the features>>.\n");
        assert_eq!(kb.topic("Intro").long(), "See the features.");
    }

    #[test]
    fn text_before_first_header_is_ignored() {
        let kb = parse("= Manual\n\nPreamble.\n[[topics_Intro,Intro]]\nBody.\n");
        assert_eq!(kb.topic("Intro").long(), "Body.");
        assert_eq!(kb.topic_names(), vec!["Overview", "Topics", "Intro"]);
    }

    #[test]
    fn later_entries_overwrite_earlier() {
        let kb = parse("[[topics_Intro,first]]\nOne.\n[[topics_Intro,second]]\nTwo.\n");
        assert_eq!(kb.topic("Intro").short(), "Second");
        assert_eq!(kb.topic("Intro").long(), "Two.");
    }

    #[test]
    fn unknown_anchor_is_skipped() {
        let mut kb = KnowledgeBase::new();
        let stats = load(&mut kb, "[[glossary_term,Term]]\nBody.\n", None);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.committed, 0);
        assert_eq!(kb, KnowledgeBase::new());
    }

    #[test]
    fn level_descriptions_list_their_commands() {
        let kb = parse(
            "[[cmdhelp_configure,configuration]]\nConfigure things.\n\
             [[cmdhelp_configure_primitive,define a primitive]]\nDefine.\n\
             [[cmdhelp_configure_delete,delete objects]]\nDelete.\n",
        );
        assert_eq!(
            kb.level("configure").long(),
            "Configure things.\n\nCommands:\n\
             \t`primitive`      Define a primitive\n\
             \t`delete`         Delete objects\n"
        );
    }

    #[test]
    fn commandless_levels_are_dropped() {
        let mut kb = KnowledgeBase::new();
        let stats = load(
            &mut kb,
            "[[cmdhelp_status,cluster status]]\nStatus.\n\
             [[cmdhelp_configure,configuration]]\nConfig.\n\
             [[cmdhelp_configure_show,show]]\nShow.\n",
            None,
        );
        assert_eq!(stats.dropped_levels, 1);
        assert!(!kb.has_level("status"));
        assert!(kb.has_level("configure"));
        assert_eq!(kb.level("status").short(), "No help available");
    }

    #[test]
    fn aliases_copy_canonical_help() {
        let hierarchy = LevelNode::new("root").command("status", &["st"]).sublevel(
            "configure",
            &["cfg"],
            LevelNode::new("configure")
                .command("delete", &["rm", "del"])
                .command("edit", &["vi"]),
        );

        let mut kb = KnowledgeBase::new();
        let stats = load(
            &mut kb,
            "[[cmdhelp_root_status,show status]]\nStatus.\n\
             [[cmdhelp_configure_delete,delete objects]]\nDelete.\n",
            Some(&hierarchy),
        );

        assert_eq!(stats.aliases, 3);
        let rm = kb.command("configure", "rm").unwrap();
        assert_eq!(rm.short(), "Delete objects");
        assert_eq!(rm.long(), "Delete.");
        let alias = rm.alias_for().unwrap();
        assert_eq!((alias.alias.as_str(), alias.canonical.as_str()), ("rm", "delete"));

        assert!(kb.has_command("root", "st"));
        // Undocumented canonical commands get no alias entries
        assert!(!kb.has_command("configure", "vi"));
        // `cfg` aliases the `configure` command, which has no root entry
        assert!(!kb.has_command("root", "cfg"));
    }

    #[test]
    fn alias_never_overwrites_existing_entry() {
        let hierarchy = LevelNode::new("root").command("status", &["show"]);
        let mut kb = KnowledgeBase::new();
        load(
            &mut kb,
            "[[cmdhelp_root_status,status]]\nStatus.\n[[cmdhelp_root_show,show]]\nShow.\n",
            Some(&hierarchy),
        );
        let show = kb.command("root", "show").unwrap();
        assert!(!show.is_alias());
        assert_eq!(show.long(), "Show.");
    }

    #[test]
    fn repeated_level_is_walked_once() {
        let configure = LevelNode::new("configure").command("delete", &["rm"]);
        let second = LevelNode::new("configure").command("delete", &["erase"]);
        let hierarchy = LevelNode::new("root")
            .sublevel("configure", &[], configure)
            .sublevel("cfg", &[], second);

        let mut kb = KnowledgeBase::new();
        let stats = load(
            &mut kb,
            "[[cmdhelp_configure_delete,delete]]\nDelete.\n",
            Some(&hierarchy),
        );
        assert_eq!(stats.aliases, 1);
        assert!(kb.has_command("configure", "rm"));
        assert!(!kb.has_command("configure", "erase"));
    }

    #[test]
    fn sample_fixture_loads() {
        let text = std::fs::read_to_string("../../../fixtures/help/sample.adoc")
            .expect("read fixture");
        let kb = parse(&text);

        assert_eq!(
            kb.topic_names(),
            vec!["Overview", "Topics", "Introduction", "Features", "Reference"]
        );
        assert_eq!(
            kb.topic("Introduction").long(),
            "\nThis is the introduction to the shell.\nSee the feature list for more."
        );
        assert_eq!(kb.topic("Reference").long(), "");
        assert_eq!(kb.level_names(), vec!["configure", "resource"]);
        assert!(kb.command("root", "status").unwrap().long().contains("status [<option> ...]"));
        assert_eq!(kb.command("resource", "start").unwrap().long(), "\nStart a resource.");
    }
}
