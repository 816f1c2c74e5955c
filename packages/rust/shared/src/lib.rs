//! Shared types, error model, and configuration for shellhelp.
//!
//! This crate is the foundation depended on by all other shellhelp crates.
//! It provides:
//! - [`HelpError`] — the unified error type
//! - Domain types ([`HelpEntry`], [`AliasOf`], [`LevelNode`], [`CommandNode`])
//! - Configuration ([`AppConfig`], help file resolution, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DisplayConfig, HELP_FILE_ENV, SourceConfig, config_dir, config_file_path,
    default_help_file, init_config, load_config, load_config_from, load_hierarchy_from,
    resolve_help_file,
};
pub use error::{HelpError, Result};
pub use types::{AliasOf, CommandNode, HelpEntry, LevelNode};
