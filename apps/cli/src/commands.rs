//! CLI command definitions, routing, and tracing setup.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use shellhelp_core::{HelpSource, HelpSystem, Pager, ROOT_LEVEL};
use shellhelp_markup::{Styles, render_entry};
use shellhelp_shared::{
    AppConfig, HelpError, init_config, load_config, load_hierarchy_from, resolve_help_file,
};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// shellhelp — contextual help for an interactive shell.
#[derive(Parser)]
#[command(
    name = "shellhelp",
    version,
    about = "Query and render help topics, levels, and commands from a shell's help document.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Help document to load (overrides SHELLHELP_HELP_FILE and the config file).
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// TOML command hierarchy used to add help for command aliases.
    #[arg(long, global = true)]
    pub hierarchy: Option<PathBuf>,

    /// Disable ANSI styling.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Show help for a subject, as `help [SUBJECT [SUBTOPIC]]` would in the shell.
    Show {
        /// Topic, level, or command (empty for the overview).
        subject: Option<String>,

        /// Command within the level named by SUBJECT.
        subtopic: Option<String>,

        /// Level the query is issued from.
        #[arg(short, long, default_value = ROOT_LEVEL)]
        context: String,

        /// Print the resolved entry as JSON instead of rendering it.
        #[arg(long)]
        json: bool,
    },

    /// List all help topics with their descriptions.
    Topics,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "shellhelp=warn",
        1 => "shellhelp=debug",
        _ => "shellhelp=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Show {
            subject,
            subtopic,
            context,
            json,
        } => cmd_show(
            &cli,
            context,
            subject.as_deref(),
            subtopic.as_deref(),
            *json,
        ),
        Command::Topics => cmd_topics(&cli),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&cli),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_show(
    cli: &Cli,
    context: &str,
    subject: Option<&str>,
    subtopic: Option<&str>,
    json: bool,
) -> Result<()> {
    let config = load_config()?;
    let system = build_system(cli, &config)?;

    info!(context, ?subject, ?subtopic, "resolving help query");

    if json {
        let entry = system.resolve(context, subject, subtopic)?;
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(());
    }

    let styles = Styles::new(use_color(cli, &config));
    debug!(color = styles.is_colored(), "rendering help");
    system.show(context, subject, subtopic, &styles, &StdoutPager)?;
    Ok(())
}

fn cmd_topics(cli: &Cli) -> Result<()> {
    let config = load_config()?;
    let system = build_system(cli, &config)?;

    let styles = Styles::new(use_color(cli, &config));
    let listing = system.topics();
    StdoutPager.page(listing.short(), &render_entry(&listing, &styles))?;
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config file created at: {}", path.display());
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> Result<()> {
    let config = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    println!(
        "# help document: {}",
        resolve_help_file(&config, cli.file.as_deref()).display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assemble the help system from CLI flags and config.
fn build_system(cli: &Cli, config: &AppConfig) -> Result<HelpSystem> {
    let help_file = resolve_help_file(config, cli.file.as_deref());
    debug!(path = %help_file.display(), "using help document");

    let mut system = HelpSystem::new(HelpSource::File(help_file))
        .with_error_sink(|message: &str| eprintln!("ERROR: {message}"));

    let hierarchy_path = cli
        .hierarchy
        .clone()
        .or_else(|| config.source.hierarchy_file.as_ref().map(PathBuf::from));
    if let Some(path) = hierarchy_path {
        system = system.with_hierarchy(load_hierarchy_from(&path)?);
    }

    Ok(system)
}

fn use_color(cli: &Cli, config: &AppConfig) -> bool {
    !cli.no_color && config.display.color && std::io::stdout().is_terminal()
}

/// Writes each page straight to stdout.
struct StdoutPager;

impl Pager for StdoutPager {
    fn page(&self, title: &str, text: &str) -> shellhelp_shared::Result<()> {
        debug!(title, len = text.len(), "paging help");
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| HelpError::io(Path::new("<stdout>"), e))
    }
}
