use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use mdb::collectors::normalize;
use mdb::config::{ReportConfig, Settings};
use mdb::error::ConfigError;
use mdb::models::cluster::Cluster;
use mdb::ui::{pager, theme::ThemeVariant};
use mdb::util::{natural::natural_cmp, report};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mdb",
    about = "Health reports for erasure-coded storage cluster diagnostic snapshots",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Snapshot JSON file, or the name of a saved profile
    target: Option<String>,

    /// Show per-erasure-set averages instead of every drive
    #[arg(long)]
    summary: bool,

    /// Show only scanning/healing drives
    #[arg(long)]
    scanning: bool,

    /// Show only failed/faulty drives (state other than "ok")
    #[arg(long)]
    failed: bool,

    /// Page the report in a scrollable full-screen view
    #[arg(long)]
    pager: bool,

    /// List erasure sets whose average free space is below PCT (requires --summary)
    #[arg(long, value_name = "PCT")]
    low_space: Option<f64>,

    /// Only list erasure sets with at least N bad drives (requires --summary --failed)
    #[arg(long, value_name = "N")]
    min_bad_disks: Option<usize>,

    /// Domain suffix to strip from server names
    #[arg(long, value_name = "SUFFIX")]
    trim_domain: Option<String>,

    /// Disable ANSI colours
    #[arg(long)]
    no_color: bool,

    /// Pager colour theme: default, dracula, gruvbox, nord
    #[arg(short = 't', long)]
    theme: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage named snapshot files
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Print a shell completion script
    Completions {
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// List saved profiles
    List,
    /// Save PATH under NAME
    Add { name: String, path: PathBuf },
    /// Forget a saved profile
    Remove { name: String },
}

fn main() -> Result<()> {
    init_logging();
    let mut cli = Cli::parse();
    let mut settings = Settings::load()?;

    if let Some(command) = cli.command.take() {
        return match command {
            Command::Profile { action } => run_profile(&mut settings, action),
            Command::Completions { shell } => {
                clap_complete::generate(shell, &mut Cli::command(), "mdb", &mut io::stdout());
                Ok(())
            }
        };
    }

    let mut cfg = report_config(&cli, &settings);
    cfg.validate()?;
    let target = cli.target.as_deref().ok_or(ConfigError::MissingFile)?;
    cfg.json_file = settings.resolve(target);

    let theme = ThemeVariant::from_name(cli.theme.as_deref().unwrap_or(&settings.defaults.theme));
    run_report(&cfg, theme)
}

/// Log to stderr so the report on stdout stays clean. `MDB_LOG` takes the
/// usual `EnvFilter` directives.
fn init_logging() {
    let filter = EnvFilter::try_from_env("MDB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Command-line flags layered over the settings file defaults.
fn report_config(cli: &Cli, settings: &Settings) -> ReportConfig {
    let d = &settings.defaults;
    ReportConfig {
        json_file:     PathBuf::new(),
        summary:       cli.summary,
        scanning:      cli.scanning,
        failed:        cli.failed,
        pager:         cli.pager || d.pager,
        low_space:     cli.low_space,
        min_bad_disks: cli.min_bad_disks,
        trim_domain:   cli.trim_domain.clone().unwrap_or_else(|| d.trim_domain.clone()),
        color:         d.color
                           && !cli.no_color
                           && std::env::var_os("NO_COLOR").is_none()
                           && io::stdout().is_terminal(),
    }
}

fn run_report(cfg: &ReportConfig, theme: ThemeVariant) -> Result<()> {
    let snapshot = normalize::load(&cfg.json_file)?;
    let cluster  = Cluster::from_snapshot(&snapshot, &cfg.trim_domain);
    let doc      = report::generate(&cluster, cfg);

    if cfg.pager && io::stdout().is_terminal() {
        let title = cfg.json_file.display().to_string();
        match pager::page(&doc, &title, theme) {
            Ok(()) => return Ok(()),
            Err(e) => warn!(error = %e, "pager unavailable, printing report"),
        }
    }

    let mut out = io::stdout().lock();
    match out.write_all(doc.to_ansi(cfg.color).as_bytes()).and_then(|_| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("stdout closed early");
            Ok(())
        }
        other => Ok(other?),
    }
}

fn run_profile(settings: &mut Settings, action: ProfileAction) -> Result<()> {
    let path = Settings::path().context("no configuration directory on this system")?;

    match action {
        ProfileAction::List => {
            if settings.profiles.is_empty() {
                println!("No profiles saved in {}", path.display());
                return Ok(());
            }
            let mut names: Vec<&String> = settings.profiles.keys().collect();
            names.sort_by(|a, b| natural_cmp(a, b));
            let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);
            for name in names {
                println!("{:<width$}  {}", name, settings.profiles[name].display(), width = width);
            }
        }
        ProfileAction::Add { name, path: file } => {
            let file = if file.is_absolute() {
                file
            } else {
                std::env::current_dir()?.join(file)
            };
            if !file.exists() {
                warn!(path = %file.display(), "profile target does not exist yet");
            }
            settings.add_profile(&name, file.clone())?;
            settings.save_to(&path)?;
            println!("Saved profile '{}' -> {}", name, file.display());
        }
        ProfileAction::Remove { name } => {
            let old = settings.remove_profile(&name)?;
            settings.save_to(&path)?;
            println!("Removed profile '{}' ({})", name, old.display());
        }
    }
    Ok(())
}
