use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use guidekit_tui::{RunConfig, filter_navigation};
use guidekit_types::{NavigationSection, Route};
use guidekit_util::navigation_io::summarize;
use guidekit_util::path_processing::guidekit_config_dir;
use guidekit_util::{DEFAULT_DATE_FORMAT, UserPreferences, builtin_navigation, expand_tilde, load_navigation};
use tracing::{Subscriber, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_NAME: &str = "guidekit.log";

/// Terminal component guide.
#[derive(Debug, Parser)]
#[command(name = "guidekit", version, about)]
struct Cli {
    /// Navigation manifest (YAML or JSON); defaults to the built-in guide.
    #[arg(long, global = true)]
    navigation: Option<String>,
    /// Page to open first, e.g. `#/data-grid#popovers`.
    #[arg(long)]
    route: Option<String>,
    /// Theme to use (nord or dracula).
    #[arg(long)]
    theme: Option<String>,
    /// chrono format used for absolute dates.
    #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
    date_format: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load and validate a navigation manifest.
    Check {
        /// Manifest to validate.
        file: String,
    },
    /// Print the navigation filtered by a search term as JSON.
    Filter {
        term: String,
        /// Path of the selected page.
        #[arg(long, default_value = "")]
        route: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        navigation,
        route,
        theme,
        date_format,
        command,
    } = Cli::parse();
    match command {
        None => {
            init_file_tracing();
            let config = tui_config(navigation.as_deref(), route.as_deref(), theme, date_format)?;
            guidekit_tui::run(config).await.context("running the guide")
        }
        Some(Command::Check { file }) => {
            init_tracing();
            run_check(&expand_tilde(&file))
        }
        Some(Command::Filter { term, route }) => {
            init_tracing();
            let navigation = read_navigation(navigation.as_deref())?;
            run_filter(&navigation, &term, &route)
        }
    }
}

/// `RUST_LOG` when set and valid, `info` otherwise.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn stderr_subscriber() -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt().with_env_filter(env_filter()).with_writer(std::io::stderr).finish()
}

fn init_tracing() {
    let _ = stderr_subscriber().try_init();
}

/// The TUI owns the terminal, so logs go to a file in the config directory.
fn init_file_tracing() {
    let dir = guidekit_config_dir();
    let file = fs::create_dir_all(&dir).and_then(|_| OpenOptions::new().create(true).append(true).open(dir.join(LOG_FILE_NAME)));
    let Ok(file) = file else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn read_navigation(path: Option<&str>) -> Result<Vec<NavigationSection>> {
    match path {
        Some(path) => {
            let path = expand_tilde(path);
            load_navigation(&path).with_context(|| format!("loading navigation from {}", path.display()))
        }
        None => builtin_navigation().context("loading the built-in guide"),
    }
}

fn tui_config(navigation: Option<&str>, route: Option<&str>, theme: Option<String>, date_format: String) -> Result<RunConfig> {
    let navigation = read_navigation(navigation)?;
    let preferences = UserPreferences::new().unwrap_or_else(|error| {
        warn!(%error, "preferences unavailable; using in-memory defaults");
        UserPreferences::ephemeral()
    });
    Ok(RunConfig {
        navigation,
        initial_route: route.map(Route::parse),
        theme,
        date_format,
        preferences: Arc::new(preferences),
    })
}

fn run_check(path: &Path) -> Result<()> {
    let navigation = load_navigation(path).with_context(|| format!("checking {}", path.display()))?;
    let summary = summarize(&navigation);
    info!(path = %path.display(), "manifest is valid");
    println!(
        "{}: {} sections, {} items ({} hidden), {} sub-sections",
        path.display(),
        summary.sections,
        summary.items,
        summary.hidden_items,
        summary.sub_sections
    );
    Ok(())
}

fn run_filter(navigation: &[NavigationSection], term: &str, route: &str) -> Result<()> {
    let current_path = Route::parse(route).path;
    let filtered = filter_navigation(navigation, term, &current_path);
    if filtered.is_empty() && !term.is_empty() {
        warn!(term, "no navigation entries match");
    }
    let json = serde_json::to_string_pretty(&filtered).context("serializing filtered navigation")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_tui_flags_and_subcommands() {
        let cli = Cli::parse_from(["guidekit", "--route", "#/badge#colors", "--theme", "dracula"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.route.as_deref(), Some("#/badge#colors"));
        assert_eq!(cli.date_format, DEFAULT_DATE_FORMAT);

        let cli = Cli::parse_from(["guidekit", "filter", "grid", "--route", "#/data-grid"]);
        assert!(matches!(cli.command, Some(Command::Filter { ref term, .. }) if term == "grid"));
    }

    #[test]
    fn rust_log_controls_subcommand_verbosity() {
        temp_env::with_var("RUST_LOG", Some("debug"), || {
            let enabled = tracing::subscriber::with_default(stderr_subscriber(), || tracing::enabled!(tracing::Level::DEBUG));
            assert!(enabled);
        });
        temp_env::with_var_unset("RUST_LOG", || {
            tracing::subscriber::with_default(stderr_subscriber(), || {
                assert!(tracing::enabled!(tracing::Level::INFO));
                assert!(!tracing::enabled!(tracing::Level::DEBUG));
            });
        });
    }

    #[test]
    fn filter_runs_against_builtin_guide() {
        let navigation = read_navigation(None).unwrap();
        assert!(run_filter(&navigation, "button", "").is_ok());
    }
}
