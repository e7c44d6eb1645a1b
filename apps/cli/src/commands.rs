//! CLI command definitions, routing, and tracing setup.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use docviewer_core::{DocParam, Viewer};
use docviewer_shared::{AppConfig, config_file_path, init_config, load_config, load_config_from};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// DocViewer: browse exported documentation through a single page.
#[derive(Parser)]
#[command(
    name = "docviewer",
    version,
    about = "Serve and sanitize exported HTML documentation behind a navigable viewer.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file to use instead of ~/.docviewer/docviewer.toml.
    #[arg(long, global = true, env = "DOCVIEWER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
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
    /// Start the HTTP viewer.
    Serve {
        /// Address to bind (overrides `server.bind`).
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (overrides `server.port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory document files are read from (overrides `viewer.docs_root`).
        #[arg(long)]
        docs_root: Option<String>,
    },

    /// Print a sanitized document, or the full viewer page, to stdout.
    Render {
        /// Document key. Unknown or missing keys fall back to the default.
        #[arg(short, long)]
        doc: Option<String>,

        /// Emit the whole page instead of the document fragment.
        #[arg(long)]
        page: bool,

        /// Directory document files are read from (overrides `viewer.docs_root`).
        #[arg(long)]
        docs_root: Option<String>,
    },

    /// Sanitize an arbitrary HTML file (`-` reads stdin).
    Sanitize {
        /// Input file, or `-` for stdin.
        input: String,
    },

    /// List registered documents.
    List {
        /// Print the registry as JSON.
        #[arg(long)]
        json: bool,
    },

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
// Tracing
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr so `render` and `sanitize` output stays pipeable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docviewer=info",
        1 => "docviewer=debug",
        _ => "docviewer=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
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
// Routing
// ---------------------------------------------------------------------------

/// Dispatch the parsed command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Serve {
            bind,
            port,
            docs_root,
        } => cmd_serve(config_path, bind, port, docs_root).await,
        Command::Render {
            doc,
            page,
            docs_root,
        } => cmd_render(config_path, doc.as_deref(), page, docs_root).await,
        Command::Sanitize { input } => cmd_sanitize(&input).await,
        Command::List { json } => cmd_list(config_path, json),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load the config named by `--config`, or the user config.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    debug!(documents = config.documents.len(), "config loaded");
    Ok(config)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn cmd_serve(
    config_path: Option<&Path>,
    bind: Option<String>,
    port: Option<u16>,
    docs_root: Option<String>,
) -> Result<()> {
    let mut config = resolve_config(config_path)?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(docs_root) = docs_root {
        config.viewer.docs_root = docs_root;
    }

    let ip: IpAddr = config
        .server
        .bind
        .parse()
        .wrap_err_with(|| format!("invalid bind address '{}'", config.server.bind))?;
    let addr = SocketAddr::new(ip, config.server.port);

    let viewer = Viewer::from_config(&config)?;
    info!(%addr, "starting viewer");
    docviewer_server::serve(viewer, addr).await?;
    Ok(())
}

async fn cmd_render(
    config_path: Option<&Path>,
    doc: Option<&str>,
    page: bool,
    docs_root: Option<String>,
) -> Result<()> {
    let mut config = resolve_config(config_path)?;
    if let Some(docs_root) = docs_root {
        config.viewer.docs_root = docs_root;
    }

    let viewer = Viewer::from_config(&config)?;
    let param = doc.map(DocParam::from);

    let output = if page {
        viewer.page(param.as_ref()).await
    } else {
        viewer.document(param.as_ref()).await.html
    };
    println!("{output}");
    Ok(())
}

async fn cmd_sanitize(input: &str) -> Result<()> {
    let html = if input == "-" {
        let mut bytes = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .wrap_err("failed to read stdin")?;
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        docviewer_core::loader::read_document(Path::new(input)).await?
    };

    println!("{}", docviewer_sanitize::sanitize(&html));
    Ok(())
}

fn cmd_list(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = resolve_config(config_path)?;
    let viewer = Viewer::from_config(&config)?;
    let registry = viewer.registry();

    if json {
        let docs: Vec<_> = registry
            .iter()
            .map(|(key, entry)| {
                serde_json::json!({
                    "key": key.as_str(),
                    "title": entry.title,
                    "label": entry.sidebar_label(),
                    "file": entry.file,
                    "section": entry.section,
                    "default": key == registry.default_key(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&docs)?);
        return Ok(());
    }

    let width = registry
        .iter()
        .map(|(key, _)| key.as_str().len())
        .max()
        .unwrap_or(0);
    for (key, entry) in registry.iter() {
        let marker = if key == registry.default_key() { "*" } else { " " };
        println!(
            "{marker} {key:<width$}  {title}  ({file})",
            key = key.as_str(),
            title = entry.title,
            file = entry.file,
        );
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let existing = config_file_path()?;
    if existing.exists() {
        return Err(eyre!(
            "config already exists at {}; remove it first to regenerate",
            existing.display()
        ));
    }
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
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
    fn serve_flags_parse() {
        let cli = Cli::try_parse_from([
            "docviewer", "serve", "--bind", "0.0.0.0", "--port", "8080", "--docs-root", "site",
        ])
        .expect("parse");
        match cli.command {
            Command::Serve {
                bind,
                port,
                docs_root,
            } => {
                assert_eq!(bind.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
                assert_eq!(docs_root.as_deref(), Some("site"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docviewer", "list", "--json", "-vv", "--log-format", "json", "--config", "x.toml",
        ])
        .expect("parse");
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
        assert_eq!(cli.config.as_deref(), Some(Path::new("x.toml")));
        assert!(matches!(cli.command, Command::List { json: true }));
    }

    #[test]
    fn sanitize_accepts_stdin_marker() {
        let cli = Cli::try_parse_from(["docviewer", "sanitize", "-"]).expect("parse");
        assert!(matches!(cli.command, Command::Sanitize { ref input } if input == "-"));
    }
}
