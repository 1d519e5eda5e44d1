use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use workspace_browser::backend::{BackendGateway, HttpGateway, TimeoutGateway};
use workspace_browser::ui::{Action, Coordinator, EntryKind, RowKind};
use workspace_browser::{util, Config};

/// Browse repositories, workspaces and files served by a workspace backend
#[derive(Debug, Parser)]
#[command(name = "workspace-browser", version)]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Data directory for config and logs (default: ~/.workspace-browser)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List repositories and their workspaces
    Repos,
    /// Print the file tree of a workspace
    Tree { workspace: Uuid },
    /// Print a file of a workspace
    Cat { workspace: Uuid, path: String },
    /// Clone a repository from a URL
    Clone { url: String },
    /// Register a local directory as a repository
    OpenProject { path: String },
    /// Create a new workspace in a repository
    NewWorkspace { repository: Uuid },
    /// Delete a repository
    RmRepo { id: Uuid },
    /// Delete a workspace
    RmWorkspace { id: Uuid },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());

    // Initialize logging to file (~/.workspace-browser/logs/workspace-browser.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let mut config = Config::load();
    if let Some(url) = cli.backend_url {
        config = config.with_backend_url(url);
    }

    let mut gateway: Arc<dyn BackendGateway> = Arc::new(HttpGateway::new(config.backend_url.clone()));
    if let Some(timeout) = config.backend_timeout {
        gateway = Arc::new(TimeoutGateway::new(gateway, timeout));
    }

    let mut coordinator = Coordinator::from_config(&config, gateway);
    let outcome = run_command(&mut coordinator, cli.command).await;

    for entry in coordinator.session().log().entries() {
        eprintln!("{}", entry.display_line());
    }
    outcome?;

    if coordinator.session().log().count(EntryKind::Error) > 0 {
        bail!("backend reported an error");
    }
    Ok(())
}

/// Log filter from `RUST_LOG`, defaulting to `warn` when unset or invalid
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

async fn run_command(coordinator: &mut Coordinator, command: Command) -> Result<()> {
    match command {
        Command::Repos => {
            coordinator.load_repositories().await;
            for entry in coordinator.session().registry().repositories() {
                println!("{}  {}", entry.repository.id, entry.repository.display_name());
                for workspace in &entry.workspaces {
                    let marker = if workspace.has_changes() { " *" } else { "" };
                    println!("  {}  {}{}", workspace.id, workspace.display_name(), marker);
                }
            }
        }
        Command::Tree { workspace } => {
            coordinator.select_workspace(workspace).await;
            coordinator.dispatch(Action::ExpandAll)?;
            for row in coordinator.session().tree().rows() {
                let suffix = match row.kind {
                    RowKind::Directory { .. } => "/",
                    RowKind::File => "",
                };
                println!("{}{}{}", "  ".repeat(row.depth), row.name, suffix);
            }
        }
        Command::Cat { workspace, path } => {
            coordinator.select_workspace(workspace).await;
            let name = path.rsplit('/').next().unwrap_or(&path).to_string();
            coordinator.open_file(&path, &name).await?;
            if let Some(file) = coordinator.session().current_file() {
                print!("{}", file.content);
            }
        }
        Command::Clone { url } => coordinator.clone_repository(&url).await?,
        Command::OpenProject { path } => coordinator.open_project(&path).await?,
        Command::NewWorkspace { repository } => coordinator.create_workspace(repository).await,
        Command::RmRepo { id } => coordinator.delete_repository(id).await,
        Command::RmWorkspace { id } => coordinator.delete_workspace(id).await,
    }
    Ok(())
}
