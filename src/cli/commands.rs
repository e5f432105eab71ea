use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use jr_app::AppendOutcome;
use jr_core::{EntryListView, EntryStatus, SyncError, SyncState};

use super::{Cli, Command, OutputFormat};
use crate::bootstrap::tracing::init_tracing_subscriber;
use crate::bootstrap::{
    default_config_path, identity_from_account, load_config_or_empty, resolve_data_root,
    AppRuntime,
};
use crate::render;

pub async fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = load_config_or_empty(&config_path)?;
    let data_root = resolve_data_root(&config)?;
    let runtime = AppRuntime::build(&config, &data_root)?;

    if let Err(err) = init_tracing_subscriber(&runtime.paths.logs_dir) {
        eprintln!("Failed to initialize tracing: {err}");
    }
    info!(config = %config_path.display(), data_root = %data_root.display(), "Journal starting");

    match cli.command {
        Command::List { pages } => list(&runtime, pages, cli.format).await,
        Command::Add { text } => add(&runtime, &text.join(" "), cli.format).await,
        Command::Retry => retry(&runtime, cli.format).await,
        Command::Whoami => whoami(&runtime, &config.account, cli.format),
        Command::SignOut => sign_out(&runtime).await,
    }
}

/// Start the session. Transient failures still leave the cached list usable.
async fn start(runtime: &AppRuntime) -> Result<()> {
    match runtime.start().await {
        Ok(_) => {}
        Err(SyncError::Transient(message)) => {
            warn!(%message, "Showing cached entries, remote store unavailable");
            eprintln!("Remote store unavailable, showing cached entries ({message})");
        }
        Err(err @ SyncError::PermissionDenied(_)) => {
            return Err(err).context("Signed out: the remote store rejected this account");
        }
    }

    if runtime.engine.current_identity().is_none() {
        bail!("Not signed in: set [account] uid and id_token in the config file");
    }
    Ok(())
}

async fn list(runtime: &AppRuntime, pages: usize, format: OutputFormat) -> Result<()> {
    start(runtime).await?;

    let loader = runtime.scroll_loader();
    for _ in 1..pages.max(1) {
        if runtime.engine.sync_state() != SyncState::Idle {
            break;
        }
        let Some(sentinel) = loader.bound_sentinel() else {
            break;
        };
        if let Err(err) = loader.on_sentinel_visible(&sentinel).await {
            eprintln!("Could not load more entries: {err}");
            break;
        }
    }

    print_view(&runtime.engine.view(), format)
}

async fn add(runtime: &AppRuntime, text: &str, format: OutputFormat) -> Result<()> {
    start(runtime).await?;

    let id = match runtime.engine.append_entry(text) {
        AppendOutcome::Accepted(id) => id,
        AppendOutcome::Rejected => bail!("Entry text is empty"),
        AppendOutcome::NoIdentity => bail!("Not signed in"),
    };
    runtime.engine.drain_pending_writes().await;

    let view = runtime.engine.view();
    let entry = view.entries.iter().find(|e| e.id == id).or_else(|| view.entries.first());
    if let Some(entry) = entry {
        if entry.status == EntryStatus::Failed {
            eprintln!("Saved locally; upload failed. Run `journal retry` later.");
        }
        match format {
            OutputFormat::Plain => println!("{}", render::render_entry(entry)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entry)?),
        }
    }
    Ok(())
}

async fn retry(runtime: &AppRuntime, format: OutputFormat) -> Result<()> {
    start(runtime).await?;

    let failed: Vec<_> = runtime
        .engine
        .entries()
        .into_iter()
        .filter(|e| e.is_failed())
        .map(|e| e.id)
        .collect();
    if failed.is_empty() {
        println!("Nothing to retry");
        return Ok(());
    }

    let retried = failed
        .iter()
        .filter(|id| runtime.engine.retry_entry(id))
        .count();
    runtime.engine.drain_pending_writes().await;

    let still_failed = runtime.engine.entries().iter().filter(|e| e.is_failed()).count();
    info!(retried, still_failed, "Retry finished");
    if format == OutputFormat::Plain {
        println!("Retried {retried} entries, {still_failed} still failed");
    }
    print_view(&runtime.engine.view(), format)
}

fn whoami(
    runtime: &AppRuntime,
    account: &jr_core::config::AccountConfig,
    format: OutputFormat,
) -> Result<()> {
    let configured = identity_from_account(account);
    let remembered = runtime.remembered_identity();

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "configured": configured,
                "remembered": remembered,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Plain => {
            println!("configured: {}", render::render_identity(configured.as_ref()));
            println!("remembered: {}", render::render_identity(remembered.as_ref()));
        }
    }
    Ok(())
}

async fn sign_out(runtime: &AppRuntime) -> Result<()> {
    match runtime.sign_out().await? {
        Some(identity) => println!("Signed out {}", identity.uid),
        None => println!("Nobody was signed in"),
    }
    Ok(())
}

fn print_view(view: &EntryListView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Plain => print!("{}", render::render_view(view)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
    }
    Ok(())
}
