mod app;
mod config;
mod dir_remote;
mod text_editor;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use draftkeep_core::{DocumentId, DocumentIdentity, FileStore};
use draftkeep_session::{EventSink, Offline, RemoteDocuments, SaveController};
use tracing_subscriber::EnvFilter;

use app::App;
use config::AppConfig;
use dir_remote::DirRemote;

/// Terminal editor with autosave and version history
#[derive(Parser, Debug)]
#[command(name = "draftkeep")]
#[command(version, about, long_about = None)]
struct Args {
    /// Profile directory for local snapshots
    #[arg(long, value_name = "DIR")]
    storage_dir: Option<PathBuf>,

    /// Directory acting as the document service (offline drafts if unset)
    #[arg(long, value_name = "DIR")]
    remote_dir: Option<PathBuf>,

    /// Open a saved document by id
    #[arg(long, value_name = "ID")]
    document: Option<String>,

    /// Start with autosave disabled
    #[arg(long)]
    no_autosave: bool,

    /// Inactivity window before autosave, in seconds
    #[arg(long, value_name = "SECS")]
    autosave_secs: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftkeep=info,draftkeep_session=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load();
    if args.no_autosave {
        config.session.autosave_enabled = false;
    }
    if let Some(secs) = args.autosave_secs {
        config.session = config.session.with_autosave_window(Duration::from_secs(secs));
    }

    let store = match args.storage_dir.or(config.storage_dir.clone()) {
        Some(dir) => FileStore::new(dir),
        None => FileStore::open_default(),
    };
    let remote: Arc<dyn RemoteDocuments> = match args.remote_dir.or(config.remote_dir.clone()) {
        Some(dir) => Arc::new(DirRemote::new(dir)),
        None => Arc::new(Offline),
    };
    tracing::info!(storage = %store.root().display(), "starting session");

    let document = args.document.map(DocumentId::new);
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        let (sink, events) = EventSink::channel();
        let mut controller = SaveController::new(store, remote, &config.session, sink);

        match document {
            Some(id) => controller.open_remote(id).await?,
            None => {
                // Drafts pick up where the last local snapshot left off
                let latest = controller.history().latest();
                controller.open(
                    DocumentIdentity::Draft,
                    latest.as_ref().map(|entry| entry.state()),
                );
            }
        }

        App::new(controller).run(events).await
    })
}
