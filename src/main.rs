//! terramark — offline-first territory map store & editor
//!
//! Usage:
//!   terramark show                        → load (remote → cache → defaults) and list
//!   terramark sync                        → push the local cache to the remote authority
//!   terramark export [--out PATH]         → write a dated artifact file
//!   terramark import FILE --merge|--replace
//!   terramark add --name N --point lat,lon --point lat,lon --point lat,lon
//!   terramark delete NAME [--yes]
//!   terramark last-sync

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use terramark_core::{GeoPoint, Status, StoreConfig, TerritoryMeta};
use terramark_editor::{Decision, Editor};
use terramark_store::{
    HttpRemote, ImportResolution, LocalCache, PendingImport, SyncStatus, TerritoryStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

#[derive(Parser)]
#[command(
    name = "terramark",
    about = "Offline-first territory map store and editor",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Config file (default: ~/.terramark/terramark.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load territories and draw the collection
    Show,
    /// Push the local cache to the remote authority (last-writer-wins)
    Sync,
    /// Export the collection to an artifact file
    Export {
        /// Output path (default: terramark_territories_<date>.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Import an artifact; pick exactly one resolution
    Import {
        file: PathBuf,
        /// Append imported records to the existing collection
        #[arg(long, conflicts_with = "replace")]
        merge: bool,
        /// Discard the existing collection and adopt the imported one
        #[arg(long)]
        replace: bool,
    },
    /// Capture a territory from the given points and commit it
    Add {
        #[arg(long)]
        name: String,
        /// Boundary vertex as lat,lon — repeat at least three times;
        /// the order given is the shape
        #[arg(long = "point", value_parser = parse_point, required = true)]
        points: Vec<GeoPoint>,
        #[arg(long, default_value = "")]
        price: String,
        /// ready | building | planned | stopped (other values accepted)
        #[arg(long, default_value = "building")]
        status: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        floors: String,
        #[arg(long, default_value = "")]
        developer: String,
    },
    /// Arm delete mode and remove a territory by name
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show when the local cache was last written
    LastSync,
}

fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lon, got {:?}", s))?;
    let lat = lat
        .trim()
        .parse()
        .map_err(|_| format!("bad latitude: {:?}", lat))?;
    let lon = lon
        .trim()
        .parse()
        .map_err(|_| format!("bad longitude: {:?}", lon))?;
    Ok(GeoPoint::new(lat, lon))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = cli
        .config
        .as_deref()
        .map(StoreConfig::load)
        .unwrap_or_else(StoreConfig::discover);
    let store = Arc::new(TerritoryStore::new(
        LocalCache::new(config.cache_path()),
        Arc::new(HttpRemote::from_config(&config)),
    ));

    match cli.command {
        Commands::Show => {
            let source = store.load().await;
            println!("{}", source.status_message());
            render::draw_collection(&store.snapshot().await);
        }

        Commands::Sync => match store.sync_to_remote().await {
            SyncStatus::Synced => println!("synced successfully"),
            SyncStatus::NothingToSync => println!("nothing to sync: local cache is empty"),
            SyncStatus::Failed(reason) => {
                println!("sync failed, data kept locally: {}", reason)
            }
        },

        Commands::Export { out } => {
            store.load().await;
            let path = store.export_to_file(out).await?;
            println!("exported {} territories to {}", store.len().await, path.display());
        }

        Commands::Import {
            file,
            merge,
            replace,
        } => {
            if !merge && !replace {
                bail!("choose exactly one of --merge or --replace");
            }
            store.load().await;
            let artifact = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let pending = PendingImport::parse(&artifact)?;
            let count = pending.len();
            let resolution = if merge {
                ImportResolution::Merge
            } else {
                ImportResolution::Replace
            };
            let total = store.apply_import(pending, resolution).await;
            println!("imported {} territories ({} total)", count, total);
            render::draw_collection(&store.snapshot().await);
        }

        Commands::Add {
            name,
            points,
            price,
            status,
            description,
            floors,
            developer,
        } => {
            store.load().await;
            let mut editor = Editor::new(store.clone());
            editor.start();
            for point in points {
                editor.add_point(point)?;
                if let Some(session) = editor.session() {
                    render::draw_session(session);
                }
            }
            editor.finish()?;
            let territory = editor
                .commit(TerritoryMeta {
                    name,
                    price,
                    status: Status::from(status.as_str()),
                    description,
                    floor_info: floors,
                    developer,
                })
                .await?;
            println!(
                "added \"{}\" with {} points",
                territory.name,
                territory.boundary.len()
            );
        }

        Commands::Delete { name, yes } => {
            store.load().await;
            let target = store
                .find_by_name(&name)
                .await
                .ok_or_else(|| anyhow!("no territory named {:?}", name))?;

            let mut editor = Editor::new(store.clone());
            editor.arm_delete();
            let request = editor.request_delete(&target.id).await?;
            let decision = if yes || confirm(&request.name)? {
                Decision::Confirm
            } else {
                Decision::Abandon
            };
            match editor.resolve_delete(request, decision).await? {
                Some(removed) => println!("deleted \"{}\"", removed.name),
                None => println!("kept \"{}\"", name),
            }
        }

        Commands::LastSync => match store.last_sync() {
            Some(ts) => println!("{}", ts.to_rfc3339()),
            None => println!("never"),
        },
    }

    Ok(())
}

fn confirm(name: &str) -> anyhow::Result<bool> {
    use std::io::Write;
    print!("delete \"{}\"? [y/N] ", name);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terramark=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
