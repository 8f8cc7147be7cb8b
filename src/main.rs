mod demo;
mod host;
mod session;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use client::config::{ConfigError, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, StoreConfig};
use client::net::api::HttpArtifactStore;
use client::net::store::{ArtifactStore, StoreError};
use client::net::types::ArtifactData;
use client::runtime::Runtime;
use client::state::editor::{EditorCore, Event, Phase};
use client::state::status::StatusTone;
use tracing_subscriber::EnvFilter;

use crate::host::SvgFileHost;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Editor(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "qr-editor", about = "Edit QR module matrices held in an artifact store")]
struct Cli {
    #[arg(long, env = "QR_EDITOR_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "QR_EDITOR_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Use built-in sample artifacts instead of a remote store.
    #[arg(long, default_value_t = false)]
    demo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Clone, Copy)]
struct ViewArgs {
    /// Pixels per module.
    #[arg(long, default_value_t = canvas::consts::ZOOM_DEFAULT)]
    zoom: u32,

    /// Device pixel ratio used for the backing-store size.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the store is reachable.
    Ping,
    /// List artifacts as JSON.
    List,
    /// Print an artifact's metadata and matrix.
    Show { id: String },
    /// Render an artifact as SVG, to a file or stdout.
    Render {
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Toggle one cell by index.
    Toggle { id: String, x: usize, y: usize },
    /// Toggle the cell under a canvas point, as a pointer click would.
    Click {
        id: String,
        px: f64,
        py: f64,
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Overwrite an artifact with a matrix read from a JSON file.
    Save {
        id: String,
        #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
        input: String,
    },
    /// Export an artifact as PNG on the store side.
    Export {
        id: String,
        #[arg(long)]
        out_name: Option<String>,
    },
    /// Interactive editing session driven by stdin commands.
    Session {
        #[arg(long)]
        preselect: Option<String>,
        #[arg(long, default_value = "qr-editor.svg")]
        out: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // A missing .env file is not an error.
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        eprintln!("ignoring .env: {err}");
    }
    init_tracing();

    let cli = Cli::parse();
    let config = StoreConfig::new(&cli.base_url, cli.timeout_secs)?;

    if cli.demo {
        tracing::info!("using built-in demo store");
        run(Arc::new(demo::demo_store()), &config, cli.command).await
    } else {
        tracing::info!(base_url = config.base_url(), "using HTTP store");
        run(Arc::new(HttpArtifactStore::new(&config)?), &config, cli.command).await
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run<S>(store: Arc<S>, config: &StoreConfig, command: Command) -> Result<(), CliError>
where
    S: ArtifactStore + 'static,
{
    match command {
        Command::Ping => {
            store.health().await?;
            println!("ok");
            Ok(())
        }
        Command::List => {
            let items = store.list_artifacts().await?;
            print_json(&serde_json::to_value(items)?)
        }
        Command::Show { id } => {
            let data = store.load_artifact(&id).await?;
            let grid = data.to_grid().map_err(StoreError::from)?;
            println!(
                "file={id} | module={}, width={}, height={}, dark={}",
                grid.module_count(),
                grid.width_px(),
                grid.height_px(),
                grid.dark_count()
            );
            for row in grid.rows() {
                let line: String = row.iter().map(|&v| if v == 1 { '#' } else { '.' }).collect();
                println!("{line}");
            }
            Ok(())
        }
        Command::Render { id, out, view } => {
            let mut runtime = editor(store, config, SvgFileHost::new(out.clone()), EditorCore::new(), view);
            open(&mut runtime, &id).await?;
            finish(&mut runtime)?;
            match out {
                Some(out) => println!("{}", out.display()),
                None => println!("{}", runtime.host().document()),
            }
            Ok(())
        }
        Command::Toggle { id, x, y } => {
            let value = store.toggle_cell(&id, canvas::grid::Cell::new(x, y)).await?;
            print_json(&serde_json::json!({ "ok": true, "value": value }))
        }
        Command::Click { id, px, py, out, view } => {
            let mut runtime = editor(store, config, SvgFileHost::new(out), EditorCore::new(), view);
            open(&mut runtime, &id).await?;
            let before = runtime.core().pending_toggles();
            runtime.dispatch(Event::PointerClick { x: px, y: py });
            if runtime.core().pending_toggles() == before {
                return Err(CliError::Editor(format!("({px}, {py}) is outside the grid")));
            }
            runtime.run_until_idle().await;
            report_status(&runtime)?;
            finish(&mut runtime)
        }
        Command::Save { id, input } => {
            let data: ArtifactData = serde_json::from_str(&read_input(&input)?)?;
            let grid = data.to_grid().map_err(StoreError::from)?;
            let saved = store.save_artifact(&id, &grid).await?;
            print_json(&serde_json::json!({ "ok": true, "saved": saved }))
        }
        Command::Export { id, out_name } => {
            let saved = store.export_png(&id, out_name.as_deref()).await?;
            print_json(&serde_json::json!({ "ok": true, "saved": saved }))
        }
        Command::Session { preselect, out, view } => {
            let core = preselect.map_or_else(EditorCore::new, |id| EditorCore::new().with_preselect(id));
            let host = SvgFileHost::new(Some(out)).echo(true);
            let mut runtime = session::run_session(editor(store, config, host, core, view)).await;
            eprintln!(
                "session ended: {} artifacts listed, {} repaints",
                runtime.host().catalog().len(),
                runtime.host().renders()
            );
            finish(&mut runtime)
        }
    }
}

fn editor<S>(
    store: Arc<S>,
    config: &StoreConfig,
    host: SvgFileHost,
    core: EditorCore,
    view: ViewArgs,
) -> Runtime<S, SvgFileHost>
where
    S: ArtifactStore + 'static,
{
    let mut runtime = Runtime::new(core, store, host, config.request_timeout());
    runtime.dispatch(Event::ZoomChanged { zoom: view.zoom });
    runtime.dispatch(Event::DevicePixelRatioChanged { device_pixel_ratio: view.dpr });
    runtime
}

/// Load `id` through the editor and fail if it did not become ready.
async fn open<S>(runtime: &mut Runtime<S, SvgFileHost>, id: &str) -> Result<(), CliError>
where
    S: ArtifactStore + 'static,
{
    runtime.dispatch(Event::Select { id: id.to_owned() });
    runtime.run_until_idle().await;
    if runtime.core().phase() == Phase::Ready {
        if let Some(meta) = runtime.core().metadata_line() {
            eprintln!("{meta}");
        }
        if let Some(url) = runtime.host().reference() {
            eprintln!("reference: {url}");
        }
        return Ok(());
    }
    let reason = runtime
        .host()
        .last_status()
        .map_or_else(|| format!("failed to load {id}"), |s| s.text.clone());
    Err(CliError::Editor(reason))
}

fn report_status<S>(runtime: &Runtime<S, SvgFileHost>) -> Result<(), CliError>
where
    S: ArtifactStore + 'static,
{
    match runtime.host().last_status() {
        Some(status) if status.tone == StatusTone::Error => Err(CliError::Editor(status.text.clone())),
        Some(status) => {
            println!("{}", status.text);
            Ok(())
        }
        None => Ok(()),
    }
}

fn finish<S>(runtime: &mut Runtime<S, SvgFileHost>) -> Result<(), CliError>
where
    S: ArtifactStore + 'static,
{
    match runtime.host_mut().take_write_error() {
        Some(err) => Err(CliError::Io(err)),
        None => Ok(()),
    }
}

fn read_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
