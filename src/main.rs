//! chroma-demo - Command Line Entry Point
//!
//! Plays the demo sequencer in the terminal and edits the persisted widget
//! configuration.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use chroma_demo::constants::{CONFIG_STORAGE_KEY, LOG_FILE_PREFIX};
use chroma_demo::domain::catalog::{DemoCatalog, mobile_catalog};
use chroma_demo::domain::config::WidgetKey;
use chroma_demo::domain::media::MediaRef;
use chroma_demo::eventing::AppEvent;
use chroma_demo::sequencer::{DemoSequencer, EndOfCatalog, LoopTypewriter, SequencerTiming, ViewState};
use chroma_demo::services::{SequencerPlayer, block_on, drive, follow_config};
use chroma_demo::state::ConfigStore;
use chroma_demo::states::{AppSettings, settings_path};
use chroma_demo::utils::format::{format_media, format_view};
use chroma_demo::utils::FileStorage;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const RENDER_INTERVAL: Duration = Duration::from_millis(40);

#[derive(Parser, Debug)]
#[command(name = "chroma-demo", version, about = "Chroma-key widget demo driver")]
struct Cli {
    /// Directory holding componentConfig.json (overrides settings)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// tracing filter directive (overrides settings and RUST_LOG)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the category/item demo sequencer.
    Play(PlayArgs),
    /// Run a looping typewriter widget.
    Type(TypeArgs),
    /// Inspect or edit the persisted widget configuration.
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
    /// Show how a media reference is presented.
    Media {
        /// Reference, `@` prefix for still images
        reference: String,
    },
    /// Show the resolved macWindow frame.
    Window,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Variant {
    /// Compiled-in mobile catalog
    Mobile,
    /// Catalog from the interactiveTypewriter section
    Interactive,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[arg(long, value_enum, default_value_t = Variant::Mobile)]
    variant: Variant,

    /// Stop after the last category instead of looping.
    #[arg(long, default_value_t = false)]
    halt: bool,

    /// Start at this category index.
    #[arg(long)]
    category: Option<usize>,

    /// Play for this many seconds.
    #[arg(long, default_value_t = 30)]
    seconds: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TypeWidget {
    Terminal,
    Menu,
}

#[derive(Parser, Debug)]
struct TypeArgs {
    #[arg(value_enum)]
    widget: TypeWidget,

    /// Run for this many seconds.
    #[arg(long, default_value_t = 15)]
    seconds: u64,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the whole snapshot, or one widget section.
    Show { widget: Option<WidgetKey> },
    /// Replace one widget section with JSON from a file (`-` for stdin).
    Edit { widget: WidgetKey, input: PathBuf },
    /// Restore the built-in defaults.
    Reset,
    /// Print the storage and settings file locations.
    Path,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // the log directive and storage dir come from settings, so this load
    // happens before tracing exists; its outcome is logged below
    let loaded = AppSettings::try_load();
    let settings = loaded.as_ref().cloned().unwrap_or_default();
    let storage_dir = match &cli.storage_dir {
        Some(dir) => dir.clone(),
        None => settings.storage_dir()?,
    };
    let _guard = init_tracing(cli.log.as_deref(), settings.log_filter(), &storage_dir)?;
    match &loaded {
        Ok(_) => tracing::info!(path = ?settings_path().ok(), "Settings loaded"),
        Err(e) => tracing::warn!(error = %e, "Settings unreadable, using defaults"),
    }
    tracing::info!(storage_dir = ?storage_dir, "Starting chroma-demo");

    let storage = FileStorage::new(&storage_dir)
        .with_context(|| format!("open storage dir '{}'", storage_dir.display()))?;

    match cli.cmd {
        Command::Play(args) => cmd_play(args, &settings, storage),
        Command::Type(args) => cmd_type(args, storage),
        Command::Config { cmd } => cmd_config(cmd, storage),
        Command::Media { reference } => {
            println!("{}", format_media(&MediaRef::parse(&reference)));
            Ok(())
        }
        Command::Window => {
            let store = ConfigStore::load(Box::new(storage));
            let frame = store.read().mac_window.resolve();
            println!("{frame:#?}");
            println!("buttons: {}", frame.shows_buttons());
            Ok(())
        }
    }
}

/// stderr plus a daily file in `<storage dir>/logs`; keep the guard alive
///
/// Filter precedence: `--log`, then `RUST_LOG`, then the settings file.
fn init_tracing(
    cli_directive: Option<&str>,
    settings_directive: &str,
    storage_dir: &std::path::Path,
) -> anyhow::Result<WorkerGuard> {
    let filter = match cli_directive {
        Some(directive) => EnvFilter::try_new(directive),
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(settings_directive)),
    }
    .context("invalid log filter")?;

    let appender = tracing_appender::rolling::daily(storage_dir.join("logs"), LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .context("install tracing subscriber")?;

    Ok(guard)
}

fn cmd_play(args: PlayArgs, settings: &AppSettings, storage: FileStorage) -> anyhow::Result<()> {
    let mut store = ConfigStore::load(Box::new(storage));
    let (catalog, timing) = match args.variant {
        Variant::Mobile => (Ok(mobile_catalog()), SequencerTiming::mobile()),
        Variant::Interactive => {
            let config = &store.read().interactive_typewriter;
            (
                DemoCatalog::from_config(config),
                SequencerTiming::from_config(&config.animations),
            )
        }
    };
    let mut timing = settings.apply(timing);
    if args.halt {
        timing = timing.with_end_of_catalog(EndOfCatalog::Halt);
    }
    let sequencer = DemoSequencer::from_catalog_result(catalog, timing);

    let sequencer = block_on(async move {
        let player = SequencerPlayer::spawn(sequencer);
        if matches!(args.variant, Variant::Interactive) {
            follow_config(&mut store, &player);
        }
        if let Some(index) = args.category {
            player.select_category(index).await?;
        }

        let deadline = tokio::time::Instant::now() + Duration::from_secs(args.seconds);
        'render: while tokio::time::Instant::now() < deadline {
            tokio::time::sleep(RENDER_INTERVAL).await;
            for event in player.events().try_iter() {
                if render_event(&event)? {
                    break 'render;
                }
            }
        }
        println!();
        Ok::<_, anyhow::Error>(player.shutdown().await?)
    })??;

    if let ViewState::Playing(view) = sequencer.view() {
        println!("{}", format_view(&view));
    }
    Ok(())
}

/// Print one event; true when playback is over
fn render_event(event: &AppEvent) -> anyhow::Result<bool> {
    let mut out = std::io::stdout().lock();
    match event {
        AppEvent::ItemStarted {
            category_id,
            item_id,
            media,
            ..
        } => {
            let media = media.as_ref().map(format_media).unwrap_or_default();
            write!(out, "\n[{category_id}/{item_id}] {media}\n> ")?;
        }
        AppEvent::TextRevealed { text, .. } => {
            write!(out, "\r> {text}")?;
        }
        AppEvent::PhaseChanged { .. } | AppEvent::CatalogWrapped => {}
        AppEvent::ResultShown { result, media } => {
            let media = media.as_ref().map(format_media).unwrap_or_default();
            write!(out, "\n  => {result} {media}")?;
        }
        AppEvent::CategoryCompleted { category_id } => {
            write!(out, "\n  ({category_id} complete)")?;
        }
        AppEvent::Halted => {
            write!(out, "\n(end of catalog)")?;
        }
        AppEvent::NoContent { reason } => {
            write!(out, "nothing to show: {reason}")?;
        }
    }
    out.flush()?;
    Ok(event.is_terminal())
}

fn cmd_type(args: TypeArgs, storage: FileStorage) -> anyhow::Result<()> {
    let store = ConfigStore::load(Box::new(storage));
    let (prompt, mut typewriter) = match args.widget {
        TypeWidget::Terminal => (
            store.read().terminal.prompt.clone(),
            LoopTypewriter::from_terminal(&store.read().terminal),
        ),
        TypeWidget::Menu => (
            ">".to_string(),
            LoopTypewriter::from_menu(&store.read().typewriter_menu),
        ),
    };

    let mut write_error = None;
    block_on(drive(
        &mut typewriter,
        Duration::from_secs(args.seconds),
        |typewriter| {
            if write_error.is_some() {
                return;
            }
            let mut out = std::io::stdout().lock();
            if let Err(e) = write_typed_line(&mut out, &prompt, typewriter.text()) {
                write_error = Some(e);
            }
        },
    ))?;
    if let Some(e) = write_error {
        return Err(anyhow::Error::new(e).context("write to stdout"));
    }
    println!();
    Ok(())
}

/// Redraw the current line; deleting shortens the text, so clear it first
fn write_typed_line(out: &mut impl Write, prompt: &str, text: &str) -> std::io::Result<()> {
    write!(out, "\r\x1b[2K{prompt} {text}")?;
    out.flush()
}

fn cmd_config(cmd: ConfigCommand, storage: FileStorage) -> anyhow::Result<()> {
    let record_path = storage.path_for(CONFIG_STORAGE_KEY)?;
    let mut store = ConfigStore::load(Box::new(storage));

    match cmd {
        ConfigCommand::Show { widget: Some(widget) } => {
            println!("{}", store.section_text(widget)?);
        }
        ConfigCommand::Show { widget: None } => {
            println!("{}", serde_json::to_string_pretty(store.read())?);
        }
        ConfigCommand::Edit { widget, input } => {
            let text = if input.as_os_str() == "-" {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            } else {
                std::fs::read_to_string(&input)
                    .with_context(|| format!("read '{}'", input.display()))?
            };
            store.edit_field(widget, &text)?;
            eprintln!("updated {widget}");
        }
        ConfigCommand::Reset => {
            store.reset();
            eprintln!("restored defaults");
        }
        ConfigCommand::Path => {
            println!("config:   {}", record_path.display());
            println!("settings: {}", settings_path()?.display());
        }
    }
    Ok(())
}
