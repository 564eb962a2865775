//! Glimpse CLI - browse asset folders and preview frame animations from a terminal.
//!
//! This is the main entry point for the Glimpse command-line application.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glob::{MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use glimpse::anim::{classify, Selection, DEFAULT_FPS};
use glimpse::index::{AssetFilter, SortDirection, DEFAULT_MAX_DEPTH};
use glimpse::prelude::*;

/// Glimpse - asset folder browser and animation previewer
#[derive(Parser)]
#[command(name = "glimpse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the asset tree of a folder
    Tree {
        /// Folder to scan
        folder: PathBuf,

        /// Deepest folder level to descend into
        #[arg(short = 'd', long, env = "GLIMPSE_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Leave audio files out
        #[arg(long)]
        images_only: bool,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every asset file under a folder, sorted by name
    List {
        /// Folder to scan
        folder: PathBuf,

        /// Deepest folder level to descend into
        #[arg(short = 'd', long, env = "GLIMPSE_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Leave audio files out
        #[arg(long)]
        images_only: bool,

        /// Filter pattern for file names (glob-style, case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,

        /// Sort Z to A
        #[arg(long)]
        desc: bool,

        /// Print the assets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the numbered sequence a file belongs to
    Sequence {
        /// Any frame of the sequence
        file: PathBuf,

        /// Print the frames as JSON
        #[arg(long)]
        json: bool,
    },

    /// Slice a sprite sheet into grid cells
    Sheet {
        /// Sprite-sheet image
        file: PathBuf,

        /// Grid as ROWSxCOLUMNS
        #[arg(short, long, env = "GLIMPSE_GRID", default_value_t = SheetGrid::default())]
        grid: SheetGrid,

        /// Image size as WIDTHxHEIGHT instead of reading the file header
        #[arg(long, value_parser = parse_size)]
        size: Option<(u32, u32)>,

        /// Print the cells as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a sequence or sprite sheet, printing each frame as it is shown
    Play {
        /// Frame of a sequence, or a sprite-sheet image
        file: PathBuf,

        /// Frames per second
        #[arg(long, env = "GLIMPSE_FPS", default_value_t = DEFAULT_FPS)]
        fps: u32,

        /// How long to play
        #[arg(short, long, default_value_t = 3.0)]
        seconds: f64,

        /// Grid for sprite sheets, as ROWSxCOLUMNS
        #[arg(short, long, env = "GLIMPSE_GRID", default_value_t = SheetGrid::default())]
        grid: SheetGrid,

        /// Sprite-sheet size as WIDTHxHEIGHT instead of reading the file header
        #[arg(long, value_parser = parse_size)]
        size: Option<(u32, u32)>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "glimpse=debug" } else { "glimpse=info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(default_level.parse()?))
        .init();

    debug!(version = glimpse::VERSION, "starting");

    match cli.command {
        Commands::Tree { folder, max_depth, images_only, json } => {
            cmd_tree(&folder, scan_options(max_depth, images_only), json)?;
        }
        Commands::List { folder, max_depth, images_only, filter, desc, json } => {
            cmd_list(&folder, scan_options(max_depth, images_only), filter.as_deref(), desc, json)?;
        }
        Commands::Sequence { file, json } => {
            cmd_sequence(&file, json)?;
        }
        Commands::Sheet { file, grid, size, json } => {
            cmd_sheet(&file, grid, size, json)?;
        }
        Commands::Play { file, fps, seconds, grid, size } => {
            cmd_play(&file, fps, seconds, grid, size)?;
        }
    }

    Ok(())
}

fn scan_options(max_depth: usize, images_only: bool) -> ScanOptions {
    let filter = if images_only {
        AssetFilter::images_only()
    } else {
        AssetFilter::default()
    };
    ScanOptions::default().with_max_depth(max_depth).with_filter(filter)
}

/// Scan `folder` on a session, showing a spinner until the result arrives.
fn load_folder(folder: &Path, options: SessionOptions) -> Result<Session> {
    let mut session = Session::new(options);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Scanning {}", folder.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    session.request_scan(folder);
    let update = loop {
        if let Some(update) = session.wait_scan(Duration::from_millis(250)) {
            break update;
        }
        if !session.is_scanning() {
            pb.finish_and_clear();
            bail!("Scan of {} produced no result", folder.display());
        }
    };
    pb.finish_and_clear();

    match update {
        SessionUpdate::Scanned { assets, .. } => {
            info!(assets, elapsed = ?start.elapsed(), "scan complete");
            Ok(session)
        }
        SessionUpdate::ScanFailed { error, .. } => {
            Err(error).with_context(|| format!("Failed to scan {}", folder.display()))
        }
    }
}

fn cmd_tree(folder: &Path, scan: ScanOptions, json: bool) -> Result<()> {
    let session = load_folder(folder, SessionOptions { scan, ..SessionOptions::default() })?;
    let Some(listing) = session.listing() else {
        bail!("No listing for {}", folder.display());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(listing)?);
        return Ok(());
    }

    println!("{}/", listing.name);
    for node in &listing.children {
        print_node(node, 1);
    }

    let total: usize = listing.children.iter().map(TreeNode::count).sum();
    println!("\nTotal: {} entries", total);

    Ok(())
}

fn print_node(node: &TreeNode, level: usize) {
    let indent = "  ".repeat(level);
    match node {
        TreeNode::Folder(folder) => {
            let marker = if folder.truncated { " (not scanned, too deep)" } else { "" };
            println!("{indent}{}/{marker}", folder.name);
            for child in &folder.children {
                print_node(child, level + 1);
            }
        }
        TreeNode::File(file) => println!("{indent}{} [{}]", file.name, file.asset),
    }
}

fn cmd_list(folder: &Path, scan: ScanOptions, filter: Option<&str>, desc: bool, json: bool) -> Result<()> {
    let sort = if desc { SortDirection::Descending } else { SortDirection::Ascending };
    let session = load_folder(folder, SessionOptions { scan, sort, ..SessionOptions::default() })?;

    let pattern = filter
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid filter pattern {p:?}")))
        .transpose()?;
    let match_options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let assets: Vec<&AssetEntry> = session
        .assets()
        .iter()
        .filter(|a| pattern.as_ref().map_or(true, |p| p.matches_with(&a.name, match_options)))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&assets)?);
        return Ok(());
    }

    for asset in &assets {
        println!("{:<6} {}", asset.kind.to_string(), asset.path.display());
    }
    println!("\nTotal: {} assets", assets.len());

    Ok(())
}

fn cmd_sequence(file: &Path, json: bool) -> Result<()> {
    let name = file_name(file)?;

    match classify(name) {
        Selection::SequenceCandidate(parsed) => {
            debug!(base = %parsed.base, number = ?parsed.number, extension = %parsed.extension, "parsed name");
        }
        Selection::SpriteSheet => bail!("{name} looks like a sprite sheet; try `glimpse sheet`"),
        Selection::Audio | Selection::Still => bail!("{name} is not a numbered image"),
    }

    let frames = resolve_animation(file, None, SheetGrid::default())?;
    let Some(FrameSet::Files(frames)) = frames else {
        println!("{name} has no sibling frames");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&frames)?);
        return Ok(());
    }

    for (index, frame) in frames.iter().enumerate() {
        println!("{:>4} {}", index, frame.name);
    }
    println!("\nTotal: {} frames", frames.len());

    Ok(())
}

fn cmd_sheet(file: &Path, grid: SheetGrid, size: Option<(u32, u32)>, json: bool) -> Result<()> {
    let name = file_name(file)?;
    if classify(name) != Selection::SpriteSheet {
        warn!(%name, "name does not mark a sprite sheet, slicing anyway");
    }

    let (width, height) = image_size(file, size)?;
    let frames = grid
        .frames(width, height)
        .with_context(|| format!("Cannot slice {name} with grid {grid}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&frames)?);
        return Ok(());
    }

    println!("{name}: {width}x{height} px, grid {grid}");
    for (index, cell) in frames.iter().enumerate() {
        println!(
            "{:>4} x={:.2} y={:.2} w={:.2} h={:.2}",
            index, cell.x, cell.y, cell.width, cell.height
        );
    }

    Ok(())
}

fn cmd_play(file: &Path, fps: u32, seconds: f64, grid: SheetGrid, size: Option<(u32, u32)>) -> Result<()> {
    let name = file_name(file)?;
    let size = match classify(name) {
        Selection::SpriteSheet => Some(image_size(file, size)?),
        _ => size,
    };

    let Some(frames) = resolve_animation(file, size, grid)? else {
        bail!("{name} is not animated");
    };

    let mut controller = FrameController::new(PlaybackConfig { fps });
    let shown = Arc::new(AtomicUsize::new(0));
    let counter = shown.clone();
    controller.set_observer(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    controller.load(frames);
    println!(
        "Playing {} frames at {} fps for {:.1}s",
        controller.frames().map_or(0, FrameSet::len),
        controller.frames_per_second(),
        seconds
    );
    print_frame(&controller);

    let deadline = play_deadline(Instant::now(), seconds)?;

    controller.play();
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        if controller.wait_tick(remaining) {
            print_frame(&controller);
        }
    }
    controller.pause();

    println!("\nShown {} frames", shown.load(Ordering::Relaxed));
    controller.unload();

    Ok(())
}

/// When playback started at `start` should stop.
fn play_deadline(start: Instant, seconds: f64) -> Result<Instant> {
    let duration = Duration::try_from_secs_f64(seconds.max(0.0))
        .with_context(|| format!("Invalid duration: {seconds}s"))?;
    match start.checked_add(duration) {
        Some(deadline) => Ok(deadline),
        None => bail!("Duration too long: {seconds}s"),
    }
}

fn print_frame(controller: &FrameController) {
    let Some(index) = controller.current_index() else {
        return;
    };
    match controller.current_frame() {
        Some(FrameDescriptor::File(frame)) => println!("{:>4} {}", index, frame.name),
        Some(FrameDescriptor::Sheet(cell)) => println!(
            "{:>4} x={:.2} y={:.2} w={:.2} h={:.2}",
            index, cell.x, cell.y, cell.width, cell.height
        ),
        None => {}
    }
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))
}

/// The given size, or the size read from the image header.
fn image_size(file: &Path, size: Option<(u32, u32)>) -> Result<(u32, u32)> {
    match size {
        Some(size) => Ok(size),
        None => image::image_dimensions(file)
            .with_context(|| format!("Failed to read image size of {}", file.display())),
    }
}

/// Parse `WIDTHxHEIGHT`.
fn parse_size(s: &str) -> std::result::Result<(u32, u32), String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let width = width.trim().parse().map_err(|e| format!("invalid width: {e}"))?;
    let height = height.trim().parse().map_err(|e| format!("invalid height: {e}"))?;
    Ok((width, height))
}
