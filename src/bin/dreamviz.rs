use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use dreamviz::scene::archive::{clear_archive, find_dream, load_archive, merge_archives};
use dreamviz::{DirKv, EngineConfig, Frame, SourceImage, Visualizer};

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "dreamviz", version)]
struct Cli {
    /// Engine config JSON (defaults apply when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a scene and render it to a PNG.
    Frame(FrameArgs),
    /// Replay an archived dream and render it to a PNG.
    Replay(ReplayArgs),
    /// List archived dreams. Read-only.
    List,
    /// Rewrite both archive keys with their deduplicated union.
    Merge,
    /// Remove every archived dream.
    Clear,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Scene image, followed by optional helper images.
    #[arg(long = "image")]
    images: Vec<PathBuf>,

    /// Take the scene and helpers from a shuffled reference pool instead.
    #[arg(long, default_value_t = false)]
    random: bool,

    /// Background preset name.
    #[arg(long)]
    preset: Option<String>,

    #[arg(long)]
    owner: Option<String>,

    #[arg(long)]
    mood: Option<String>,

    /// Mood intensity, 1..10.
    #[arg(long)]
    intensity: Option<i64>,

    /// Helper image count, 1..8.
    #[arg(long)]
    helpers: Option<f64>,

    /// Frames to simulate before writing.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Output PNG path, or a directory to write an auto-named file into.
    #[arg(long)]
    out: PathBuf,

    /// Also append the scene to the archive.
    #[arg(long, default_value_t = false)]
    save: bool,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Archived dream id.
    #[arg(long)]
    id: String,

    /// Scene image to replay with (the archived thumbnail is used otherwise).
    #[arg(long)]
    image: Option<PathBuf>,

    #[arg(long, default_value_t = 60)]
    frames: u64,

    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Frame(args) => cmd_frame(&config, args),
        Command::Replay(args) => cmd_replay(&config, args),
        Command::List => cmd_list(&config),
        Command::Merge => cmd_merge(&config),
        Command::Clear => cmd_clear(&config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(config.with_env())
}

fn visualizer(config: &EngineConfig) -> anyhow::Result<Visualizer> {
    let pool = config.load_pool();
    let font = config.load_font();
    Visualizer::new(config, pool, font).context("create visualizer")
}

fn cmd_frame(config: &EngineConfig, args: FrameArgs) -> anyhow::Result<()> {
    let mut vis = visualizer(config)?;

    if args.random {
        anyhow::ensure!(vis.load_random_set(), "reference pool is empty");
    } else if !args.images.is_empty() {
        vis.load_images(args.images);
        anyhow::ensure!(
            vis.wait_for_loads(LOAD_TIMEOUT),
            "none of the given images could be loaded"
        );
    }

    if let Some(owner) = args.owner {
        vis.answer("ownerName", serde_json::Value::String(owner))?;
    }
    if let Some(preset) = args.preset.as_deref() {
        vis.select_preset(preset);
    }
    if let Some(mood) = args.mood.as_deref() {
        vis.set_mood_text(mood);
    }
    if let Some(intensity) = args.intensity {
        vis.set_mood_intensity(intensity);
    }
    if let Some(helpers) = args.helpers {
        vis.adjust_helper_count(helpers);
    }
    vis.finish_questions();

    let frame = vis.run_frames(args.frames)?;
    let path = write_output(&vis, &frame, &args.out)?;
    eprintln!("wrote {}", path.display());

    if args.save {
        let mut store = DirKv::new(&config.archive_dir);
        match vis.save_to_archive(&mut store, false)? {
            Some(state) => eprintln!("archived {}", state.id),
            None => eprintln!("dream was not archived"),
        }
    }
    Ok(())
}

fn cmd_replay(config: &EngineConfig, args: ReplayArgs) -> anyhow::Result<()> {
    let store = DirKv::new(&config.archive_dir);
    let state = find_dream(&store, &args.id)
        .with_context(|| format!("no archived dream with id '{}'", args.id))?;
    let image = args
        .image
        .as_deref()
        .map(SourceImage::from_path)
        .transpose()
        .context("load scene image")?;

    let mut vis = visualizer(config)?;
    vis.restore(&state, image);
    let frame = vis.run_frames(args.frames)?;
    let path = write_output(&vis, &frame, &args.out)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_list(config: &EngineConfig) -> anyhow::Result<()> {
    let store = DirKv::new(&config.archive_dir);
    for state in load_archive(&store) {
        println!("{}\t{}", state.id, state.display_name());
    }
    Ok(())
}

fn cmd_merge(config: &EngineConfig) -> anyhow::Result<()> {
    let mut store = DirKv::new(&config.archive_dir);
    let merged = merge_archives(&mut store).context("merge archive keys")?;
    eprintln!("merged {} dreams", merged.len());
    Ok(())
}

fn cmd_clear(config: &EngineConfig) -> anyhow::Result<()> {
    let mut store = DirKv::new(&config.archive_dir);
    clear_archive(&mut store).context("clear archive")?;
    eprintln!("archive cleared");
    Ok(())
}

fn write_output(vis: &Visualizer, frame: &Frame, out: &Path) -> anyhow::Result<PathBuf> {
    if out.is_dir() {
        return vis
            .save_frame_png(frame, out)
            .with_context(|| format!("write png into '{}'", out.display()));
    }
    dreamviz::scene::thumbnail::write_png(frame, out)
        .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(out.to_path_buf())
}
