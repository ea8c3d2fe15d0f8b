use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "spotdrift", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single animation frame as a PNG.
    Frame(FrameArgs),
    /// Render a numbered PNG frame sequence.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based) to capture.
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of frames to render.
    #[arg(long)]
    frames: u32,

    /// Output directory for frame_NNNN.png files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<spotdrift::Scene> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let r = BufReader::new(f);
    let scene: spotdrift::Scene =
        serde_json::from_reader(r).with_context(|| "parse scene JSON")?;
    Ok(scene)
}

fn build_animator(in_path: &Path) -> anyhow::Result<spotdrift::Animator> {
    let scene = read_scene_json(in_path)?;
    scene.validate()?;

    let root = in_path.parent().unwrap_or_else(|| Path::new("."));
    let sources: Vec<String> = scene.items.iter().map(|i| i.source.clone()).collect();
    let images = spotdrift::load_images(root, &sources)?;

    Ok(spotdrift::Animator::from_scene(&scene, &images)?)
}

fn write_png(frame: &spotdrift::FrameRGBA, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut animator = build_animator(&args.in_path)?;

    animator.start();
    for _ in 0..=args.frame {
        animator.tick()?;
    }

    write_png(&animator.frame_rgba(), &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut animator = build_animator(&args.in_path)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let frames = animator.capture_frames(args.frames)?;
    for (idx, frame) in frames.iter().enumerate() {
        let out = args.out_dir.join(format!("frame_{idx:04}.png"));
        write_png(frame, &out)?;
    }

    eprintln!("wrote {} frames to {}", frames.len(), args.out_dir.display());
    Ok(())
}
