use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "emojify", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the fonts found in a directory.
    Fonts(FontsArgs),
    /// Render a JSON request to an image file.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Font directory (defaults to the configured one).
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Request JSON file.
    #[arg(long)]
    request: PathBuf,

    /// Output image path; the format's extension is added when it has none.
    #[arg(long)]
    out: PathBuf,

    /// Font directory (defaults to the configured one).
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Settings JSON file; `EMOJIFY_*` variables still apply on top.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Fonts(args) => cmd_fonts(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_settings(config: Option<&Path>) -> anyhow::Result<emojify::Settings> {
    let settings = match config {
        Some(path) => emojify::Settings::load(path)?,
        None => emojify::Settings::from_env(),
    };
    settings.engine.validate()?;
    emojify::logging::init_logging(&settings.logging);
    Ok(settings)
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let settings = load_settings(None)?;
    let dir = args.font_dir.unwrap_or(settings.font_directory);
    let catalog = emojify::FontCatalog::scan_dir(&dir)?;

    for asset in catalog.assets() {
        println!("{}\t{}", asset.id, asset.name);
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    let dir = args.font_dir.unwrap_or_else(|| settings.font_directory.clone());
    let catalog = emojify::FontCatalog::scan_dir(&dir)?;

    let body = std::fs::read_to_string(&args.request)
        .with_context(|| format!("read request '{}'", args.request.display()))?;
    let spec = emojify::RenderRequest::from_json(&body)?.validate(&settings)?;

    let result = emojify::render(&catalog, &spec, &settings.engine)?;

    let out = output_path(args.out, result.format);
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, &result.bytes)
        .with_context(|| format!("write image '{}'", out.display()))?;

    println!("{}\t{}", result.mime_type(), result.size_bytes);
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn output_path(mut out: PathBuf, format: emojify::OutputFormat) -> PathBuf {
    if out.extension().is_none() {
        out.set_extension(format.extension());
    }
    out
}
