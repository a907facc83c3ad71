use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use storyframe::{BrandConfigStore as _, FontSpec};

#[derive(Parser, Debug)]
#[command(name = "storyframe", version)]
struct Cli {
    /// Directory holding `brand-config.json` (default: $STORYFRAME_CONFIG_DIR or ./.storyframe).
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flatten an asset with its overlays into one image.
    Flatten(FlattenArgs),
    /// Print the live preview layer stack as JSON.
    Preview(PreviewArgs),
    /// Print the resolved layout for a preset name.
    Layout {
        /// Preset name; unknown names resolve to `center_focus`.
        name: String,
    },
    /// Print the dominant palette of an image.
    Palette {
        /// Image file.
        image: PathBuf,
    },
    /// Show or change the persisted brand config.
    Brand {
        #[command(subcommand)]
        cmd: BrandCommand,
    },
}

#[derive(Parser, Debug)]
struct FlattenArgs {
    /// Asset JSON. Relative image paths resolve against its directory.
    #[arg(long)]
    asset: PathBuf,

    /// Brand JSON; defaults to the persisted brand config.
    #[arg(long)]
    brand: Option<PathBuf>,

    /// Output path. `.jpg`/`.jpeg` selects JPEG, anything else PNG.
    #[arg(long)]
    out: PathBuf,

    /// Output width.
    #[arg(long, default_value_t = 1080)]
    width: u32,

    /// Output height.
    #[arg(long, default_value_t = 1920)]
    height: u32,

    /// JPEG quality.
    #[arg(long, default_value_t = 92)]
    quality: u8,

    /// Font directory (`.ttf`/`.otf`). Without it, the brand font is looked up among the
    /// installed system fonts; text export fails if none is found.
    #[arg(long, env = "STORYFRAME_FONTS_DIR")]
    fonts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Asset JSON.
    #[arg(long)]
    asset: PathBuf,

    /// Brand JSON; defaults to the persisted brand config.
    #[arg(long)]
    brand: Option<PathBuf>,

    /// Include the safe-area guide layer.
    #[arg(long, default_value_t = false)]
    guide: bool,
}

#[derive(Subcommand, Debug)]
enum BrandCommand {
    /// Print the current brand config.
    Show,
    /// Update fields of the brand config and persist it.
    Set {
        /// Primary color, e.g. `#6366f1`.
        #[arg(long)]
        color: Option<String>,
        /// Font label.
        #[arg(long)]
        font: Option<String>,
        /// Logo image path or URL.
        #[arg(long, conflicts_with = "no_logo")]
        logo: Option<String>,
        /// Remove the logo.
        #[arg(long, default_value_t = false)]
        no_logo: bool,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let store = storyframe::JsonFileBrandStore::in_dir(storyframe::resolve_config_dir(
        cli.config_dir.as_deref(),
    ));
    match cli.cmd {
        Command::Flatten(args) => cmd_flatten(args, &store),
        Command::Preview(args) => cmd_preview(args, &store),
        Command::Layout { name } => print_json(&storyframe::resolve_layout(&name)),
        Command::Palette { image } => cmd_palette(&image),
        Command::Brand { cmd } => cmd_brand(cmd, &store),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("STORYFRAME_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn cmd_flatten(args: FlattenArgs, store: &storyframe::JsonFileBrandStore) -> anyhow::Result<()> {
    let asset = read_asset(&args.asset)?;
    let brand = read_brand(args.brand.as_deref(), store)?;

    let mut fonts = storyframe::FontLibrary::new();
    if let Some(dir) = &args.fonts {
        let n = fonts.load_dir(dir)?;
        tracing::info!(dir = %dir.display(), faces = n, "loaded fonts");
    } else if asset.settings.text_overlay.is_drawn() {
        let n = fonts.load_system_fonts(&[brand.font()]);
        if n == 0 {
            tracing::warn!("no --fonts dir and no usable system font; text cannot be drawn");
        }
    }

    let source = storyframe::FsByteSource::new(parent_dir(&args.asset));
    let compositor = storyframe::Compositor::new(Arc::new(source), fonts);

    let is_jpeg = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    let opts = storyframe::FlattenOpts {
        canvas: storyframe::Canvas::new(args.width, args.height)?,
        format: if is_jpeg {
            storyframe::OutputFormat::Jpeg {
                quality: args.quality.clamp(1, 100),
            }
        } else {
            storyframe::OutputFormat::Png
        },
    };
    let out = compositor.flatten(&asset, &brand, &opts)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &out.bytes)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs, store: &storyframe::JsonFileBrandStore) -> anyhow::Result<()> {
    let asset = read_asset(&args.asset)?;
    let brand = read_brand(args.brand.as_deref(), store)?;
    let stack = storyframe::build_preview(
        &asset,
        &brand,
        storyframe::PreviewOptions {
            show_guide: args.guide,
            ..storyframe::PreviewOptions::default()
        },
    );
    print_json(&stack)
}

fn cmd_palette(image: &Path) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(image).with_context(|| format!("read image '{}'", image.display()))?;
    print_json(&storyframe::extract_palette(&bytes)?)
}

fn cmd_brand(cmd: BrandCommand, store: &storyframe::JsonFileBrandStore) -> anyhow::Result<()> {
    let mut brand = storyframe::load_or_default(store);
    match cmd {
        BrandCommand::Show => print_json(&brand),
        BrandCommand::Set {
            color,
            font,
            logo,
            no_logo,
        } => {
            if let Some(c) = color {
                brand.primary_color = c.parse()?;
            }
            if let Some(f) = font {
                if !FontSpec::labels().any(|l| l == f) {
                    tracing::warn!(font = %f, "unknown font label; rendering falls back to the default");
                }
                brand.font_preference = f;
            }
            if let Some(l) = logo {
                brand.logo_image = Some(storyframe::ImageRef::new(l));
            }
            if no_logo {
                brand.logo_image = None;
            }
            store.save(&brand)?;
            eprintln!("wrote {}", store.path().display());
            print_json(&brand)
        }
    }
}

fn read_asset(path: &Path) -> anyhow::Result<storyframe::GeneratedAsset> {
    let bytes = std::fs::read(path).with_context(|| format!("read asset '{}'", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse asset '{}'", path.display()))
}

fn read_brand(
    path: Option<&Path>,
    store: &storyframe::JsonFileBrandStore,
) -> anyhow::Result<storyframe::BrandConfig> {
    let Some(path) = path else {
        return Ok(storyframe::load_or_default(store));
    };
    let bytes = std::fs::read(path).with_context(|| format!("read brand '{}'", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse brand '{}'", path.display()))
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{s}");
    Ok(())
}
