//! minqr command line
//!
//! Encodes one text argument and writes the symbol as SVG, or as PNG when the
//! output path ends in `.png`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use minqr::{
    config::RenderOptions,
    helper::{print_qr, write_png, write_svg},
    qrcode::{Mask, QrCode},
};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const MAX_MARGIN: i64 = 1000;
const MAX_UNIT: i64 = 1000;
const DEFAULT_DARK: &str = "#000000";
const DEFAULT_LIGHT: &str = "#FFFFFF";

/// minqr - QR code generator for short texts (versions 1-4, level L)
#[derive(Parser, Debug)]
#[command(name = "minqr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Encode a short text as a QR code image", long_about = None)]
struct Args {
    /// Text to encode, typically a URL
    text: String,

    /// Output path; `.png` writes a raster image, anything else SVG
    output: PathBuf,

    /// Quiet zone width in modules
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(0..=MAX_MARGIN))]
    margin: u32,

    /// Size of one module in output units
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=MAX_UNIT))]
    unit: u32,

    /// Fill colour of dark modules (SVG only)
    #[arg(long, default_value = DEFAULT_DARK)]
    dark: String,

    /// Background colour (SVG only)
    #[arg(long, default_value = DEFAULT_LIGHT, conflicts_with = "transparent")]
    light: String,

    /// Omit the background rectangle (SVG only)
    #[arg(long, default_value = "false")]
    transparent: bool,

    /// Force a mask pattern instead of choosing by penalty score
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=7))]
    mask: Option<u8>,

    /// Also print the symbol to the terminal
    #[arg(long, default_value = "false")]
    print: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    setup_logging(&args.log_level)?;

    let qr = QrCode::encode_text(&args.text, args.mask.map(Mask::new))
        .with_context(|| format!("Cannot encode {:?}", args.text))?;
    info!(
        version = qr.version().value(),
        mask = qr.mask().value(),
        size = qr.size(),
        "encoded"
    );

    let light = if args.transparent {
        None
    } else {
        Some(args.light.as_str())
    };
    let opts = RenderOptions::default()
        .with_margin(args.margin)
        .with_unit(args.unit)
        .with_dark(args.dark.as_str())
        .with_light(light);

    if is_png(&args.output) {
        let ignored = svg_only_options(&args);
        if !ignored.is_empty() {
            warn!(options = ?ignored, "colour options only apply to SVG output");
        }
        write_png(&qr, &opts, &args.output)?;
    } else {
        write_svg(&qr, &opts, &args.output)?;
    }

    if args.print {
        print_qr(&qr);
    }
    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Colour flags that were changed from their defaults; PNG output ignores them.
fn svg_only_options(args: &Args) -> Vec<&'static str> {
    let mut ignored = Vec::new();
    if args.dark != DEFAULT_DARK {
        ignored.push("--dark");
    }
    if args.light != DEFAULT_LIGHT {
        ignored.push("--light");
    }
    if args.transparent {
        ignored.push("--transparent");
    }
    ignored
}

/// Setup logging with tracing
fn setup_logging(level: &str) -> Result<()> {
    let log_level = level
        .parse::<Level>()
        .with_context(|| format!("Invalid log level: {}", level))?;

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}
