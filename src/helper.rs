use crate::config::RenderOptions;
use crate::error::{QrError, Result};
use crate::qrcode::QrCode;

use image::{ImageBuffer, ImageFormat, Luma};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

/*---- Utilities ----*/

/// Returns a string of SVG code for an image depicting the given QR Code.
///
/// The canvas is `(size + 2 * margin) * unit` wide and high. Every dark
/// module becomes one `<rect>`; the light background is a single `<rect>`
/// covering the canvas, or is omitted when `opts.light` is `None`. The string
/// always uses Unix newlines (\n), regardless of the platform.
///
/// # Example
///
/// ```rust
/// use minqr::{config::RenderOptions, helper::to_svg_string, qrcode::QrCode};
///
/// let qr = QrCode::encode_text("HELLO", None).unwrap();
/// let svg = to_svg_string(&qr, &RenderOptions::default());
/// assert!(svg.contains("width=\"290\""));
/// ```
pub fn to_svg_string(qr: &QrCode, opts: &RenderOptions) -> String {
    // Every module offset below is bounded by the checked canvas size
    let dimension = opts.canvas_size(qr.size() as u32);
    let (unit, margin) = (opts.unit, opts.margin);
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\" shape-rendering=\"crispEdges\">\n",
        dimension
    );
    if let Some(light) = &opts.light {
        result += &format!(
            "\t<rect width=\"{0}\" height=\"{0}\" fill=\"{1}\"/>\n",
            dimension,
            escape_attr(light)
        );
    }
    result += &format!("\t<g fill=\"{}\">\n", escape_attr(&opts.dark));
    for y in 0..qr.size() {
        for x in 0..qr.size() {
            if qr.get_module(x, y) {
                result += &format!(
                    "\t\t<rect x=\"{}\" y=\"{}\" width=\"{2}\" height=\"{2}\"/>\n",
                    (x as u32 + margin) * unit,
                    (y as u32 + margin) * unit,
                    unit
                );
            }
        }
    }
    result += "\t</g>\n";
    result += "</svg>\n";
    result
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders the given QR Code as a grayscale raster image.
///
/// Each module covers `unit` x `unit` pixels. Colours in `opts` are not used:
/// dark modules are black and everything else, including the quiet zone, is
/// white.
pub fn to_image_buffer(qr: &QrCode, opts: &RenderOptions) -> ImageBuffer<Luma<u8>, Vec<u8>> {
    let size = opts.canvas_size(qr.size() as u32);
    let unit = opts.unit;
    let module = |p: u32| {
        (p / unit)
            .checked_sub(opts.margin)
            .and_then(|m| i32::try_from(m).ok())
    };
    let mut img = ImageBuffer::new(size, size);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dark = match (module(x), module(y)) {
            (Some(qr_x), Some(qr_y)) => qr.get_module(qr_x, qr_y),
            _ => false,
        };
        *pixel = if dark {
            Luma([0u8]) // Black
        } else {
            Luma([255u8]) // White
        };
    }
    img
}

/// Returns the given QR Code as text, two characters per module, with a quiet
/// zone of `margin` modules.
pub fn to_terminal_string(qr: &QrCode, margin: i32) -> String {
    assert!(margin >= 0, "Margin must be non-negative");
    let mut result = String::new();
    for y in -margin..qr.size() + margin {
        for x in -margin..qr.size() + margin {
            let c: char = if qr.get_module(x, y) { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    result
}

/// Prints the given QrCode object to the console.
pub fn print_qr(qr: &QrCode) {
    println!("{}", to_terminal_string(qr, 4));
}

/// Writes the SVG rendering of `qr` to `path`, creating parent directories
/// as needed.
///
/// # Errors
///
/// Returns [`QrError::OutputWriteFailure`] if the file cannot be written.
pub fn write_svg(qr: &QrCode, opts: &RenderOptions, path: impl AsRef<Path>) -> Result<()> {
    let svg = to_svg_string(qr, opts);
    write_output(path.as_ref(), svg.as_bytes())
}

/// Writes a PNG rendering of `qr` to `path`, creating parent directories as
/// needed.
///
/// # Errors
///
/// Returns [`QrError::OutputWriteFailure`] if encoding or writing fails.
pub fn write_png(qr: &QrCode, opts: &RenderOptions, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let img = to_image_buffer(qr, opts);
    let mut bytes: Vec<u8> = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| QrError::OutputWriteFailure {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
    write_output(path, &bytes)
}

fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    let failure = |source| QrError::OutputWriteFailure {
        path: path.to_path_buf(),
        source,
    };
    // Check if the directory exists, create it if it doesn't
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(failure)?;
        }
    }
    fs::write(path, contents).map_err(failure)?;
    info!(path = %path.display(), bytes = contents.len(), "wrote QR code");
    Ok(())
}

/// Generates a QR Code SVG from the provided content with default options.
///
/// # Example
///
/// ```
/// use minqr::helper::generate_svg_string;
///
/// let svg_string = generate_svg_string("https://example.com").unwrap();
/// assert!(svg_string.ends_with("</svg>\n"));
/// ```
pub fn generate_svg_string(content: &str) -> Result<String> {
    let qr = QrCode::encode_text(content, None)?;
    Ok(to_svg_string(&qr, &RenderOptions::default()))
}

/// Encodes `content` and writes the SVG rendering to `path` with default
/// options.
///
/// # Errors
///
/// Returns [`QrError::CapacityExceeded`] if the content does not fit, or
/// [`QrError::OutputWriteFailure`] if the file cannot be written.
pub fn generate_svg_file(content: &str, path: impl AsRef<Path>) -> Result<()> {
    let qr = QrCode::encode_text(content, None)?;
    write_svg(&qr, &RenderOptions::default(), path)
}
