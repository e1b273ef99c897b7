//! # minqr
//!
//! A small Rust library for generating QR codes for short texts such as URLs.
//!
//! `minqr` encodes text or binary data into QR Code Model 2 symbols, limited to
//! the four smallest versions (21x21 to 33x33 modules) at error correction
//! level L. The smallest fitting version is selected automatically, and the
//! mask pattern is chosen by penalty score unless one is given.
//!
//! ## Features
//!
//! - Encode data in numeric, alphanumeric or byte mode, with mixed-mode
//!   segmentation chosen for the shortest bit stream.
//! - Reed–Solomon error correction over GF(256).
//! - Render QR codes as SVG documents, grayscale raster images or terminal text.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! Generate an SVG document:
//!
//! ```rust
//! use minqr::{config::RenderOptions, helper::to_svg_string, qrcode::QrCode};
//!
//! let qr = QrCode::encode_text("https://example.com", None).unwrap();
//! let svg = to_svg_string(&qr, &RenderOptions::default());
//! assert!(svg.starts_with("<?xml"));
//! ```
//!
//! Inspect individual modules:
//!
//! ```rust
//! use minqr::qrcode::QrCode;
//!
//! let qr = QrCode::encode_text("12345", None).unwrap();
//! assert!(qr.get_module(0, 0)); // finder pattern corner
//! assert!(!qr.get_module(-1, 0)); // quiet zone
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Core QR code encoding functionality.
//! - [`helper`]: Utilities for rendering QR codes in various formats.
//! - [`config`]: Rendering options.
//! - [`error`]: Error types.

pub mod config;
pub mod error;
pub mod helper;
pub mod qrcode;

pub use config::RenderOptions;
pub use error::{QrError, Result};
pub use qrcode::{Mask, QrCode, QrCodeEcc, QrSegment, QrSegmentMode, Version};
