//! PDF backend for setlist export.
//!
//! Draws with the base-14 fonts so no font files need to ship with the
//! binary; measurement uses the matching built-in metrics.

pub mod surface;

pub use surface::PdfSurface;
