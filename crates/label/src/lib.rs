//! WARP2 Charger package-label core.
//!
//! Validates label requests, derives the printed product data (description,
//! current rating, EAN13 code) from type codes, and patches the binary EZPL
//! label template. The main entry points are [`LabelRequest::validate`],
//! [`Template::patch`], and [`assemble`].
//!
//! This crate is pure: no file, network, or printer I/O happens here.
//! Integrity failures therefore always precede any side effect.

pub mod batch;
pub mod product;
pub mod request;
pub mod template;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

pub use batch::{SerialSource, SerialSourceError, assemble};
pub use product::{CableLength, ModelTier, PowerRating, ProductCode};
pub use request::{
    BuildDate, LabelRequest, RangeError, RequestError, RequestFields, SerialAssignment,
    ValidationError, Version,
};
pub use template::{PatchedLabel, Template, TemplateError};
