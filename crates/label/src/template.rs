//! EZPL template patching.
//!
//! The label layout lives in a binary EZPL document exported from the label
//! design software. All variable content is represented by literal
//! placeholder byte sequences that are substituted before printing. Every
//! substitution requires its placeholder to be present in the buffer first;
//! a missing placeholder means the template does not match this
//! firmware/product generation, and the run fails with a named error instead
//! of silently printing a wrong label.

use thiserror::Error;

use crate::request::LabelRequest;

/// Darkness control sequence the template must carry for this label stock.
const DARKNESS_MARKER: &[u8] = b"^H13\r";

/// Placeholder for the 13-digit EAN code.
const EAN13_PLACEHOLDER: &[u8] = b"4251640704810";
/// Placeholder for the product description line.
const DESCRIPTION_PLACEHOLDER: &[u8] = b"WARP2 Charger Smart, 11 kW, 5 m";
/// Placeholder for the literal type code.
const TYPE_PLACEHOLDER: &[u8] = b"WARP2-CS-11KW-50";
/// Placeholder for the firmware version.
const VERSION_PLACEHOLDER: &[u8] = b"2.17";
/// Placeholder for the per-instance serial number.
const SERIAL_NUMBER_PLACEHOLDER: &[u8] = b"5000000001";
/// Placeholder for the build date.
const BUILD_DATE_PLACEHOLDER: &[u8] = b"2021-01";

/// The `^C` copies command for `copies` physical copies per label.
fn copies_command(copies: u32) -> Vec<u8> {
    format!("^C{copies}\r").into_bytes()
}

/// The template does not match what the patcher expects.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The darkness control sequence is absent (wrong hardware profile).
    #[error("template is using the wrong darkness setting")]
    WrongDarkness,

    /// An expected placeholder byte sequence is absent.
    #[error("{0} placeholder missing from template")]
    MissingPlaceholder(&'static str),
}

/// An EZPL label template, checked for the expected darkness setting.
///
/// The buffer is read once by the caller and is immutable here; every patch
/// step produces a new buffer.
#[derive(Debug, Clone)]
pub struct Template {
    bytes: Vec<u8>,
}

impl Template {
    /// Wrap raw EZPL bytes, verifying the darkness control sequence.
    pub fn new(bytes: Vec<u8>) -> Result<Self, TemplateError> {
        if find(&bytes, DARKNESS_MARKER).is_none() {
            return Err(TemplateError::WrongDarkness);
        }
        Ok(Self { bytes })
    }

    /// Substitute everything that is constant across instances of a run.
    ///
    /// Steps run in a fixed order, each against the buffer the previous step
    /// produced: EAN13, description, type code, version, build date, copies
    /// command. The serial-number placeholder is checked for presence but
    /// left in place; it is resolved per instance by
    /// [`PatchedLabel::resolve`].
    pub fn patch(&self, request: &LabelRequest) -> Result<PatchedLabel, TemplateError> {
        let product = &request.product;
        let mut buf = self.bytes.clone();

        buf = replace_required(buf, EAN13_PLACEHOLDER, product.ean13(), "EAN13")?;
        buf = replace_required(
            buf,
            DESCRIPTION_PLACEHOLDER,
            product.description().as_bytes(),
            "description",
        )?;
        buf = replace_required(buf, TYPE_PLACEHOLDER, product.literal().as_bytes(), "type")?;
        buf = replace_required(
            buf,
            VERSION_PLACEHOLDER,
            request.version.as_str().as_bytes(),
            "version",
        )?;
        buf = replace_required(
            buf,
            BUILD_DATE_PLACEHOLDER,
            request.build_date.to_string().as_bytes(),
            "build date",
        )?;
        buf = replace_required(
            buf,
            &copies_command(1),
            &copies_command(request.copies),
            "copies command",
        )?;

        if find(&buf, SERIAL_NUMBER_PLACEHOLDER).is_none() {
            return Err(TemplateError::MissingPlaceholder("serial number"));
        }

        Ok(PatchedLabel { bytes: buf })
    }
}

/// A template with everything but the serial number substituted.
///
/// The serial number is the only field that varies across instances within
/// a run.
#[derive(Debug, Clone)]
pub struct PatchedLabel {
    bytes: Vec<u8>,
}

impl PatchedLabel {
    /// Produce one instance document by filling in its serial number.
    pub fn resolve(&self, serial: &str) -> Vec<u8> {
        replace_all(&self.bytes, SERIAL_NUMBER_PLACEHOLDER, serial.as_bytes())
    }
}

// ── Byte-buffer helpers ─────────────────────────────────────────────────────

/// Byte-wise substring search.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Replace every occurrence of `needle` with `replacement`.
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut rest = haystack;
    while let Some(pos) = find(rest, needle) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(replacement);
        rest = &rest[pos + needle.len()..];
    }
    out.extend_from_slice(rest);
    out
}

/// Replace every occurrence of `needle`, failing when it is absent.
fn replace_required(
    buf: Vec<u8>,
    needle: &[u8],
    replacement: &[u8],
    name: &'static str,
) -> Result<Vec<u8>, TemplateError> {
    if find(&buf, needle).is_none() {
        return Err(TemplateError::MissingPlaceholder(name));
    }
    Ok(replace_all(&buf, needle, replacement))
}
