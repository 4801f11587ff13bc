//! Per-instance serial resolution and batch assembly.

use thiserror::Error;

use crate::template::PatchedLabel;

/// Yields one serial number per label instance.
///
/// Implementations either hand out the same literal every time or fetch a
/// fresh number from the provisioning service per call. The trait keeps
/// assembly testable without touching the network.
pub trait SerialSource {
    /// Produce the serial number for the next instance.
    fn next_serial(&mut self) -> Result<String, SerialSourceError>;
}

/// Failure inside a [`SerialSource`] implementation.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct SerialSourceError(#[from] Box<dyn std::error::Error + Send + Sync>);

impl SerialSourceError {
    /// Wrap an implementation-specific error.
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(err))
    }
}

/// Resolve one serial per instance and concatenate the instance documents
/// in request order.
///
/// The first source failure aborts the whole batch with nothing returned;
/// there is no partial-print state.
pub fn assemble(
    label: &PatchedLabel,
    instances: u32,
    source: &mut dyn SerialSource,
) -> Result<Vec<u8>, SerialSourceError> {
    let mut out = Vec::new();
    for _ in 0..instances {
        let serial = source.next_serial()?;
        out.extend_from_slice(&label.resolve(&serial));
    }
    Ok(out)
}
