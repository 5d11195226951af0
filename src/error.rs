use std::{io, path::PathBuf};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to derive a device identifier from the host's network hardware.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("no network interface with a hardware address was found")]
    NoInterface,
    #[error("interface {0} has no usable hardware address")]
    NoAddress(String),
    #[error("unable to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The display manager could not be reached at all.
///
/// Individual commands that the manager rejects are not errors; they are
/// reported through `CommandOutcome`.
#[derive(Debug, Error)]
pub enum IpcError {
    #[error("unable to connect to sway ipc interface, make sure sway is running and SWAYSOCK is set")]
    Connect(#[source] BoxError),
    #[error("sway ipc transport failed")]
    Transport(#[source] BoxError),
}

#[derive(Debug, Error)]
pub enum TickError {
    #[error("applying display configuration failed")]
    Apply(#[from] IpcError),
}
