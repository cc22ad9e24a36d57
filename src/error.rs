//! Error types for playlists and scheduler ticks.

use thiserror::Error;

/// Errors raised by playlist lookups and scheduler construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaylistError {
    /// Frame lookup outside `0..len`.
    ///
    /// The scheduler never asks for such an index; seeing this means its
    /// bookkeeping is broken.
    #[error("frame index {index} out of range for playlist of {len} frames")]
    IndexOutOfRange { index: usize, len: usize },
    /// A scheduler was built without anyone to show frames to.
    #[error("scheduler requires at least one recipient")]
    NoRecipients,
}

/// Error returned from [`Scheduler::on_tick`](crate::Scheduler::on_tick).
///
/// When this is returned the scheduler state is unchanged from before the
/// call, so the same frame can be attempted again.
#[derive(Debug, Error)]
pub enum TickError<E> {
    /// The display collaborator rejected the frame.
    #[error("failed to display frame {index}")]
    Display {
        index: usize,
        #[source]
        source: E,
    },
    /// Internal lookup failure.
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}

impl<E> TickError<E> {
    /// The collaborator's error, if this was a display failure.
    pub fn display_error(&self) -> Option<&E> {
        match self {
            TickError::Display { source, .. } => Some(source),
            TickError::Playlist(_) => None,
        }
    }
}
