//! Frames and the playlists that order them.

use std::time::Duration;

use crate::PlaylistError;

/// One unit of displayable content plus how long it stays visible.
///
/// A zero duration is allowed: the frame is shown and the next one becomes
/// due on the following tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame<P = String> {
    /// What gets shown to recipients
    pub payload: P,
    /// How long this frame remains visible once shown
    pub duration: Duration,
}

impl<P> Frame<P> {
    /// Create a new frame.
    pub fn new(payload: P, duration: Duration) -> Self {
        Self { payload, duration }
    }

    /// Get the frame payload.
    #[inline]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Get how long the frame stays visible.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Ordered, optionally looping sequence of frames with a pre-roll delay.
///
/// A playlist is plain storage. Once handed to a [`Scheduler`](crate::Scheduler)
/// (usually behind an `Arc`) it is treated as read-only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Playlist<P = String> {
    frames: Vec<Frame<P>>,
    initial_delay: Duration,
    #[cfg_attr(feature = "serde", serde(rename = "loop"))]
    looping: bool,
}

impl<P> Default for Playlist<P> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<P> Playlist<P> {
    /// Create a non-looping playlist with no initial delay.
    pub fn new(frames: Vec<Frame<P>>) -> Self {
        Self {
            frames,
            initial_delay: Duration::ZERO,
            looping: false,
        }
    }

    /// Set the time to wait before the first frame is shown.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Restart from the first frame after the last one instead of stopping.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Get the number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if the playlist has no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get the delay before the first frame.
    #[inline]
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Check if playback restarts after the last frame.
    #[inline]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Get the frame at `index`.
    pub fn frame(&self, index: usize) -> Result<&Frame<P>, PlaylistError> {
        self.frames.get(index).ok_or(PlaylistError::IndexOutOfRange {
            index,
            len: self.frames.len(),
        })
    }

    /// Get all frames in order.
    pub fn frames(&self) -> &[Frame<P>] {
        &self.frames
    }

    /// Sum of all frame durations, excluding the initial delay.
    pub fn total_duration(&self) -> Duration {
        self.frames
            .iter()
            .fold(Duration::ZERO, |acc, f| acc.saturating_add(f.duration))
    }
}

impl<P> FromIterator<Frame<P>> for Playlist<P> {
    fn from_iter<I: IntoIterator<Item = Frame<P>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
