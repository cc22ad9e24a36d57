//! Tick-driven frame scheduler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::hook::{apply_transforms, notify};
use crate::{Display, Frame, Hook, HookEvent, Playlist, PlaylistError, TickError};

/// Playback phase of a [`Scheduler`].
///
/// Phases only move forward: `AwaitingStart -> Playing -> Stopped`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting out the playlist's initial delay
    AwaitingStart,
    /// At least one frame has been shown
    Playing,
    /// Terminal. Build a new scheduler to replay.
    Stopped,
}

/// Why a scheduler reached [`Phase::Stopped`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A non-looping playlist ran past its last frame
    Completed,
    /// [`Scheduler::cancel`] or a [`CancelHandle`] was used
    Cancelled,
    /// The playlist had no frames to show
    EmptyPlaylist,
}

/// Thread-safe handle that stops a scheduler from outside the tick stream.
///
/// Obtained from [`Scheduler::cancel_handle`]. Cancelling is idempotent and
/// never displays anything.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Request a stop; the owning scheduler reports `Stopped` right away.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Check whether a stop was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Summary of a single [`Scheduler::on_tick`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    /// Index of the frame shown during this tick, if any
    pub displayed: Option<usize>,
    /// How far the position moved (more than one when catching up)
    pub advanced: usize,
    /// Phase after the tick
    pub phase: Phase,
}

/// Advances through a [`Playlist`] driven by a coarse periodic tick.
///
/// The scheduler does not own a timer. A clock driver calls [`on_tick`]
/// with the nominal period between calls, and the scheduler decides whether
/// a frame is due and how many frames to skip to keep up with real time.
///
/// The wait before showing frame `N` is governed by the duration of frame
/// `N - 1` (the last frame when wrapping), since a frame's duration says how
/// long it stays visible once shown.
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
/// use tickframe::{Frame, Phase, Playlist, Scheduler};
///
/// let ms = Duration::from_millis;
/// let playlist = Playlist::new(vec![
///     Frame::new("Hello".to_string(), ms(100)),
///     Frame::new("World".to_string(), ms(100)),
/// ]);
/// let mut scheduler = Scheduler::new(playlist, vec![1u32]).unwrap();
///
/// let mut shown = Vec::new();
/// let mut display = |text: &String, _: &[u32]| -> Result<(), ()> {
///     shown.push(text.clone());
///     Ok(())
/// };
///
/// while scheduler.phase() != Phase::Stopped {
///     scheduler.on_tick(ms(100), &mut display).unwrap();
/// }
/// assert_eq!(shown, ["Hello", "World"]);
/// ```
///
/// [`on_tick`]: Scheduler::on_tick
#[derive(Debug)]
pub struct Scheduler<P, R> {
    playlist: Arc<Playlist<P>>,
    recipients: Vec<R>,
    /// Next frame to show; may transiently sit at or past the end
    position: usize,
    /// Time since the last advance (or since creation before the first frame)
    accumulated: Duration,
    phase: Phase,
    stop_reason: Option<StopReason>,
    cancel: CancelHandle,
    hooks: Vec<Hook<P>>,
}

impl<P, R> Scheduler<P, R> {
    /// Bind a scheduler to a playlist and a non-empty recipient set.
    ///
    /// An empty playlist is accepted; the first tick stops the scheduler.
    pub fn new(
        playlist: impl Into<Arc<Playlist<P>>>,
        recipients: impl IntoIterator<Item = R>,
    ) -> Result<Self, PlaylistError> {
        let recipients: Vec<R> = recipients.into_iter().collect();
        if recipients.is_empty() {
            return Err(PlaylistError::NoRecipients);
        }
        Ok(Self {
            playlist: playlist.into(),
            recipients,
            position: 0,
            accumulated: Duration::ZERO,
            phase: Phase::AwaitingStart,
            stop_reason: None,
            cancel: CancelHandle::default(),
            hooks: Vec::new(),
        })
    }

    /// Register a hook; hooks run in registration order.
    pub fn with_hook(mut self, hook: Hook<P>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Register a hook on an existing scheduler.
    pub fn add_hook(&mut self, hook: Hook<P>) {
        self.hooks.push(hook);
    }

    /// Current phase. Reports `Stopped` as soon as a cancel is requested.
    pub fn phase(&self) -> Phase {
        if self.cancel.is_cancelled() {
            Phase::Stopped
        } else {
            self.phase
        }
    }

    /// Check if the scheduler reached its terminal phase.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.phase() == Phase::Stopped
    }

    /// Why the scheduler stopped, or `None` while it is still running.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
            .or_else(|| self.cancel.is_cancelled().then_some(StopReason::Cancelled))
    }

    /// Index of the next frame to show.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the time accumulated since the last advance.
    #[inline]
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Get the playlist being played.
    pub fn playlist(&self) -> &Playlist<P> {
        &self.playlist
    }

    /// Get the recipients frames are shown to.
    pub fn recipients(&self) -> &[R] {
        &self.recipients
    }

    /// Stop playback. Idempotent, shows nothing.
    ///
    /// Hooks receive `Stopped(Cancelled)` immediately unless the scheduler
    /// had already stopped.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.apply_pending_cancel();
    }

    /// Deliver a cancel requested through a [`CancelHandle`].
    ///
    /// Moves the scheduler to `Stopped` and notifies hooks if a handle was
    /// used since the last tick. Returns `true` if that happened.
    pub fn apply_pending_cancel(&mut self) -> bool {
        if self.phase == Phase::Stopped || !self.cancel.is_cancelled() {
            return false;
        }
        self.stop(StopReason::Cancelled);
        true
    }

    /// Handle for cancelling from another thread or callback.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn idle(&self) -> TickOutcome {
        TickOutcome {
            displayed: None,
            advanced: 0,
            phase: self.phase(),
        }
    }

    fn stop(&mut self, reason: StopReason) {
        self.phase = Phase::Stopped;
        self.stop_reason = Some(reason);
        debug!(?reason, position = self.position, "scheduler stopped");
        notify(&mut self.hooks, HookEvent::Stopped(reason));
    }
}

/// Scheduler-side lookup; an out-of-range index here is a bookkeeping bug.
fn frame_at<P>(playlist: &Playlist<P>, index: usize) -> Result<&Frame<P>, PlaylistError> {
    let frame = playlist.frame(index);
    debug_assert!(frame.is_ok(), "scheduler looked up frame {} out of range", index);
    frame
}

impl<P: Clone, R> Scheduler<P, R> {
    /// Advance by one tick of `elapsed` nominal time.
    ///
    /// Shows at most one frame per call. A zero `elapsed` never shows or
    /// skips frames, but still stops a finished non-looping playlist.
    /// If the display collaborator fails, the error is returned and position,
    /// accumulated time and phase are left as they were before the call.
    pub fn on_tick<D>(
        &mut self,
        elapsed: Duration,
        display: &mut D,
    ) -> Result<TickOutcome, TickError<D::Error>>
    where
        D: Display<P, R>,
    {
        if self.phase == Phase::Stopped {
            return Ok(self.idle());
        }
        if self.apply_pending_cancel() {
            return Ok(self.idle());
        }
        if self.playlist.is_empty() {
            self.stop(StopReason::EmptyPlaylist);
            return Ok(self.idle());
        }

        match self.phase {
            Phase::AwaitingStart => self.start(elapsed, display),
            Phase::Playing => self.advance(elapsed, display),
            Phase::Stopped => Ok(self.idle()),
        }
    }

    fn start<D>(
        &mut self,
        elapsed: Duration,
        display: &mut D,
    ) -> Result<TickOutcome, TickError<D::Error>>
    where
        D: Display<P, R>,
    {
        if elapsed.is_zero() {
            return Ok(self.idle());
        }
        let accumulated = self.accumulated.saturating_add(elapsed);
        let delay = self.playlist.initial_delay();
        if accumulated <= delay {
            trace!(?accumulated, ?delay, "waiting for initial delay");
            self.accumulated = accumulated;
            return Ok(self.idle());
        }

        let index = if self.position < self.playlist.len() {
            self.position
        } else {
            0
        };
        self.show(index, display)?;

        self.phase = Phase::Playing;
        self.position = index + 1;
        self.accumulated = Duration::ZERO;
        debug!(frames = self.playlist.len(), "playback started");
        self.committed(index, 1)
    }

    fn advance<D>(
        &mut self,
        elapsed: Duration,
        display: &mut D,
    ) -> Result<TickOutcome, TickError<D::Error>>
    where
        D: Display<P, R>,
    {
        let len = self.playlist.len();
        let mut position = self.position;
        if position >= len {
            if !self.playlist.is_looping() {
                self.stop(StopReason::Completed);
                return Ok(self.idle());
            }
            // keep any catch-up overshoot past the end
            position %= len;
            trace!(position, "wrapped to start");
        }

        if elapsed.is_zero() {
            return Ok(self.idle());
        }

        let accumulated = self.accumulated.saturating_add(elapsed);
        let previous = position.checked_sub(1).unwrap_or(len - 1);
        let due = frame_at(&self.playlist, previous)?.duration();
        if accumulated < due {
            trace!(?accumulated, ?due, position, "frame not yet due");
            self.position = position;
            self.accumulated = accumulated;
            return Ok(self.idle());
        }

        let frames = if due.is_zero() {
            1
        } else {
            usize::try_from(accumulated.as_nanos() / due.as_nanos()).unwrap_or(usize::MAX)
        };
        self.show(position, display)?;

        self.position = position.saturating_add(frames);
        self.accumulated = Duration::ZERO;
        if frames > 1 {
            debug!(frames, ?accumulated, ?due, "catching up");
        }
        self.committed(position, frames)
    }

    fn committed<E>(
        &mut self,
        displayed: usize,
        frames: usize,
    ) -> Result<TickOutcome, TickError<E>> {
        notify(
            &mut self.hooks,
            HookEvent::Advanced {
                displayed,
                position: self.position,
                frames,
            },
        );
        Ok(TickOutcome {
            displayed: Some(displayed),
            advanced: frames,
            phase: self.phase(),
        })
    }

    fn show<D>(&mut self, index: usize, display: &mut D) -> Result<(), TickError<D::Error>>
    where
        D: Display<P, R>,
    {
        let frame = frame_at(&self.playlist, index)?;
        notify(&mut self.hooks, HookEvent::BeforeDisplay { index });
        let payload = apply_transforms(&mut self.hooks, index, frame.payload());
        trace!(index, "displaying frame");
        display
            .display(&payload, &self.recipients)
            .map_err(|source| {
                warn!(index, "display failed, scheduler state unchanged");
                TickError::Display { index, source }
            })
    }
}
