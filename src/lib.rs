//! # tickframe
//!
//! Tick-driven frame sequencing for chat and action-bar animations.
//!
//! Hosts that only offer a coarse repeating callback (a game server tick, a
//! UI timer) can still play timed animations: each frame carries its own
//! display duration, and the [`Scheduler`] works out on every tick whether
//! the next frame is due and how many frames to skip when a single tick
//! spans several short ones.
//!
//! This crate provides:
//! - [`Frame`] and [`Playlist`] for the animation data
//! - [`Scheduler`], the playback state machine
//! - [`Display`], the collaborator that shows a frame to its recipients
//! - [`Hook`] observers run around each display
//! - [`TickDriver`] to connect everything to a periodic callback
//! - [`AnimationDetails`] for loading animations from TOML
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for data structures
//! - `toml` - Enable `AnimationDetails::from_toml_str`
//!
//! ## Example
//!
//! ```rust,ignore
//! use tickframe::{AnimationDetails, Phase, Scheduler, TickDriver};
//!
//! let details = AnimationDetails::from_toml_str(&source)?;
//! let scheduler = Scheduler::new(details.to_playlist(), online_players)?;
//! let mut driver = TickDriver::new(scheduler, send_action_bar, details.tick_period());
//!
//! // from the host's repeating task
//! if driver.tick()?.phase == Phase::Stopped {
//!     task.cancel();
//! }
//! ```

mod data;
mod details;
mod display;
mod driver;
mod error;
mod hook;
mod scheduler;

pub use data::{Frame, Playlist};
pub use details::{
    AnimationDetails, FrameDetails, DEFAULT_FRAME_DURATION_MS, DEFAULT_TICK_PERIOD_MS,
};
pub use display::Display;
pub use driver::TickDriver;
pub use error::{PlaylistError, TickError};
pub use hook::{Hook, HookEvent};
pub use scheduler::{CancelHandle, Phase, Scheduler, StopReason, TickOutcome};
