use std::time::Duration;

use crate::{Frame, Playlist};

/// Frame duration used when neither the frame nor the animation sets one.
pub const DEFAULT_FRAME_DURATION_MS: u64 = 1000;

/// Tick period used when the animation does not set one (one server tick).
pub const DEFAULT_TICK_PERIOD_MS: u64 = 50;

/// One frame entry in an animation file.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameDetails {
    pub text: String,
    pub duration_ms: Option<u64>,
}

/// Animation description from an `animation.toml` file.
///
/// All fields are optional so partial files still load.
///
/// ```toml
/// initial_delay_ms = 500
/// loop = true
/// tick_period_ms = 50
///
/// [[frames]]
/// text = "Loading."
/// duration_ms = 200
///
/// [[frames]]
/// text = "Loading.."
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationDetails {
    pub initial_delay_ms: Option<u64>,
    #[cfg_attr(feature = "serde", serde(rename = "loop"))]
    pub looping: Option<bool>,
    pub tick_period_ms: Option<u64>,
    pub default_duration_ms: Option<u64>,
    pub frames: Vec<FrameDetails>,
}

impl AnimationDetails {
    /// Parse an `animation.toml` string into `AnimationDetails`.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Nominal period the clock driver should tick at.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms.unwrap_or(DEFAULT_TICK_PERIOD_MS))
    }

    /// Build the playlist described by these details.
    ///
    /// Frames without a duration use `default_duration_ms`, falling back to
    /// [`DEFAULT_FRAME_DURATION_MS`].
    pub fn to_playlist(&self) -> Playlist<String> {
        let fallback = self.default_duration_ms.unwrap_or(DEFAULT_FRAME_DURATION_MS);
        self.frames
            .iter()
            .map(|f| {
                Frame::new(
                    f.text.clone(),
                    Duration::from_millis(f.duration_ms.unwrap_or(fallback)),
                )
            })
            .collect::<Playlist<String>>()
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms.unwrap_or(0)))
            .looping(self.looping.unwrap_or(false))
    }
}
