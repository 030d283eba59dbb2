//! Audio collaborator.
//!
//! Game code reaches audio only from its own callbacks; the loop holds no
//! audio handle. Backends may support a subset of the operations: unsupported
//! channel controls are silent no-ops, reported through [`AudioCapabilities`].

mod null;

use std::fmt;
use std::num::NonZeroU32;

use anyhow::Result;

pub use null::NullAudio;

/// Loaded sound. Zero is never a valid handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SoundHandle(NonZeroU32);

/// Playing sound instance. Zero is never a valid handle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ChannelHandle(NonZeroU32);

macro_rules! handle_impls {
    ($name:ident) => {
        impl $name {
            /// `None` for the reserved zero id.
            pub fn from_raw(raw: u32) -> Option<Self> {
                NonZeroU32::new(raw).map(Self)
            }

            pub fn raw(self) -> u32 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

handle_impls!(SoundHandle);
handle_impls!(ChannelHandle);

/// Per-play parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlayOptions {
    /// `0.0..=1.0`.
    pub volume: f32,

    /// Playback rate; 1.0 is normal speed.
    pub pitch: f32,

    /// `-1.0` left to `1.0` right.
    pub pan: f32,

    pub looping: bool,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            pitch: 1.0,
            pan: 0.0,
            looping: false,
        }
    }
}

impl PlayOptions {
    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Volume, pitch and pan forced into their valid ranges.
    pub fn sanitized(self) -> Self {
        Self {
            volume: clamp_volume(self.volume),
            pitch: if self.pitch.is_finite() && self.pitch > 0.0 { self.pitch } else { 1.0 },
            pan: if self.pan.is_finite() { self.pan.clamp(-1.0, 1.0) } else { 0.0 },
            looping: self.looping,
        }
    }
}

/// What a backend actually implements.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct AudioCapabilities {
    pub produces_sound: bool,
    pub channel_stop: bool,
    pub channel_volume: bool,
    pub music_streaming: bool,
}

/// Sound effects, one music stream and global mixing controls.
pub trait AudioSystem {
    fn backend_name(&self) -> &'static str;

    fn capabilities(&self) -> AudioCapabilities;

    fn initialize(&mut self) -> Result<()>;

    /// Stops everything and releases loaded sounds. Safe to call twice.
    fn shutdown(&mut self);

    fn load_sound(&mut self, path: &str) -> Result<SoundHandle>;

    /// Also stops channels playing this sound.
    fn unload_sound(&mut self, sound: SoundHandle);

    fn is_sound_loaded(&self, sound: SoundHandle) -> bool;

    /// `None` when the sound is not loaded or no channel is available.
    fn play_sound(&mut self, sound: SoundHandle, options: PlayOptions) -> Option<ChannelHandle>;

    /// Replaces any current music.
    fn play_music(&mut self, path: &str, looping: bool) -> Result<()>;
    fn stop_music(&mut self);
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    fn is_music_playing(&self) -> bool;
    fn is_music_paused(&self) -> bool;
    fn set_music_volume(&mut self, volume: f32);
    fn music_volume(&self) -> f32;

    fn stop_channel(&mut self, channel: ChannelHandle);
    fn stop_all_sounds(&mut self);
    fn is_channel_playing(&self, channel: ChannelHandle) -> bool;
    fn set_channel_volume(&mut self, channel: ChannelHandle, volume: f32);

    fn set_master_volume(&mut self, volume: f32);
    fn master_volume(&self) -> f32;
    fn set_sound_volume(&mut self, volume: f32);
    fn sound_volume(&self) -> f32;
    fn set_muted(&mut self, muted: bool);
    fn is_muted(&self) -> bool;

    /// Once per frame: retires finished channels.
    fn update(&mut self);
}

/// Clamps to `[0, 1]`; NaN becomes silence.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_handle() {
        assert!(SoundHandle::from_raw(0).is_none());
        assert_eq!(ChannelHandle::from_raw(7).map(ChannelHandle::raw), Some(7));
    }

    #[test]
    fn options_are_sanitized() {
        let o = PlayOptions {
            volume: 3.0,
            pitch: -1.0,
            pan: f32::NAN,
            looping: true,
        }
        .sanitized();

        assert_eq!(o.volume, 1.0);
        assert_eq!(o.pitch, 1.0);
        assert_eq!(o.pan, 0.0);
        assert!(o.looping);
        assert_eq!(clamp_volume(f32::NAN), 0.0);
    }
}
