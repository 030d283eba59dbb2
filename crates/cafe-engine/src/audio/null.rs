use std::collections::HashMap;

use anyhow::{bail, ensure, Result};

use super::{
    clamp_volume, AudioCapabilities, AudioSystem, ChannelHandle, PlayOptions, SoundHandle,
};

#[derive(Debug, Clone)]
struct Channel {
    sound: SoundHandle,
    options: PlayOptions,
}

#[derive(Debug, Clone)]
struct Music {
    path: String,
    looping: bool,
    paused: bool,
}

/// Audio backend that produces no sound.
///
/// Tracks every piece of state a real backend would, so game logic behaves the
/// same on machines without an audio device. One-shot channels finish at the
/// next [`update`](AudioSystem::update); looping ones play until stopped.
#[derive(Debug)]
pub struct NullAudio {
    initialized: bool,

    sounds: HashMap<SoundHandle, String>,
    next_sound: u32,

    channels: HashMap<ChannelHandle, Channel>,
    next_channel: u32,

    music: Option<Music>,
    music_volume: f32,
    master_volume: f32,
    sound_volume: f32,
    muted: bool,
}

impl Default for NullAudio {
    fn default() -> Self {
        Self {
            initialized: false,
            sounds: HashMap::new(),
            next_sound: 1,
            channels: HashMap::new(),
            next_channel: 1,
            music: None,
            music_volume: 1.0,
            master_volume: 1.0,
            sound_volume: 1.0,
            muted: false,
        }
    }
}

impl NullAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channels currently playing.
    pub fn active_channels(&self) -> usize {
        self.channels.len()
    }

    /// Path of the current music track, if any.
    pub fn music_path(&self) -> Option<&str> {
        self.music.as_ref().map(|m| m.path.as_str())
    }

    /// Volume a channel would be mixed at, after sound, master and mute.
    pub fn effective_volume(&self, channel: ChannelHandle) -> Option<f32> {
        let ch = self.channels.get(&channel)?;
        if self.muted {
            return Some(0.0);
        }
        Some(ch.options.volume * self.sound_volume * self.master_volume)
    }

    fn allocate_sound(&mut self) -> Result<SoundHandle> {
        let Some(handle) = SoundHandle::from_raw(self.next_sound) else {
            bail!("sound handles exhausted");
        };
        self.next_sound = self.next_sound.wrapping_add(1);
        Ok(handle)
    }

    fn allocate_channel(&mut self) -> Option<ChannelHandle> {
        let handle = ChannelHandle::from_raw(self.next_channel)?;
        self.next_channel = self.next_channel.wrapping_add(1);
        Some(handle)
    }
}

impl AudioSystem for NullAudio {
    fn backend_name(&self) -> &'static str {
        "null"
    }

    fn capabilities(&self) -> AudioCapabilities {
        AudioCapabilities {
            produces_sound: false,
            channel_stop: true,
            channel_volume: true,
            music_streaming: false,
        }
    }

    fn initialize(&mut self) -> Result<()> {
        if !self.initialized {
            self.initialized = true;
            log::info!("audio: null backend initialized (no output device)");
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        self.channels.clear();
        self.sounds.clear();
        self.music = None;
        self.initialized = false;
        log::debug!("audio: null backend shut down");
    }

    fn load_sound(&mut self, path: &str) -> Result<SoundHandle> {
        ensure!(self.initialized, "audio system is not initialized");
        ensure!(!path.trim().is_empty(), "sound path is empty");

        let handle = self.allocate_sound()?;
        self.sounds.insert(handle, path.to_string());
        log::debug!("audio: loaded {path} as sound {handle}");
        Ok(handle)
    }

    fn unload_sound(&mut self, sound: SoundHandle) {
        if self.sounds.remove(&sound).is_some() {
            self.channels.retain(|_, ch| ch.sound != sound);
        }
    }

    fn is_sound_loaded(&self, sound: SoundHandle) -> bool {
        self.sounds.contains_key(&sound)
    }

    fn play_sound(&mut self, sound: SoundHandle, options: PlayOptions) -> Option<ChannelHandle> {
        if !self.initialized || !self.is_sound_loaded(sound) {
            log::warn!("audio: play_sound({sound}) ignored; sound not loaded");
            return None;
        }

        let channel = self.allocate_channel()?;
        self.channels.insert(
            channel,
            Channel {
                sound,
                options: options.sanitized(),
            },
        );
        Some(channel)
    }

    fn play_music(&mut self, path: &str, looping: bool) -> Result<()> {
        ensure!(self.initialized, "audio system is not initialized");
        ensure!(!path.trim().is_empty(), "music path is empty");

        self.music = Some(Music {
            path: path.to_string(),
            looping,
            paused: false,
        });
        Ok(())
    }

    fn stop_music(&mut self) {
        self.music = None;
    }

    fn pause_music(&mut self) {
        if let Some(music) = self.music.as_mut() {
            music.paused = true;
        }
    }

    fn resume_music(&mut self) {
        if let Some(music) = self.music.as_mut() {
            music.paused = false;
        }
    }

    fn is_music_playing(&self) -> bool {
        self.music.as_ref().is_some_and(|m| !m.paused)
    }

    fn is_music_paused(&self) -> bool {
        self.music.as_ref().is_some_and(|m| m.paused)
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = clamp_volume(volume);
    }

    fn music_volume(&self) -> f32 {
        self.music_volume
    }

    fn stop_channel(&mut self, channel: ChannelHandle) {
        self.channels.remove(&channel);
    }

    fn stop_all_sounds(&mut self) {
        self.channels.clear();
    }

    fn is_channel_playing(&self, channel: ChannelHandle) -> bool {
        self.channels.contains_key(&channel)
    }

    fn set_channel_volume(&mut self, channel: ChannelHandle, volume: f32) {
        if let Some(ch) = self.channels.get_mut(&channel) {
            ch.options.volume = clamp_volume(volume);
        }
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = clamp_volume(volume);
    }

    fn master_volume(&self) -> f32 {
        self.master_volume
    }

    fn set_sound_volume(&mut self, volume: f32) {
        self.sound_volume = clamp_volume(volume);
    }

    fn sound_volume(&self) -> f32 {
        self.sound_volume
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn update(&mut self) {
        self.channels.retain(|_, ch| ch.options.looping);

        // Nothing is streamed, so a one-shot track ends immediately.
        if self.music.as_ref().is_some_and(|m| !m.looping && !m.paused) {
            self.music = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> NullAudio {
        let mut audio = NullAudio::new();
        audio.initialize().unwrap();
        audio
    }

    #[test]
    fn sounds_need_an_initialized_system_and_a_path() {
        let mut audio = NullAudio::new();
        assert!(audio.load_sound("jump.wav").is_err());

        audio.initialize().unwrap();
        assert!(audio.load_sound("").is_err());

        let jump = audio.load_sound("jump.wav").unwrap();
        let coin = audio.load_sound("coin.wav").unwrap();
        assert_ne!(jump, coin);
        assert!(audio.is_sound_loaded(jump));

        audio.unload_sound(jump);
        assert!(!audio.is_sound_loaded(jump));
        assert!(audio.play_sound(jump, PlayOptions::default()).is_none());
    }

    #[test]
    fn one_shots_retire_on_update_loops_persist() {
        let mut audio = ready();
        let sfx = audio.load_sound("hit.wav").unwrap();

        let once = audio.play_sound(sfx, PlayOptions::default()).unwrap();
        let looped = audio
            .play_sound(sfx, PlayOptions::default().looping(true))
            .unwrap();
        assert_eq!(audio.active_channels(), 2);

        audio.update();
        assert!(!audio.is_channel_playing(once));
        assert!(audio.is_channel_playing(looped));

        audio.stop_channel(looped);
        assert_eq!(audio.active_channels(), 0);
    }

    #[test]
    fn volumes_clamp_and_mute_silences() {
        let mut audio = ready();
        let sfx = audio.load_sound("hit.wav").unwrap();
        let ch = audio
            .play_sound(sfx, PlayOptions::default().volume(0.5).looping(true))
            .unwrap();

        audio.set_master_volume(2.0);
        audio.set_sound_volume(-1.0);
        assert_eq!(audio.master_volume(), 1.0);
        assert_eq!(audio.sound_volume(), 0.0);

        audio.set_sound_volume(0.5);
        assert_eq!(audio.effective_volume(ch), Some(0.25));

        audio.set_muted(true);
        assert_eq!(audio.effective_volume(ch), Some(0.0));
    }

    #[test]
    fn music_state_machine() {
        let mut audio = ready();
        assert!(audio.play_music(" ", true).is_err());

        audio.play_music("theme.ogg", true).unwrap();
        assert!(audio.is_music_playing());

        audio.pause_music();
        assert!(audio.is_music_paused());
        assert!(!audio.is_music_playing());

        audio.resume_music();
        audio.update();
        assert!(audio.is_music_playing(), "looping music survives update");

        audio.stop_music();
        assert!(!audio.is_music_playing());
        assert_eq!(audio.music_path(), None);
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut audio = ready();
        let sfx = audio.load_sound("hit.wav").unwrap();
        audio.play_sound(sfx, PlayOptions::default().looping(true));

        audio.shutdown();
        audio.shutdown();
        assert!(!audio.is_sound_loaded(sfx));
        assert_eq!(audio.active_channels(), 0);
    }
}
