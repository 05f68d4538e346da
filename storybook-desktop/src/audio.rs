use std::path::PathBuf;
use kira::sound::static_sound::StaticSoundData;
use kira::sound::streaming::{StreamingSoundData, StreamingSoundHandle};
use kira::sound::FromFileError;
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Tween};
use storybook_core::assets::FsFetcher;
use storybook_core::audio::AmbientTrack;
use storybook_core::error::PlaybackError;

fn amplitude_to_db(amplitude: f32) -> Decibels {
    if amplitude <= 0.001 {
        Decibels::SILENCE
    } else {
        Decibels(20.0 * amplitude.log10())
    }
}

/// Ambient track and one-shot effects on the default output device.
pub struct KiraTrack {
    manager: AudioManager<DefaultBackend>,
    root: PathBuf,
    source: Option<String>,
    loaded: Option<StreamingSoundData<FromFileError>>,
    handle: Option<StreamingSoundHandle<FromFileError>>,
    volume: f32,
    paused: bool,
}

impl KiraTrack {
    pub fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to initialize audio output: {:?}", e))?;
        Ok(Self {
            manager,
            root: root.into(),
            source: None,
            loaded: None,
            handle: None,
            volume: 1.0,
            paused: true,
        })
    }

    pub fn play_effect(&mut self, url: &str, volume: f32) {
        let path = FsFetcher::resolve(&self.root, url);
        let data = match StaticSoundData::from_file(&path) {
            Ok(data) => data.volume(amplitude_to_db(volume)),
            Err(e) => {
                log::error!("Failed to load sound {:?}: {}", path, e);
                return;
            }
        };
        if let Err(e) = self.manager.play(data) {
            log::error!("Failed to play sound {}: {:?}", url, e);
        }
    }

    fn stop_current(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop(Tween::default());
        }
    }
}

impl AmbientTrack for KiraTrack {
    fn set_source(&mut self, url: Option<&str>) {
        self.stop_current();
        self.loaded = None;
        self.source = url.map(str::to_string);
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn load(&mut self) {
        self.stop_current();
        self.paused = true;
        let Some(url) = &self.source else { return };
        let path = FsFetcher::resolve(&self.root, url);
        match StreamingSoundData::from_file(&path) {
            Ok(data) => self.loaded = Some(data.loop_region(..)),
            Err(e) => log::error!("Failed to open track {:?}: {}", path, e),
        }
    }

    fn can_play_through(&self) -> bool {
        self.loaded.is_some() || self.handle.is_some()
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let volume = amplitude_to_db(self.volume);
        if let Some(handle) = self.handle.as_mut() {
            handle.set_volume(volume, Tween::default());
            handle.resume(Tween::default());
        } else {
            let data = self.loaded.take().ok_or(PlaybackError::NoSource)?;
            let handle = self.manager
                .play(data.volume(volume))
                .map_err(|e| PlaybackError::Backend(format!("{:?}", e)))?;
            self.handle = Some(handle);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            handle.pause(Tween::default());
        }
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        let db = amplitude_to_db(self.volume);
        if let Some(handle) = self.handle.as_mut() {
            handle.set_volume(db, Tween::default());
        }
    }
}
