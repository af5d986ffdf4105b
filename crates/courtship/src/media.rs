use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("playback rejected: {reason}")]
pub struct PlayRejected {
    reason: String,
}

impl PlayRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A playable unit supplied by the host.
pub trait MediaChannel {
    fn play(&mut self) -> Result<(), PlayRejected>;
    fn pause(&mut self);
    fn seek_to_start(&mut self);
    fn set_volume(&mut self, volume: f64);
    fn set_looping(&mut self, looping: bool);
}

/// In-memory channel that records what was asked of it.
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    label: String,
    playing: bool,
    volume: f64,
    looping: bool,
    rewinds: usize,
    play_attempts: usize,
    reject: Option<String>,
}

impl MemoryChannel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            volume: 1.0,
            ..Self::default()
        }
    }

    /// Every subsequent `play` fails with `reason`, like a blocked autoplay.
    pub fn rejecting(mut self, reason: impl Into<String>) -> Self {
        self.reject = Some(reason.into());
        self
    }

    pub fn allow(&mut self) {
        self.reject = None;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn rewinds(&self) -> usize {
        self.rewinds
    }

    pub fn play_attempts(&self) -> usize {
        self.play_attempts
    }
}

impl MediaChannel for MemoryChannel {
    fn play(&mut self) -> Result<(), PlayRejected> {
        self.play_attempts += 1;
        if let Some(reason) = &self.reject {
            return Err(PlayRejected::new(reason.clone()));
        }
        log::trace!("{}: play", self.label);
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        log::trace!("{}: pause", self.label);
        self.playing = false;
    }

    fn seek_to_start(&mut self) {
        self.rewinds += 1;
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
}
