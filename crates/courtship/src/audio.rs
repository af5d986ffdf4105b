use crate::media::MediaChannel;
use crate::settings::Tuning;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Channel {
    Background,
    Decline,
    Accept,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelState {
    pub playing: bool,
    pub volume: f64,
    pub looped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volumes {
    pub background: f64,
    pub decline: f64,
    pub accept: f64,
}

impl From<&Tuning> for Volumes {
    fn from(tuning: &Tuning) -> Self {
        Self {
            background: tuning.background_volume,
            decline: tuning.decline_volume,
            accept: tuning.accept_volume,
        }
    }
}

/// The three media handles, one per [`Channel`].
#[derive(Debug, Clone)]
pub struct Channels<M> {
    pub background: M,
    pub decline: M,
    pub accept: M,
}

impl<M> Channels<M> {
    pub fn new(background: M, decline: M, accept: M) -> Self {
        Self {
            background,
            decline,
            accept,
        }
    }
}

#[derive(Debug)]
struct Track<M> {
    channel: Channel,
    media: M,
    state: ChannelState,
}

impl<M: MediaChannel> Track<M> {
    fn new(channel: Channel, media: M) -> Self {
        Self {
            channel,
            media,
            state: ChannelState::default(),
        }
    }

    fn play(&mut self, volume: f64) {
        self.media.set_looping(true);
        self.media.set_volume(volume);
        match self.media.play() {
            Ok(()) => {
                self.state = ChannelState {
                    playing: true,
                    volume,
                    looped: true,
                };
            }
            // blocked until the next qualifying transition retries
            Err(e) => log::debug!("{} channel: {}", self.channel, e),
        }
    }

    fn pause(&mut self) {
        self.media.pause();
        self.state.playing = false;
    }

    fn stop(&mut self) {
        self.pause();
        self.media.seek_to_start();
    }
}

/// Keeps at most one of the three channels audible.
///
/// The arbiter remembers which popup audio is active so that leaving one popup
/// only brings the background back when the other is not showing. Playback is
/// refused until [`AudioArbiter::unlock`] has been called from a user gesture.
#[derive(Debug)]
pub struct AudioArbiter<M> {
    background: Track<M>,
    decline: Track<M>,
    accept: Track<M>,
    volumes: Volumes,
    unlocked: bool,
    decline_active: bool,
    accept_active: bool,
}

impl<M: MediaChannel> AudioArbiter<M> {
    pub fn new(channels: Channels<M>, volumes: Volumes) -> Self {
        Self {
            background: Track::new(Channel::Background, channels.background),
            decline: Track::new(Channel::Decline, channels.decline),
            accept: Track::new(Channel::Accept, channels.accept),
            volumes,
            unlocked: false,
            decline_active: false,
            accept_active: false,
        }
    }

    pub fn unlock(&mut self) {
        self.unlocked = true;
    }

    pub fn set_volumes(&mut self, volumes: Volumes) {
        self.volumes = volumes;
    }

    pub fn state(&self, channel: Channel) -> ChannelState {
        self.track(channel).state
    }

    pub fn media(&self, channel: Channel) -> &M {
        &self.track(channel).media
    }

    pub fn playing(&self) -> Option<Channel> {
        [Channel::Background, Channel::Decline, Channel::Accept]
            .into_iter()
            .find(|c| self.track(*c).state.playing)
    }

    fn track(&self, channel: Channel) -> &Track<M> {
        match channel {
            Channel::Background => &self.background,
            Channel::Decline => &self.decline,
            Channel::Accept => &self.accept,
        }
    }

    pub fn start_background(&mut self) {
        if !self.unlocked || self.accept_active || self.decline_active {
            return;
        }
        self.background.play(self.volumes.background);
    }

    pub fn enter_decline(&mut self) {
        self.decline_active = true;
        self.background.pause();
        self.accept.stop();
        if self.unlocked {
            self.decline.play(self.volumes.decline);
        }
    }

    pub fn enter_accept(&mut self) {
        self.accept_active = true;
        self.background.pause();
        self.decline.stop();
        if self.unlocked {
            self.accept.play(self.volumes.accept);
        }
    }

    pub fn exit_decline(&mut self) {
        self.decline_active = false;
        self.decline.stop();
        self.start_background();
    }

    pub fn exit_accept(&mut self) {
        self.accept_active = false;
        self.accept.stop();
        self.start_background();
    }

    /// Silences everything (tab hidden, window blurred). Nothing resumes until
    /// the next popup transition or reopen.
    pub fn suspend_all(&mut self) {
        self.background.stop();
        self.decline.stop();
        self.accept.stop();
    }

    pub fn reset(&mut self) {
        self.suspend_all();
        self.decline_active = false;
        self.accept_active = false;
    }
}
