use crate::audio::{AudioArbiter, Channels, Volumes};
use crate::carousel::Carousel;
use crate::evasion::{Bounds, EvasionController, Offset, Provocation};
use crate::media::MediaChannel;
use crate::popup::{PopupLifecycle, PopupState};
use crate::presentation::Presentation;
use crate::push::{PushSequence, PushState};
use crate::settings::{Assets, Settings, SettingsError, Tuning};
use crate::stage::{Stage, StageController};
use crate::timer::{ManualScheduler, Scheduler, TimerId};
use rand::rngs::StdRng;
use std::num::NonZeroUsize;
use std::time::Duration;

/// One session of the envelope experience.
///
/// Owns the host scheduler, every controller and the audio arbiter. All
/// operations are safe to call at any time; the ones whose preconditions do not
/// hold are silent no-ops.
pub struct Experience<S, M> {
    scheduler: S,
    stage: StageController,
    evasion: EvasionController,
    push: PushSequence,
    popups: PopupLifecycle,
    carousel: Carousel,
    audio: AudioArbiter<M>,
    assets: Assets,
    staged: Option<Settings>,
}

impl<S: Scheduler, M: MediaChannel> Experience<S, M> {
    pub fn new(
        settings: Settings,
        scheduler: S,
        channels: Channels<M>,
        rng: StdRng,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::assemble(settings, scheduler, channels, rng))
    }

    /// Builds a session on the built-in settings.
    pub fn with_defaults(scheduler: S, channels: Channels<M>, rng: StdRng) -> Self {
        Self::assemble(Settings::default(), scheduler, channels, rng)
    }

    fn assemble(settings: Settings, scheduler: S, channels: Channels<M>, rng: StdRng) -> Self {
        let Settings { tuning, assets } = settings;
        // validated settings always carry at least one image
        let images = assets.image_count().unwrap_or(NonZeroUsize::MIN);

        Self {
            scheduler,
            stage: StageController::new(tuning.reveal_delay()),
            evasion: EvasionController::new(bounds(&tuning), tuning.miss_threshold, rng),
            push: PushSequence::new(tuning.push_interval()),
            popups: PopupLifecycle::new(),
            carousel: Carousel::new(images, tuning.carousel_interval()),
            audio: AudioArbiter::new(channels, Volumes::from(&tuning)),
            assets,
            staged: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage.stage()
    }

    pub fn popup(&self) -> PopupState {
        self.popups.state()
    }

    pub fn push_state(&self) -> PushState {
        self.push.state()
    }

    pub fn misses(&self) -> u32 {
        self.evasion.misses()
    }

    pub fn decline_position(&self) -> Offset {
        self.evasion.position()
    }

    /// Only meaningful while the accept popup is showing.
    pub fn carousel_index(&self) -> Option<usize> {
        (self.popups.state() == PopupState::Accept).then(|| self.carousel.index())
    }

    pub fn audio(&self) -> &AudioArbiter<M> {
        &self.audio
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn presentation(&self) -> Presentation<'_> {
        Presentation::derive(
            self.stage(),
            self.popup(),
            self.push.state(),
            self.evasion.position(),
            self.carousel_index(),
            &self.assets,
        )
    }

    /// First click on the closed envelope. Doubles as the user gesture that
    /// unlocks audio.
    pub fn open(&mut self) {
        if self.stage.stage() != Stage::Closed {
            return;
        }
        self.audio.unlock();
        self.audio.start_background();
        self.stage.open(&mut self.scheduler);
        log::debug!("stage -> {}", self.stage.stage());
    }

    pub fn reset(&mut self) {
        self.stage.reset(&mut self.scheduler);
        self.push.reset(&mut self.scheduler);
        self.carousel.reset(&mut self.scheduler);
        self.evasion.reset();
        self.popups.close();
        self.audio.reset();

        if let Some(settings) = self.staged.take() {
            self.apply(settings);
        }
        log::debug!("experience reset");
    }

    /// Hover-enter or click on the decline control.
    pub fn provoke(&mut self) {
        if !self.stage.is_open() || self.push.is_active() {
            return;
        }
        if self.evasion.provoke() == Provocation::Exhausted {
            log::debug!("decline exhausted after {} misses", self.evasion.threshold());
            if self.popups.open_decline() {
                self.audio.enter_decline();
            }
        }
    }

    /// Click on the accept control.
    pub fn accept(&mut self) {
        if !self.stage.is_open() || self.popups.is_open() {
            return;
        }
        self.push.reset(&mut self.scheduler);
        self.evasion.reset();

        if self.popups.open_accept() {
            self.carousel.start(&mut self.scheduler);
            self.audio.enter_accept();
            log::debug!("popup -> accept");
        }
    }

    /// Explicit dismiss or backdrop click. Leaving the decline popup always
    /// launches the push sequence.
    pub fn close_popup(&mut self) {
        match self.popups.state() {
            PopupState::None => {}
            PopupState::Decline => {
                self.push.start(&mut self.scheduler);
                self.evasion.reset_position();
                self.popups.close();
                self.audio.exit_decline();
                log::debug!("popup decline closed, push sequence started");
            }
            PopupState::Accept => {
                self.carousel.stop(&mut self.scheduler);
                self.popups.close();
                self.audio.exit_accept();
                log::debug!("popup accept closed");
            }
        }
    }

    /// Document hidden or window blurred.
    pub fn suspend(&mut self) {
        self.audio.suspend_all();
    }

    /// Delivers a timer firing from the host. Firings for timers that have
    /// since been cancelled or replaced are dropped.
    pub fn on_timer(&mut self, id: TimerId) {
        if self.stage.reveal(id) {
            log::debug!("stage -> {}", self.stage.stage());
        } else if self.push.tick(&mut self.scheduler, id) {
            log::debug!("push step {}", self.push.state().step);
        } else if self.carousel.advance(id) {
            log::trace!("carousel -> {}", self.carousel.index());
        } else {
            log::debug!("dropping stale {}", id);
        }
    }

    /// Validates `settings` and holds them until the next reset, so a running
    /// sequence never changes pace halfway through. Audio references are only
    /// read by the host when it builds its channels.
    pub fn stage_settings(&mut self, settings: Settings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.staged = Some(settings);
        Ok(())
    }

    fn apply(&mut self, settings: Settings) {
        let Settings { tuning, assets } = settings;
        self.stage.set_reveal_delay(tuning.reveal_delay());
        self.evasion.reconfigure(bounds(&tuning), tuning.miss_threshold);
        self.push.set_interval(tuning.push_interval());
        if let Some(len) = assets.image_count() {
            self.carousel.reconfigure(len, tuning.carousel_interval());
        }
        self.audio.set_volumes(Volumes::from(&tuning));
        self.assets = assets;
    }
}

impl<M: MediaChannel> Experience<ManualScheduler, M> {
    /// Moves the virtual clock forward, delivering every firing due on the way.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.scheduler.now() + by;
        while let Some(id) = self.scheduler.pop_due(deadline) {
            self.on_timer(id);
        }
        self.scheduler.settle(deadline);
    }
}

fn bounds(tuning: &Tuning) -> Bounds {
    Bounds::new(tuning.evasion_max_x, tuning.evasion_max_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Channel;
    use crate::media::MemoryChannel;
    use rand::SeedableRng;

    type Session = Experience<ManualScheduler, MemoryChannel>;

    const REVEAL: Duration = Duration::from_millis(1050);
    const PUSH_TICK: Duration = Duration::from_millis(520);

    fn session() -> Session {
        Experience::new(
            Settings::default(),
            ManualScheduler::new(),
            Channels::new(
                MemoryChannel::new("bg"),
                MemoryChannel::new("no"),
                MemoryChannel::new("yes"),
            ),
            StdRng::seed_from_u64(42),
        )
        .unwrap()
    }

    fn opened() -> Session {
        let mut s = session();
        s.open();
        s.advance(REVEAL);
        assert_eq!(s.stage(), Stage::Open);
        s
    }

    fn playing(s: &Session) -> Vec<Channel> {
        [Channel::Background, Channel::Decline, Channel::Accept]
            .into_iter()
            .filter(|c| s.audio().media(*c).is_playing())
            .collect()
    }

    fn assert_initial(s: &Session) {
        assert_eq!(s.stage(), Stage::Closed);
        assert_eq!(s.popup(), PopupState::None);
        assert_eq!(s.push_state(), PushState::default());
        assert_eq!(s.misses(), 0);
        assert_eq!(s.decline_position(), Offset::default());
        assert_eq!(s.carousel_index(), None);
        assert!(playing(s).is_empty());
        assert_eq!(s.scheduler().pending(), 0);
    }

    #[test]
    fn test_open_reveals_after_delay() {
        let mut s = session();
        s.open();
        assert_eq!(s.stage(), Stage::Opening);
        assert_eq!(playing(&s), vec![Channel::Background]);

        s.advance(REVEAL - Duration::from_millis(1));
        assert_eq!(s.stage(), Stage::Opening);
        s.advance(Duration::from_millis(1));
        assert_eq!(s.stage(), Stage::Open);

        s.open();
        assert_eq!(s.stage(), Stage::Open);
        assert_eq!(s.scheduler().pending(), 0);
    }

    #[test]
    fn test_nothing_reachable_before_open() {
        let mut s = session();
        s.provoke();
        s.accept();
        s.close_popup();
        assert_eq!(s.misses(), 0);
        assert_eq!(s.popup(), PopupState::None);

        s.open();
        s.provoke();
        s.accept();
        assert_eq!(s.misses(), 0);
        assert_eq!(s.popup(), PopupState::None);
    }

    #[test]
    fn test_provoke_counts_and_opens_decline_once() {
        let mut s = opened();
        let bounds = Bounds::new(110.0, 55.0);

        for expected in 1..5 {
            s.provoke();
            assert_eq!(s.misses(), expected);
            assert!(bounds.contains(s.decline_position()));
            assert_eq!(s.popup(), PopupState::None);
        }

        s.provoke();
        assert_eq!(s.misses(), 0);
        assert_eq!(s.popup(), PopupState::Decline);
        assert_eq!(playing(&s), vec![Channel::Decline]);
    }

    #[test]
    fn test_provoke_ignored_during_push() {
        let mut s = opened();
        (0..5).for_each(|_| s.provoke());
        s.close_popup();
        assert!(s.push_state().active);

        s.provoke();
        assert_eq!(s.misses(), 0);
        assert_eq!(s.decline_position(), Offset::default());
    }

    #[test]
    fn test_closing_decline_always_pushes() {
        let mut s = opened();
        (0..5).for_each(|_| s.provoke());

        s.close_popup();
        assert_eq!(s.popup(), PopupState::None);
        assert_eq!(
            s.push_state(),
            PushState {
                active: true,
                step: 0
            }
        );
        assert_eq!(s.decline_position(), Offset::default());
        assert_eq!(playing(&s), vec![Channel::Background]);

        let mut steps = Vec::new();
        for _ in 0..6 {
            s.advance(PUSH_TICK);
            steps.push(s.push_state().step);
        }
        assert_eq!(steps, vec![1, 2, 3, 4, 4, 4]);
        assert!(!s.push_state().active);
    }

    #[test]
    fn test_closing_accept_has_no_push() {
        let mut s = opened();
        s.accept();
        s.close_popup();

        assert_eq!(s.push_state(), PushState::default());
        assert_eq!(s.popup(), PopupState::None);
        assert_eq!(playing(&s), vec![Channel::Background]);
        assert_eq!(s.scheduler().pending(), 0);
    }

    #[test]
    fn test_accept_rejected_while_decline_open() {
        let mut s = opened();
        (0..5).for_each(|_| s.provoke());
        s.accept();

        assert_eq!(s.popup(), PopupState::Decline);
        assert_eq!(playing(&s), vec![Channel::Decline]);
    }

    #[test]
    fn test_threshold_with_accept_open_keeps_accept() {
        let mut s = opened();
        s.accept();
        (0..5).for_each(|_| s.provoke());

        assert_eq!(s.popup(), PopupState::Accept);
        assert_eq!(s.misses(), 0);
        assert_eq!(playing(&s), vec![Channel::Accept]);
    }

    #[test]
    fn test_accept_during_push_clears_it() {
        let mut s = opened();
        (0..5).for_each(|_| s.provoke());
        s.close_popup();
        s.advance(PUSH_TICK * 2);

        s.accept();
        assert_eq!(s.push_state(), PushState::default());
        assert_eq!(s.popup(), PopupState::Accept);
        // only the carousel ticker remains
        assert_eq!(s.scheduler().pending(), 1);
    }

    #[test]
    fn test_carousel_runs_only_while_accept_open() {
        let mut s = opened();
        s.accept();
        assert_eq!(s.carousel_index(), Some(0));

        s.advance(Duration::from_millis(2200));
        assert_eq!(s.carousel_index(), Some(1));
        s.advance(Duration::from_millis(4400));
        assert_eq!(s.carousel_index(), Some(0));

        s.close_popup();
        assert_eq!(s.carousel_index(), None);
        assert_eq!(s.scheduler().pending(), 0);

        s.accept();
        assert_eq!(s.carousel_index(), Some(0));
    }

    #[test]
    fn test_suspend_then_transition_resumes_background() {
        let mut s = opened();
        s.accept();
        s.suspend();
        assert!(playing(&s).is_empty());

        s.advance(Duration::from_secs(10));
        assert!(playing(&s).is_empty());

        s.close_popup();
        assert_eq!(playing(&s), vec![Channel::Background]);
    }

    #[test]
    fn test_stale_firing_is_dropped() {
        let mut s = opened();
        s.accept();
        let carousel_timer = TimerId::from(2);
        assert_eq!(
            s.scheduler().kind_of(carousel_timer),
            Some(crate::timer::TimerKind::CarouselAdvance)
        );
        s.close_popup();

        // a host that already queued the firing delivers it late
        s.on_timer(carousel_timer);
        assert_eq!(s.carousel_index(), None);
        s.accept();
        assert_eq!(s.carousel_index(), Some(0));
    }

    #[test]
    fn test_full_scenario() {
        let mut s = session();
        s.open();
        s.advance(REVEAL);
        assert_eq!(s.stage(), Stage::Open);

        (0..5).for_each(|_| s.provoke());
        assert_eq!(s.popup(), PopupState::Decline);
        assert_eq!(s.misses(), 0);

        s.close_popup();
        s.advance(PUSH_TICK * 4);
        assert_eq!(
            s.push_state(),
            PushState {
                active: false,
                step: 4
            }
        );
        assert_eq!(s.scheduler().pending(), 0);

        s.accept();
        assert_eq!(s.popup(), PopupState::Accept);
        assert_eq!(s.carousel_index(), Some(0));
        assert_eq!(playing(&s), vec![Channel::Accept]);
        assert!(!s.audio().state(Channel::Background).playing);
        assert_eq!(s.audio().media(Channel::Background).rewinds(), 0);
    }

    #[test]
    fn test_reset_mid_push_leaves_nothing_behind() {
        let mut s = opened();
        (0..5).for_each(|_| s.provoke());
        s.close_popup();
        s.advance(PUSH_TICK);

        s.reset();
        assert_initial(&s);
        s.advance(Duration::from_secs(30));
        assert_initial(&s);
    }

    #[test]
    fn test_reset_with_popup_open() {
        for accept in [true, false] {
            let mut s = opened();
            if accept {
                s.accept();
            } else {
                (0..5).for_each(|_| s.provoke());
            }
            assert!(s.popup() != PopupState::None);

            s.reset();
            assert_initial(&s);
            s.advance(Duration::from_secs(30));
            assert_initial(&s);
        }
    }

    #[test]
    fn test_reset_while_opening() {
        let mut s = session();
        s.open();
        s.reset();
        s.advance(REVEAL * 2);
        assert_initial(&s);

        // unlock is a latch: reopening plays without a new gesture
        s.open();
        assert_eq!(playing(&s), vec![Channel::Background]);
    }

    #[test]
    fn test_staged_settings_apply_on_reset() {
        let mut s = opened();
        let mut settings = Settings::default();
        settings.tuning.miss_threshold = 2;
        settings.tuning.reveal_delay_ms = 10;
        s.stage_settings(settings).unwrap();

        (0..2).for_each(|_| s.provoke());
        assert_eq!(s.popup(), PopupState::None);

        s.reset();
        s.open();
        s.advance(Duration::from_millis(10));
        assert_eq!(s.stage(), Stage::Open);
        (0..2).for_each(|_| s.provoke());
        assert_eq!(s.popup(), PopupState::Decline);
    }

    #[test]
    fn test_invalid_staged_settings_rejected() {
        let mut s = session();
        let mut settings = Settings::default();
        settings.assets.images.clear();
        assert_eq!(s.stage_settings(settings), Err(SettingsError::NoImages));
    }

    #[test]
    fn test_unsampleable_bounds_never_reach_provoke() {
        let mut settings = Settings::default();
        settings.tuning.evasion_max_x = f64::MAX;
        let built = Experience::new(
            settings.clone(),
            ManualScheduler::new(),
            Channels::new(
                MemoryChannel::new("bg"),
                MemoryChannel::new("no"),
                MemoryChannel::new("yes"),
            ),
            StdRng::seed_from_u64(1),
        );
        assert!(matches!(built, Err(SettingsError::InvalidBound { .. })));

        let mut s = opened();
        assert!(s.stage_settings(settings).is_err());
        s.reset();
        s.open();
        s.advance(REVEAL);
        s.provoke();
        assert!(Bounds::new(110.0, 55.0).contains(s.decline_position()));
    }

    #[test]
    fn test_with_defaults_matches_default_settings() {
        let mut s: Session = Experience::with_defaults(
            ManualScheduler::new(),
            Channels::new(
                MemoryChannel::new("bg"),
                MemoryChannel::new("no"),
                MemoryChannel::new("yes"),
            ),
            StdRng::seed_from_u64(42),
        );
        assert_initial(&s);
        assert_eq!(s.assets(), &Assets::default());

        s.open();
        s.advance(REVEAL);
        s.accept();
        assert_eq!(s.carousel_index(), Some(0));
        s.advance(Duration::from_millis(2200 * 3));
        assert_eq!(s.carousel_index(), Some(0));
    }
}
