use crate::timer::{Scheduler, TimerId, TimerKind};
use std::time::Duration;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    #[default]
    Closed,
    Opening,
    Open,
}

#[derive(Debug)]
pub struct StageController {
    stage: Stage,
    reveal_delay: Duration,
    reveal: Option<TimerId>,
}

impl StageController {
    pub fn new(reveal_delay: Duration) -> Self {
        Self {
            stage: Stage::Closed,
            reveal_delay,
            reveal: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_open(&self) -> bool {
        self.stage == Stage::Open
    }

    pub fn set_reveal_delay(&mut self, delay: Duration) {
        self.reveal_delay = delay;
    }

    /// Closed -> Opening, with the reveal timer armed. Returns false (and does
    /// nothing) from any other stage.
    pub fn open(&mut self, scheduler: &mut impl Scheduler) -> bool {
        if self.stage != Stage::Closed {
            return false;
        }
        self.stage = Stage::Opening;
        self.reveal = Some(scheduler.schedule_once(self.reveal_delay, TimerKind::Reveal));
        true
    }

    pub fn owns(&self, id: TimerId) -> bool {
        self.reveal == Some(id)
    }

    /// Handles the reveal timer. Returns false for any id this controller did
    /// not arm.
    pub fn reveal(&mut self, id: TimerId) -> bool {
        if !self.owns(id) {
            return false;
        }
        self.reveal = None;
        self.stage = Stage::Open;
        true
    }

    pub fn reset(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(id) = self.reveal.take() {
            scheduler.cancel(id);
        }
        self.stage = Stage::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualScheduler;

    #[test]
    fn test_open_only_from_closed() {
        let mut sched = ManualScheduler::new();
        let mut stage = StageController::new(Duration::from_millis(1050));

        assert!(stage.open(&mut sched));
        assert_eq!(stage.stage(), Stage::Opening);
        assert!(!stage.open(&mut sched));
        assert_eq!(sched.pending(), 1);

        let id = sched.pop_due(Duration::from_millis(1050)).unwrap();
        assert!(stage.reveal(id));
        assert!(stage.is_open());
        assert!(!stage.open(&mut sched));
    }

    #[test]
    fn test_reset_cancels_reveal() {
        let mut sched = ManualScheduler::new();
        let mut stage = StageController::new(Duration::from_millis(1050));
        stage.open(&mut sched);

        stage.reset(&mut sched);
        assert_eq!(stage.stage(), Stage::Closed);
        assert_eq!(sched.pending(), 0);
    }
}
