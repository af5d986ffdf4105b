use crate::timer::{Scheduler, TimerId, TimerKind};
use std::time::Duration;

pub const FINAL_STEP: u8 = 4;

const DECLINE_MIN_SCALE: f64 = 0.55;
const DECLINE_SCALE_PER_STEP: f64 = 0.12;
const DECLINE_MAX_SHIFT: f64 = 170.0;
const DECLINE_SHIFT_PER_STEP: f64 = 55.0;
const ACCEPT_MAX_GROWTH: f64 = 0.20;
const ACCEPT_GROWTH_PER_STEP: f64 = 0.06;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushState {
    pub active: bool,
    pub step: u8,
}

impl PushState {
    pub fn decline_scale(&self) -> f64 {
        (1.0 - f64::from(self.step) * DECLINE_SCALE_PER_STEP).max(DECLINE_MIN_SCALE)
    }

    pub fn decline_shift(&self) -> f64 {
        (f64::from(self.step) * DECLINE_SHIFT_PER_STEP).min(DECLINE_MAX_SHIFT)
    }

    pub fn accept_growth(&self) -> f64 {
        1.0 + (f64::from(self.step) * ACCEPT_GROWTH_PER_STEP).min(ACCEPT_MAX_GROWTH)
    }

    /// The accept control bumps into the decline control on intermediate steps.
    pub fn nudging(&self) -> bool {
        self.active && self.step > 0 && self.step < FINAL_STEP
    }

    /// True once a sequence has started and until the next reset.
    pub fn engaged(&self) -> bool {
        self.active || self.step > 0
    }
}

/// Scripted push of the decline control, one step per tick.
#[derive(Debug)]
pub struct PushSequence {
    state: PushState,
    interval: Duration,
    ticker: Option<TimerId>,
}

impl PushSequence {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: PushState::default(),
            interval,
            ticker: None,
        }
    }

    pub fn state(&self) -> PushState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// (Re)starts from step 0. A running ticker is cancelled first.
    pub fn start(&mut self, scheduler: &mut impl Scheduler) {
        self.cancel(scheduler);
        self.state = PushState {
            active: true,
            step: 0,
        };
        self.ticker = Some(scheduler.schedule_repeating(self.interval, TimerKind::PushTick));
    }

    pub fn owns(&self, id: TimerId) -> bool {
        self.ticker == Some(id)
    }

    /// Advances one step. Returns false for a tick this sequence did not arm.
    pub fn tick(&mut self, scheduler: &mut impl Scheduler, id: TimerId) -> bool {
        if !self.owns(id) {
            return false;
        }
        self.state.step = (self.state.step + 1).min(FINAL_STEP);
        if self.state.step >= FINAL_STEP {
            self.cancel(scheduler);
        }
        true
    }

    /// Stops the ticker; the step stays where it is.
    pub fn cancel(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(id) = self.ticker.take() {
            scheduler.cancel(id);
        }
        self.state.active = false;
    }

    pub fn reset(&mut self, scheduler: &mut impl Scheduler) {
        self.cancel(scheduler);
        self.state = PushState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualScheduler;

    const TICK: Duration = Duration::from_millis(520);

    fn drive(push: &mut PushSequence, sched: &mut ManualScheduler, until: Duration) -> Vec<u8> {
        let mut steps = Vec::new();
        while let Some(id) = sched.pop_due(until) {
            if push.tick(sched, id) {
                steps.push(push.state().step);
            }
        }
        sched.settle(until);
        steps
    }

    #[test]
    fn test_four_ticks_then_stop() {
        let mut sched = ManualScheduler::new();
        let mut push = PushSequence::new(TICK);
        push.start(&mut sched);

        let steps = drive(&mut push, &mut sched, TICK * 10);
        assert_eq!(steps, vec![1, 2, 3, 4]);
        assert_eq!(
            push.state(),
            PushState {
                active: false,
                step: 4
            }
        );
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_restart_mid_sequence_drops_old_ticker() {
        let mut sched = ManualScheduler::new();
        let mut push = PushSequence::new(TICK);
        push.start(&mut sched);
        assert_eq!(drive(&mut push, &mut sched, TICK * 2), vec![1, 2]);

        push.start(&mut sched);
        assert_eq!(push.state().step, 0);
        assert_eq!(sched.pending(), 1);

        // the new ticker is phased from the restart, not from the old one
        let restart = sched.now();
        assert_eq!(drive(&mut push, &mut sched, restart + TICK / 2), Vec::<u8>::new());
        assert_eq!(drive(&mut push, &mut sched, restart + TICK * 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_cancel_keeps_step() {
        let mut sched = ManualScheduler::new();
        let mut push = PushSequence::new(TICK);
        push.start(&mut sched);
        drive(&mut push, &mut sched, TICK);

        push.cancel(&mut sched);
        assert_eq!(
            push.state(),
            PushState {
                active: false,
                step: 1
            }
        );
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_derived_presentation_values() {
        let at = |step, active| PushState { active, step };

        assert_eq!(at(0, false).decline_scale(), 1.0);
        assert!((at(2, true).decline_scale() - 0.76).abs() < 1e-9);
        assert!((at(4, false).decline_scale() - 0.55).abs() < 1e-9);

        assert_eq!(at(1, true).decline_shift(), 55.0);
        assert_eq!(at(3, true).decline_shift(), 165.0);
        assert_eq!(at(4, false).decline_shift(), 170.0);

        assert!((at(3, true).accept_growth() - 1.18).abs() < 1e-9);
        assert!((at(4, false).accept_growth() - 1.20).abs() < 1e-9);

        assert!(!at(0, true).nudging());
        assert!(at(2, true).nudging());
        assert!(!at(4, true).nudging());
        assert!(!at(2, false).nudging());

        assert!(!PushState::default().engaged());
        assert!(at(4, false).engaged());
    }
}
