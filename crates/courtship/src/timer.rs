use derive_more::{Display, From, Into};
use std::collections::BTreeMap;
use std::time::Duration;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("timer#{_0}")]
pub struct TimerId(u64);

/// What a timer drives. Hosts may use it for logging; the experience
/// dispatches on the [`TimerId`] alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
pub enum TimerKind {
    Reveal,
    PushTick,
    CarouselAdvance,
}

/// The host's timer service.
///
/// Firings are delivered back through `Experience::on_timer`. `cancel` must be
/// safe to call repeatedly and on a one-shot that has already fired.
pub trait Scheduler {
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId;
    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone)]
struct Pending {
    due: Duration,
    every: Option<Duration>,
    kind: TimerKind,
}

/// Virtual-clock scheduler. Nothing fires until the owner pops due timers.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<TimerId, Pending>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn kind_of(&self, id: TimerId) -> Option<TimerKind> {
        self.pending.get(&id).map(|p| p.kind)
    }

    /// Pops the earliest timer due at or before `deadline` and moves the clock
    /// to its due time. Repeating timers are rescheduled one interval later.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<TimerId> {
        let (id, due) = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= deadline)
            .map(|(id, p)| (*id, p.due))
            .min_by_key(|&(id, due)| (due, id))?;

        self.now = self.now.max(due);

        let repeat = self.pending.get(&id).and_then(|p| p.every);
        match repeat {
            Some(every) => {
                if let Some(p) = self.pending.get_mut(&id) {
                    p.due = due + every;
                }
            }
            None => {
                self.pending.remove(&id);
            }
        }
        Some(id)
    }

    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    fn insert(&mut self, due: Duration, every: Option<Duration>, kind: TimerKind) -> TimerId {
        self.next_id += 1;
        let id = TimerId::from(self.next_id);
        self.pending.insert(id, Pending { due, every, kind });
        id
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        self.insert(self.now + delay, None, kind)
    }

    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind) -> TimerId {
        // a zero interval would never let the clock move past `now`
        let interval = interval.max(Duration::from_millis(1));
        self.insert(self.now + interval, Some(interval), kind)
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.remove(&id);
    }
}
