use crate::timer::{Scheduler, TimerId, TimerKind};
use std::num::NonZeroUsize;
use std::time::Duration;

/// Rotates through the accept images while the accept popup is open.
#[derive(Debug)]
pub struct Carousel {
    index: usize,
    len: NonZeroUsize,
    interval: Duration,
    ticker: Option<TimerId>,
}

impl Carousel {
    pub fn new(len: NonZeroUsize, interval: Duration) -> Self {
        Self {
            index: 0,
            len,
            interval,
            ticker: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reconfigure(&mut self, len: NonZeroUsize, interval: Duration) {
        self.len = len;
        self.interval = interval;
        self.index %= len.get();
    }

    pub fn start(&mut self, scheduler: &mut impl Scheduler) {
        self.stop(scheduler);
        self.index = 0;
        self.ticker =
            Some(scheduler.schedule_repeating(self.interval, TimerKind::CarouselAdvance));
    }

    pub fn owns(&self, id: TimerId) -> bool {
        self.ticker == Some(id)
    }

    pub fn advance(&mut self, id: TimerId) -> bool {
        if !self.owns(id) {
            return false;
        }
        self.index = (self.index + 1) % self.len.get();
        true
    }

    pub fn stop(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(id) = self.ticker.take() {
            scheduler.cancel(id);
        }
    }

    pub fn reset(&mut self, scheduler: &mut impl Scheduler) {
        self.stop(scheduler);
        self.index = 0;
    }
}
