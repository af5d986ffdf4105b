use courtship::{Scheduler, TimerId, TimerKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

type Sources = Rc<RefCell<HashMap<TimerId, glib::SourceId>>>;

/// Timer service on the GTK main loop. Firings are handed to `sink`, which
/// queues them back into the component.
pub struct GlibScheduler {
    next_id: u64,
    sources: Sources,
    sink: Rc<dyn Fn(TimerId)>,
}

impl GlibScheduler {
    pub fn new(sink: impl Fn(TimerId) + 'static) -> Self {
        Self {
            next_id: 0,
            sources: Rc::default(),
            sink: Rc::new(sink),
        }
    }

    fn allocate(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId::from(self.next_id)
    }
}

impl Scheduler for GlibScheduler {
    fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        let id = self.allocate();
        let sources = self.sources.clone();
        let sink = self.sink.clone();

        let source = glib::timeout_add_local_once(delay, move || {
            // glib drops the source itself once it has run
            sources.borrow_mut().remove(&id);
            sink(id);
        });
        self.sources.borrow_mut().insert(id, source);
        log::trace!("scheduled {} {} in {:?}", kind, id, delay);
        id
    }

    fn schedule_repeating(&mut self, interval: Duration, kind: TimerKind) -> TimerId {
        let id = self.allocate();
        let sink = self.sink.clone();

        let source = glib::timeout_add_local(interval, move || {
            sink(id);
            glib::ControlFlow::Continue
        });
        self.sources.borrow_mut().insert(id, source);
        log::trace!("scheduled {} {} every {:?}", kind, id, interval);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        let source = self.sources.borrow_mut().remove(&id);
        if let Some(source) = source {
            source.remove();
        }
    }
}

impl Drop for GlibScheduler {
    fn drop(&mut self) {
        let sources: Vec<_> = self.sources.borrow_mut().drain().map(|(_, s)| s).collect();
        sources.into_iter().for_each(glib::SourceId::remove);
    }
}
