//! Session → task list coupling.
//!
//! When a break finishes, every checked task in `active` moves to the end of
//! `completed`. The sweep happens inside the same dispatch that emitted
//! `BreakPhaseComplete`, so observers of the engine see both changes
//! before the call returns.

use std::cell::RefCell;
use std::rc::Rc;

use crate::clock::Clock;
use crate::events::{Event, ListenerId};
use crate::task::TaskListStore;
use crate::timer::SessionEngine;

pub struct SessionTaskBridge;

impl SessionTaskBridge {
    /// Subscribe the sweep to `engine`. Detach with
    /// [`SessionEngine::unsubscribe`] and the returned id.
    pub fn connect<C: Clock>(
        engine: &mut SessionEngine<C>,
        tasks: Rc<RefCell<TaskListStore>>,
    ) -> ListenerId {
        engine.subscribe(move |event| {
            if !matches!(event, Event::BreakPhaseComplete { .. }) {
                return;
            }
            let moved = tasks.borrow_mut().sweep_active_completed();
            if moved > 0 {
                tracing::info!(moved, "checked tasks moved to completed");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::task::ListName;
    use crate::timer::SessionConfig;

    fn setup() -> (SessionEngine<Rc<ManualClock>>, Rc<RefCell<TaskListStore>>) {
        let config = SessionConfig::new(10, 5, 3, true).unwrap();
        let engine = SessionEngine::new(config, Rc::new(ManualClock::at_epoch()));
        (engine, Rc::new(RefCell::new(TaskListStore::new())))
    }

    #[test]
    fn break_completion_sweeps_checked_tasks() {
        let (mut engine, tasks) = setup();
        SessionTaskBridge::connect(&mut engine, Rc::clone(&tasks));
        let (a, b) = {
            let mut store = tasks.borrow_mut();
            let a = store.add(ListName::Active, "write").unwrap();
            let b = store.add(ListName::Active, "review").unwrap();
            store.toggle(ListName::Active, a);
            (a, b)
        };

        engine.toggle_run();
        engine.clock().advance_secs(11);
        engine.tick();
        assert_eq!(tasks.borrow().locate(a), Some((ListName::Active, 0)));

        engine.clock().advance_secs(6);
        engine.tick();
        let store = tasks.borrow();
        assert_eq!(store.locate(a), Some((ListName::Completed, 0)));
        assert_eq!(store.locate(b), Some((ListName::Active, 0)));
    }

    #[test]
    fn detached_bridge_leaves_lists_alone() {
        let (mut engine, tasks) = setup();
        let id = SessionTaskBridge::connect(&mut engine, Rc::clone(&tasks));
        let a = {
            let mut store = tasks.borrow_mut();
            let a = store.add(ListName::Active, "write").unwrap();
            store.toggle(ListName::Active, a);
            a
        };
        assert!(engine.unsubscribe(id));

        engine.toggle_run();
        engine.clock().advance_secs(11);
        engine.tick();
        engine.clock().advance_secs(6);
        engine.tick();
        assert_eq!(tasks.borrow().locate(a), Some((ListName::Active, 0)));
    }
}
