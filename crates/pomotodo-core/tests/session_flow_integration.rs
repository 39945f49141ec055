//! Integration tests for the session engine driven by a manual clock.
//!
//! Covers the full work/break cycle with auto-chain and target count,
//! countdown accuracy under irregular polling, and pomodoro counting.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use pomotodo_core::{Event, ManualClock, Phase, SessionConfig, SessionEngine};
use proptest::prelude::*;

fn engine(
    work: u32,
    brk: u32,
    target: u32,
    auto_chain: bool,
) -> (SessionEngine<Rc<ManualClock>>, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::at_epoch());
    let config = SessionConfig::new(work, brk, target, auto_chain).unwrap();
    (SessionEngine::new(config, Rc::clone(&clock)), clock)
}

fn at_millis(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::default() + Duration::milliseconds(ms)
}

fn count_completions(events: &[Event]) -> (usize, usize) {
    events.iter().fold((0, 0), |(work, brk), event| match event {
        Event::WorkPhaseComplete { .. } => (work + 1, brk),
        Event::BreakPhaseComplete { .. } => (work, brk + 1),
        _ => (work, brk),
    })
}

#[test]
fn test_full_cycle_until_target_reached() {
    let (mut engine, clock) = engine(1, 1, 2, true);
    engine.toggle_run();

    clock.advance_secs(1);
    engine.tick();
    assert_eq!(engine.state().phase, Phase::Break);
    assert_eq!(engine.state().completed_pomodoro_count, 1);
    assert!(engine.is_running());

    clock.advance_secs(1);
    engine.tick();
    assert_eq!(engine.state().phase, Phase::Work);
    assert_eq!(engine.state().completed_pomodoro_count, 1);
    assert!(engine.is_running());

    clock.advance_secs(1);
    engine.tick();
    assert_eq!(engine.state().phase, Phase::Break);
    assert_eq!(engine.state().completed_pomodoro_count, 2);
    assert!(engine.is_running());

    clock.advance_secs(1);
    let events = engine.tick();
    assert_eq!(engine.state().phase, Phase::Work);
    assert_eq!(engine.state().completed_pomodoro_count, 2);
    assert!(!engine.is_running());
    assert!(!engine.config().auto_chain);
    assert!(engine.active_poll().is_none());
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::SettingsChanged { config, .. } if !config.auto_chain)));
}

#[test]
fn test_one_phase_transition_per_poll_after_long_sleep() {
    let (mut engine, clock) = engine(1, 1, 5, true);
    engine.toggle_run();

    // The host was suspended for far longer than the whole session.
    clock.advance_secs(60);
    let events = engine.tick();
    assert_eq!(count_completions(&events), (1, 0));
    assert_eq!(engine.state().phase, Phase::Break);
    assert_eq!(engine.state().remaining_secs, 0.0);

    // Each further poll catches up exactly one overdue phase.
    let mut polls = 1;
    while engine.is_running() {
        let events = engine.tick();
        let (work, brk) = count_completions(&events);
        assert_eq!(work + brk, 1);
        polls += 1;
    }
    assert_eq!(polls, 10);
    assert_eq!(engine.state().completed_pomodoro_count, 5);
    assert_eq!(engine.state().phase, Phase::Work);
    assert!(!engine.config().auto_chain);
}

#[test]
fn test_full_cycle_with_late_irregular_polls() {
    let (mut engine, clock) = engine(1, 1, 2, true);
    engine.toggle_run();

    for ms in [500, 1_050] {
        clock.set(at_millis(ms));
        engine.tick();
    }
    assert_eq!(engine.state().phase, Phase::Break);
    assert!((engine.state().remaining_secs - 0.95).abs() < 1e-9);

    clock.set(at_millis(2_000));
    engine.tick();
    assert_eq!(engine.state().phase, Phase::Work);
    assert_eq!(engine.state().remaining_secs, 1.0);

    clock.set(at_millis(3_300));
    engine.tick();
    assert_eq!(engine.state().phase, Phase::Break);
    assert_eq!(engine.state().completed_pomodoro_count, 2);
    assert!((engine.state().remaining_secs - 0.7).abs() < 1e-9);

    clock.set(at_millis(4_000));
    engine.tick();
    assert_eq!(engine.state().phase, Phase::Work);
    assert!(!engine.is_running());
    assert!(!engine.config().auto_chain);
}

#[test]
fn test_pause_resume_keeps_total_elapsed() {
    let (mut engine, clock) = engine(10, 5, 1, false);
    engine.toggle_run();
    clock.advance_secs(4);
    engine.tick();
    engine.toggle_run();

    clock.advance_secs(100);
    engine.tick();
    assert_eq!(engine.state().remaining_secs, 6.0);

    engine.toggle_run();
    clock.advance_secs(6);
    let events = engine.tick();
    assert_eq!(count_completions(&events), (1, 0));
    assert_eq!(engine.state().phase, Phase::Break);
    assert!(!engine.is_running());
}

#[test]
fn test_completion_fires_once_for_late_polls() {
    let (mut engine, clock) = engine(3, 3, 2, false);
    let completions = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&completions);
    engine.subscribe(move |event| {
        if matches!(event, Event::WorkPhaseComplete { .. }) {
            *counter.borrow_mut() += 1;
        }
    });

    engine.toggle_run();
    let handle = engine.active_poll().unwrap();
    clock.advance_secs(10);
    for _ in 0..5 {
        engine.poll(handle);
        engine.tick();
    }
    assert_eq!(*completions.borrow(), 1);
    assert_eq!(engine.state().completed_pomodoro_count, 1);
}

#[test]
fn test_duration_edit_while_running_applies_next_cycle() {
    let (mut engine, clock) = engine(10, 5, 3, true);
    engine.toggle_run();
    clock.advance_secs(2);
    engine.tick();
    engine.update_setting(pomotodo_core::Setting::WorkDuration, "4").unwrap();
    assert_eq!(engine.state().remaining_secs, 8.0);

    clock.advance_secs(8);
    engine.tick();
    assert_eq!(engine.state().phase, Phase::Break);
    clock.advance_secs(5);
    engine.tick();
    assert_eq!(engine.state().phase, Phase::Work);
    assert_eq!(engine.state().remaining_secs, 4.0);
}

proptest! {
    /// However irregular the polling, advancing the clock by exactly the
    /// work duration ends the phase exactly once.
    #[test]
    fn countdown_has_no_drift(
        work in 1u32..3_600,
        offsets in prop::collection::vec(0.0f64..1.0, 0..40),
    ) {
        let (mut engine, clock) = engine(work, 60, 4, false);
        engine.toggle_run();
        let total_ms = i64::from(work) * 1000;

        let mut polls: Vec<i64> = offsets
            .iter()
            .map(|f| (f * total_ms as f64) as i64)
            .filter(|ms| *ms < total_ms)
            .collect();
        polls.sort_unstable();

        let mut completions = (0, 0);
        for ms in polls {
            clock.set(at_millis(ms));
            let events = engine.tick();
            let (w, b) = count_completions(&events);
            completions = (completions.0 + w, completions.1 + b);
            let expected = f64::from(work) - ms as f64 / 1000.0;
            prop_assert!((engine.state().remaining_secs - expected).abs() < 1e-9);
        }
        prop_assert_eq!(completions, (0, 0));

        clock.set(at_millis(total_ms));
        let events = engine.tick();
        prop_assert_eq!(count_completions(&events), (1, 0));
        prop_assert_eq!(engine.state().phase, Phase::Break);

        clock.set(at_millis(total_ms + 5_000));
        prop_assert!(engine.tick().is_empty());
    }

    /// Under auto-chain, late polls never shift the schedule: after `n`
    /// full cycles of wall time the session is exactly `n` cycles in.
    #[test]
    fn auto_chain_cycles_stay_on_schedule(
        work in 1u32..120,
        brk in 1u32..60,
        cycles in 1u32..5,
        offsets in prop::collection::vec(0.0f64..1.0, 0..60),
    ) {
        let (mut engine, clock) = engine(work, brk, 1_000, true);
        engine.toggle_run();
        let cycle_ms = i64::from(work + brk) * 1000;
        let total_ms = cycle_ms * i64::from(cycles);

        let mut polls: Vec<i64> = offsets
            .iter()
            .map(|f| (f * total_ms as f64) as i64)
            .collect();
        polls.sort_unstable();
        for ms in polls {
            clock.set(at_millis(ms));
            engine.tick();
        }

        // Drain whatever the sparse polls left overdue.
        clock.set(at_millis(total_ms));
        for _ in 0..(2 * cycles + 2) {
            engine.tick();
        }

        prop_assert_eq!(engine.state().phase, Phase::Work);
        prop_assert_eq!(engine.state().completed_pomodoro_count, cycles);
        prop_assert_eq!(engine.state().remaining_secs, f64::from(work));
        prop_assert!(engine.is_running());
    }

    /// The count moves only on work completions and session resets.
    #[test]
    fn pomodoro_count_tracks_work_completions(
        steps in prop::collection::vec((0u8..4, 0i64..5), 1..60),
    ) {
        let (mut engine, clock) = engine(2, 1, 1_000, false);
        for (action, secs) in steps {
            let before = engine.state().completed_pomodoro_count;
            clock.advance_secs(secs);
            let events = match action {
                0 => engine.toggle_run(),
                1 => engine.tick(),
                2 => engine.reset_current_phase(),
                _ => engine.reset_session(),
            };
            let after = engine.state().completed_pomodoro_count;
            let (work_done, _) = count_completions(&events);
            if action == 3 {
                prop_assert_eq!(after, 0);
            } else {
                prop_assert_eq!(after, before + work_done as u32);
            }
        }
    }
}
