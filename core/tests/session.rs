use prizewheel_core::{
    config::WheelConfig,
    error::WheelError,
    event::WheelEvent,
    outcome::{Outcome, OutcomeTable},
    planner::sector_under_pointer,
    rng::WheelRng,
    session::WheelSession,
    state::{self, IgnoreReason, SpinPhase, SpinState, Trigger},
};

// ── Test helpers ────────────────────────────────────────────────────────────

fn make_session(id: &str, seed: u64) -> WheelSession {
    WheelSession::new(id.into(), &WheelConfig::default_test(), WheelRng::seeded(seed)).unwrap()
}

fn started_plan(trigger: Trigger) -> prizewheel_core::planner::SpinPlan {
    match trigger {
        Trigger::Started(plan) => plan,
        Trigger::Ignored(reason) => panic!("spin unexpectedly ignored: {reason:?}"),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn new_session_is_idle() {
    let session = make_session("idle", 1);
    assert_eq!(session.phase(), SpinPhase::Idle);
    assert!(session.can_spin());
    assert_eq!(session.state(), &SpinState::new());
    assert_eq!(session.rotation_at_now(), 0.0);
    assert!(session.result().is_none());
    assert!(matches!(session.events(), [WheelEvent::SessionCreated { sector_count: 6, .. }]));
}

/// The outcome is chosen at the trigger and only revealed once the full
/// duration has elapsed.
#[test]
fn outcome_drawn_at_start_and_revealed_after_duration() {
    let mut session = make_session("timeline", 42);
    let plan = started_plan(session.spin().unwrap());

    assert_eq!(session.phase(), SpinPhase::Spinning);
    assert!(!session.can_spin());
    assert_eq!(session.state().chosen_outcome_index, Some(plan.chosen_index));
    assert_eq!(session.state().cumulative_rotation_degrees, plan.target_rotation);
    assert!(session.result().is_none(), "result must not be visible mid-spin");

    let events = session.advance(3_999);
    assert!(events.is_empty());
    assert_eq!(session.phase(), SpinPhase::Spinning);

    let events = session.advance(1);
    assert!(matches!(
        events.as_slice(),
        [WheelEvent::SpinSettled { at_ms: 4_000, .. }]
    ));
    assert_eq!(session.phase(), SpinPhase::Settled);
    let won = session.result().unwrap().clone();
    assert_eq!(&won, session.table().get(plan.chosen_index).unwrap());
    assert_ne!(plan.chosen_index, 5, "decoy must never be won");
    assert!(!session.is_result_visible());

    session.advance(299);
    assert!(!session.is_result_visible());
    let events = session.advance(1);
    assert!(session.is_result_visible());
    match events.as_slice() {
        [WheelEvent::ResultShown { at_ms, label, .. }] => {
            assert_eq!(*at_ms, 4_300);
            assert_eq!(label, &won.label);
        }
        other => panic!("expected a single ResultShown, got {other:?}"),
    }

    assert_eq!(
        sector_under_pointer(session.rotation_at_now(), 6),
        plan.chosen_index
    );
}

#[test]
fn one_large_advance_fires_settle_then_reveal() {
    let mut session = make_session("big-step", 5);
    session.spin().unwrap();

    let events = session.advance(60_000);
    let kinds: Vec<&str> = events.iter().map(WheelEvent::kind).collect();
    assert_eq!(kinds, vec!["spin_settled", "result_shown"]);
    assert_eq!(events[0].at_ms(), 4_000);
    assert_eq!(events[1].at_ms(), 4_300);
    assert_eq!(session.now_ms(), 60_000);
}

#[test]
fn repeated_triggers_do_not_change_rotation() {
    let mut session = make_session("idempotent", 9);
    session.spin().unwrap();
    let after_first = session.state().clone();

    for _ in 0..5 {
        assert_eq!(
            session.spin().unwrap(),
            Trigger::Ignored(IgnoreReason::AlreadySpinning)
        );
    }
    assert_eq!(session.state(), &after_first);

    session.advance(4_000);
    let settled = session.state().clone();
    assert_eq!(
        session.spin().unwrap(),
        Trigger::Ignored(IgnoreReason::AlreadySpun)
    );
    assert_eq!(session.state(), &settled);
    assert_eq!(
        settled.cumulative_rotation_degrees,
        after_first.cumulative_rotation_degrees
    );

    let started = session.events().iter().filter(|e| e.kind() == "spin_started").count();
    let ignored = session.events().iter().filter(|e| e.kind() == "spin_ignored").count();
    assert_eq!(started, 1);
    assert_eq!(ignored, 6);
}

#[test]
fn teardown_mid_spin_prevents_reveal() {
    let mut session = make_session("teardown", 3);
    session.spin().unwrap();
    session.advance(1_000);

    assert_eq!(session.teardown(), 1);
    let events = session.advance(10_000);
    assert!(events.is_empty());
    assert_eq!(session.phase(), SpinPhase::Spinning);
    assert!(session.result().is_none());
    assert!(!session.is_result_visible());

    assert!(!session.can_spin());
    assert_eq!(session.spin().unwrap(), Trigger::Ignored(IgnoreReason::TornDown));
}

#[test]
fn teardown_freezes_the_displayed_rotation() {
    let mut session = make_session("teardown-freeze", 8);
    let plan = started_plan(session.spin().unwrap());
    session.advance(1_000);

    session.teardown();
    let frozen = session.rotation_at_now();
    assert!(frozen > plan.start_rotation && frozen < plan.target_rotation);

    session.advance(5_000);
    assert_eq!(session.now_ms(), 6_000);
    assert_eq!(session.rotation_at_now(), frozen);
    assert_eq!(session.view().displayed_rotation, frozen);
}

#[test]
fn repeated_teardown_records_one_cancellation() {
    let mut session = make_session("teardown-twice", 5);
    session.spin().unwrap();

    assert_eq!(session.teardown(), 1);
    assert_eq!(session.teardown(), 0);
    assert_eq!(session.teardown(), 0);

    let cancellations = session
        .events()
        .iter()
        .filter(|e| matches!(e, WheelEvent::TimersCancelled { .. }))
        .count();
    assert_eq!(cancellations, 1);
}

#[test]
fn teardown_before_spin_blocks_the_trigger() {
    let mut session = make_session("teardown-idle", 3);
    assert_eq!(session.teardown(), 0);
    assert_eq!(session.spin().unwrap(), Trigger::Ignored(IgnoreReason::TornDown));
    assert_eq!(session.phase(), SpinPhase::Idle);
}

#[test]
fn dismiss_hides_the_result_once() {
    let mut session = make_session("dismiss", 8);
    assert!(!session.dismiss(), "nothing to dismiss before a spin");

    session.spin().unwrap();
    session.advance(4_300);
    assert!(session.is_result_visible());

    assert!(session.dismiss());
    assert!(!session.is_result_visible());
    assert!(!session.dismiss());
    // The prize stays won after the display is closed.
    assert!(session.result().is_some());
    assert_eq!(session.phase(), SpinPhase::Settled);
}

#[test]
fn displayed_rotation_follows_the_spin_forward() {
    let mut session = make_session("rotation", 21);
    let plan = started_plan(session.spin().unwrap());

    assert_eq!(session.rotation_at_now(), plan.start_rotation);
    let mut previous = session.rotation_at_now();
    for _ in 0..40 {
        session.advance(100);
        let now = session.rotation_at_now();
        assert!(now >= previous, "wheel turned backwards: {previous} -> {now}");
        previous = now;
    }
    assert_eq!(session.phase(), SpinPhase::Settled);
    assert_eq!(session.rotation_at_now(), plan.target_rotation);
}

#[test]
fn view_reports_the_control_surface() {
    let mut session = make_session("view", 4);
    let view = session.view();
    assert!(view.can_spin);
    assert_eq!(view.phase, SpinPhase::Idle);
    assert!(view.pending_timers.is_empty());

    session.spin().unwrap();
    let view = session.view();
    assert!(!view.can_spin);
    assert_eq!(view.pending_timers.len(), 1);
    assert!(view.result_label.is_none());

    session.advance(5_000);
    let view = session.view();
    assert!(view.result_visible);
    assert!(view.result_label.is_some());
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["phase"], "settled");
}

#[test]
fn misconfigured_wheel_fails_fast() {
    let config = WheelConfig {
        outcomes: vec![Outcome::new("nothing", 0)],
        ..WheelConfig::default_test()
    };
    let result = WheelSession::new("bad".into(), &config, WheelRng::seeded(1));
    assert!(matches!(result, Err(WheelError::ZeroTotalWeight)));
}

#[test]
fn pure_transitions_leave_other_phases_alone() {
    let config = WheelConfig::default_test();
    let table = OutcomeTable::new(config.outcomes.clone()).unwrap();
    let mut rng = WheelRng::seeded(12);

    let (idle, revealed) = state::settle(SpinState::new());
    assert_eq!(idle, SpinState::new());
    assert!(revealed.is_none());

    let (spinning, trigger) =
        state::start_spin(SpinState::new(), &table, &config.spin, &mut rng).unwrap();
    let plan = started_plan(trigger);
    assert!(spinning.is_spinning && !spinning.has_spun);

    let (again, trigger) =
        state::start_spin(spinning.clone(), &table, &config.spin, &mut rng).unwrap();
    assert_eq!(trigger, Trigger::Ignored(IgnoreReason::AlreadySpinning));
    assert_eq!(again, spinning);

    let (settled, revealed) = state::settle(spinning);
    assert_eq!(revealed, Some(plan.chosen_index));
    assert_eq!(settled.phase(), SpinPhase::Settled);

    let (still, revealed) = state::settle(settled.clone());
    assert_eq!(still, settled);
    assert!(revealed.is_none());
}
