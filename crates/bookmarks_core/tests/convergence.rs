use std::sync::Once;

use bookmarks_core::{update, Effect, MonitorState, Msg, Phase};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

const DISTANCE: u64 = 100;

fn started() -> MonitorState {
    let (state, effects) = update(MonitorState::new(DISTANCE), Msg::CaptureStarted);
    assert_eq!(effects, vec![Effect::IssueScrollStep]);
    state
}

/// Scroll until the state machine stops asking for another step, feeding the
/// same sampled height after every step. Returns the state plus the effects
/// of the final step.
fn scroll_until_bottom(mut state: MonitorState, height: u64) -> (MonitorState, Vec<Effect>) {
    loop {
        let (next, effects) = update(state, Msg::ScrollStepped { scroll_height: height });
        state = next;
        if effects != vec![Effect::IssueScrollStep] {
            return (state, effects);
        }
    }
}

#[test]
fn converges_after_one_settle_without_growth() {
    init_logging();
    let state = started();

    // Scroll toward a 500-high document; the bottom is hit on the fifth step.
    let (state, effects) = scroll_until_bottom(state, 500);
    assert_eq!(state.phase(), Phase::Settling);
    assert_eq!(state.current_height(), 500);
    assert_eq!(effects, vec![Effect::BeginSettle]);

    // The settle sample shows no growth: converged, exactly one settle cycle.
    let (state, effects) = update(state, Msg::SettleElapsed { scroll_height: 500 });
    assert_eq!(state.phase(), Phase::Converged);
    assert_eq!(effects, vec![Effect::BeginShutdown]);
}

#[test]
fn growth_during_settle_resumes_scrolling() {
    init_logging();
    let state = started();

    let (state, effects) = scroll_until_bottom(state, 500);
    assert_eq!(effects, vec![Effect::BeginSettle]);

    // A late page fetch grew the feed to 800 during the grace interval.
    let (state, effects) = update(state, Msg::SettleElapsed { scroll_height: 800 });
    assert_eq!(state.phase(), Phase::Scrolling);
    assert_eq!(effects, vec![Effect::IssueScrollStep]);

    // Second cycle: scroll down to the new bottom and settle again.
    let (state, effects) = scroll_until_bottom(state, 800);
    assert_eq!(state.phase(), Phase::Settling);
    assert_eq!(state.current_height(), 800);
    assert_eq!(effects, vec![Effect::BeginSettle]);

    let (state, effects) = update(state, Msg::SettleElapsed { scroll_height: 800 });
    assert_eq!(state.phase(), Phase::Converged);
    assert_eq!(effects, vec![Effect::BeginShutdown]);
}

#[test]
fn converged_is_terminal() {
    init_logging();
    let state = started();
    let (state, _) = scroll_until_bottom(state, 200);
    let (state, _) = update(state, Msg::SettleElapsed { scroll_height: 200 });
    assert_eq!(state.phase(), Phase::Converged);

    // No message can wake the machine back up.
    let (state, effects) = update(state, Msg::ScrollStepped { scroll_height: 900 });
    assert_eq!(effects, Vec::new());
    let (state, effects) = update(state, Msg::SettleElapsed { scroll_height: 900 });
    assert_eq!(effects, Vec::new());
    let (state, effects) = update(state, Msg::CaptureStarted);
    assert_eq!(effects, Vec::new());
    assert_eq!(state.phase(), Phase::Converged);
}

#[test]
fn out_of_phase_messages_are_ignored() {
    init_logging();

    // A settle sample while still scrolling does nothing.
    let state = started();
    let before = state.clone();
    let (state, effects) = update(state, Msg::SettleElapsed { scroll_height: 700 });
    assert_eq!(state, before);
    assert_eq!(effects, Vec::new());

    // A scroll step while settling does nothing.
    let (state, _) = scroll_until_bottom(state, 300);
    assert_eq!(state.phase(), Phase::Settling);
    let before = state.clone();
    let (state, effects) = update(state, Msg::ScrollStepped { scroll_height: 900 });
    assert_eq!(state, before);
    assert_eq!(effects, Vec::new());
}

#[test]
fn empty_feed_settles_immediately() {
    init_logging();

    // First step on a zero-height document is already at the bottom.
    let (state, effects) = update(started(), Msg::ScrollStepped { scroll_height: 0 });
    assert_eq!(state.phase(), Phase::Settling);
    assert_eq!(effects, vec![Effect::BeginSettle]);
}
