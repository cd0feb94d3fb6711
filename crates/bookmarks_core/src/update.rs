use crate::{Effect, MonitorState, Msg, Phase};

/// Pure update function: applies a message to the monitor state and returns
/// any effects for the driver to execute.
///
/// Messages that do not apply to the current phase are ignored; `Converged`
/// is terminal and produces no further effects.
pub fn update(mut state: MonitorState, msg: Msg) -> (MonitorState, Vec<Effect>) {
    let effects = match msg {
        Msg::CaptureStarted => match state.phase() {
            Phase::Scrolling => vec![Effect::IssueScrollStep],
            Phase::Settling | Phase::Converged => Vec::new(),
        },
        Msg::ScrollStepped { scroll_height } => {
            if state.phase() != Phase::Scrolling {
                return (state, Vec::new());
            }
            state.record_step(scroll_height);
            if state.reached_bottom() {
                state.set_phase(Phase::Settling);
                vec![Effect::BeginSettle]
            } else {
                vec![Effect::IssueScrollStep]
            }
        }
        Msg::SettleElapsed { scroll_height } => {
            if state.phase() != Phase::Settling {
                return (state, Vec::new());
            }
            state.record_settle_sample(scroll_height);
            if state.reached_bottom() {
                state.set_phase(Phase::Converged);
                vec![Effect::BeginShutdown]
            } else {
                // The grace interval let another page fetch land; the feed
                // grew, so resume scrolling toward the new bottom.
                state.set_phase(Phase::Scrolling);
                vec![Effect::IssueScrollStep]
            }
        }
    };

    (state, effects)
}
