//! Bookmarks core: pure convergence state machine for the capture scroll loop.
mod effect;
mod msg;
mod state;
mod update;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{MonitorState, Phase};
pub use update::update;
