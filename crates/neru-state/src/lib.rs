//! Mode state machine and per-manager input accumulation (§4.8, §3).

mod input_state;
mod mode;
mod mode_machine;

pub use input_state::InputState;
pub use mode::Mode;
pub use mode_machine::ModeStateMachine;
