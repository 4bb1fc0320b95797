//! Rift AI - state machines and boss decisions
//!
//! # Features
//!
//! - [`StateMachine`]: named states with enter/update/exit hooks, a
//!   previous-state slot for reverting, and silent no-ops for unknown names
//! - [`BossAi`]: cooldown-gated, range-gated, weighted skill selection with a
//!   health-triggered second phase
//!
//! # Example
//!
//! ```ignore
//! use rift_ai::prelude::*;
//!
//! let mut fsm: StateMachine<Guard, Frame> = StateMachine::new()
//!     .with_state(GuardIdle::default())
//!     .with_state(GuardAlert::default());
//! fsm.init(&mut guard, &mut frame, "Idle");
//! fsm.update(&mut guard, &mut frame, dt);
//! ```

pub mod boss_ai;
pub mod error;
pub mod state_machine;

pub mod prelude {
    pub use crate::boss_ai::{pick_by_weight, BossAi, BossHost, BossSkill, BossTuning, PHASE_ONE, PHASE_TWO};
    pub use crate::error::{AiError, Result};
    pub use crate::state_machine::{State, StateMachine, Transition};
}

pub use prelude::*;
