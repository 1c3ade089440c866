//! Crew wandering: a renewal process over slow-left, slow-right and idle.

use rand::Rng;
use tracing::trace;

use crate::config::SimConfig;
use crate::input::{Action, ActionSet};
use crate::model::{AiState, CrewMember};

/// Fresh state with a random first countdown so crew do not think in lockstep.
pub fn initial_state<R: Rng + ?Sized>(rng: &mut R, config: &SimConfig) -> AiState {
    AiState {
        pending: ActionSet::empty(),
        next_think: rng.gen_range(0.0..config.ai_initial_max),
    }
}

fn resample<R: Rng + ?Sized>(rng: &mut R, config: &SimConfig) -> AiState {
    let roll: f32 = rng.gen();
    let walk = config.ai_walk_probability;
    let heading = if roll < walk {
        Some(Action::SlowLeft)
    } else if roll < 2.0 * walk {
        Some(Action::SlowRight)
    } else {
        None
    };
    match heading {
        Some(action) => AiState {
            pending: ActionSet::empty().with(action),
            next_think: rng.gen_range(config.ai_move_min..config.ai_move_max),
        },
        None => AiState {
            pending: ActionSet::empty(),
            next_think: rng.gen_range(config.ai_idle_min..config.ai_idle_max),
        },
    }
}

/// Counts down and, once due, picks the next micro-intent. The crew member's
/// intent is the pending one either way.
pub fn think<R: Rng + ?Sized>(crew: &mut CrewMember, dt: f32, rng: &mut R, config: &SimConfig) {
    let ai = &mut crew.role.ai;
    ai.next_think -= dt;
    if ai.next_think <= 0.0 {
        *ai = resample(rng, config);
        trace!(
            id = %crew.id,
            heading = ?ai.pending.horizontal().map(|(heading, _)| heading),
            next_think = ai.next_think,
            "ai_resampled"
        );
    }
    crew.intent = ai.pending;
}
