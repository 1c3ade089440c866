use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::{ai, animation, interaction, physics, spawning, SimError};
use crate::config::SimConfig;
use crate::input::ActionSet;
use crate::layout::{LayoutError, WorldLayout};
use crate::model::{EntityId, World};
use crate::render::{self, DrawCommand};

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub picked_up: Option<EntityId>,
    pub thrown: Option<EntityId>,
    pub pressed: Option<EntityId>,
    pub spawned: Vec<EntityId>,
}

/// Owns the world and advances it in fixed steps.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    world: World,
    rng: StdRng,
    tick: u64,
    elapsed: f64,
}

impl Simulation {
    pub fn from_layout(layout: &WorldLayout) -> Result<Self, LayoutError> {
        let seed = layout.config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let world = layout.build(&mut rng)?;
        info!(seed, cooloff_policy = ?layout.config.cooloff_policy, "simulation_ready");
        Ok(Self {
            config: layout.config.clone(),
            world,
            rng,
            tick: 0,
            elapsed: 0.0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Runs one tick: intents, interactions, spawning, animation, then
    /// integration. An error leaves the world mid-tick and should end the run.
    pub fn advance(&mut self, dt: f32, player_intent: ActionSet) -> Result<TickReport, SimError> {
        let config = &self.config;
        let world = &mut self.world;

        if player_intent.has_conflicting_tiers() {
            return Err(SimError::ConflictingIntent { id: world.player.id });
        }
        world.player.intent = player_intent;
        for crew in world.crew.iter_mut() {
            if crew.is_carried() {
                crew.intent = ActionSet::empty();
            } else {
                ai::think(crew, dt, &mut self.rng, config);
            }
            if crew.intent.has_conflicting_tiers() {
                return Err(SimError::ConflictingIntent { id: crew.id });
            }
            physics::resolve_intent(&mut crew.body, &crew.intent, config);
        }
        let player = &mut world.player;
        physics::resolve_intent(&mut player.body, &player.intent, config);

        let picked_up = interaction::try_pickup(world, config)?;
        interaction::slave_carried(world)?;
        let thrown = interaction::try_throw(world, config)?;
        let pressed = interaction::try_press(world)?;

        let spawned = spawning::spawn_pending(world, &mut self.rng, config)?;
        spawning::advance_timers(world, dt)?;

        animation::animate_all(world, dt);

        let room_count = world.rooms.len();
        for crew in world.crew.iter_mut() {
            physics::integrate(&mut crew.body, dt, config.room_width, room_count);
        }
        let player = &mut world.player;
        let from_room = player.body.room_index;
        physics::integrate(&mut player.body, dt, config.room_width, room_count);
        if player.body.room_index != from_room {
            debug!(id = %player.id, from = from_room, to = player.body.room_index, "room_changed");
        }
        interaction::anchor_carried(world)?;
        interaction::check_carry(world)?;

        self.tick += 1;
        self.elapsed += f64::from(dt);
        Ok(TickReport {
            tick: self.tick,
            picked_up,
            thrown,
            pressed,
            spawned,
        })
    }

    /// Draw commands for the player's current room, back to front.
    pub fn draw_list(&self) -> Result<Vec<DrawCommand>, SimError> {
        Ok(render::assemble(&self.world, &self.config)?)
    }
}
