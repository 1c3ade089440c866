use serde::Deserialize;

/// What a button or spawner timer does once its cooloff window has passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooloffPolicy {
    /// The timer keeps counting forever; the button is pressable again once
    /// the window has elapsed.
    #[default]
    KeepRunning,
    /// The timer returns to idle as soon as the window has elapsed.
    ResetToIdle,
    /// The button fires once per session.
    Latched,
}

/// Every tunable of the simulation. Lengths are room-local units, times are
/// seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub room_width: f32,
    pub room_height: f32,
    pub floor_height: f32,
    pub character_width: f32,
    pub character_height: f32,
    pub run_speed: f32,
    pub run_accel: f32,
    pub walk_speed: f32,
    pub walk_accel: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub throw_x_speed: f32,
    pub throw_y_speed: f32,
    pub button_cooloff: f32,
    pub spawner_cooloff: f32,
    pub cooloff_policy: CooloffPolicy,
    pub anim_fps: f32,
    pub depth_min: f32,
    pub depth_max: f32,
    pub carry_depth_nudge: f32,
    pub depth_scale: f32,
    pub ai_walk_probability: f32,
    pub ai_move_min: f32,
    pub ai_move_max: f32,
    pub ai_idle_min: f32,
    pub ai_idle_max: f32,
    pub ai_initial_max: f32,
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            room_width: 8.0,
            room_height: 2.5,
            floor_height: 0.25,
            character_width: 1.0,
            character_height: 1.0,
            run_speed: 8.0,
            run_accel: 30.0,
            walk_speed: 2.0,
            walk_accel: 12.0,
            jump_speed: 7.0,
            gravity: 40.0,
            throw_x_speed: 6.0,
            throw_y_speed: 5.0,
            button_cooloff: 1.0,
            spawner_cooloff: 1.0,
            cooloff_policy: CooloffPolicy::KeepRunning,
            anim_fps: 8.0,
            depth_min: 0.0,
            depth_max: 0.25,
            carry_depth_nudge: 0.05,
            depth_scale: 1.0,
            ai_walk_probability: 0.3,
            ai_move_min: 0.5,
            ai_move_max: 1.5,
            ai_idle_min: 1.0,
            ai_idle_max: 3.0,
            ai_initial_max: 2.0,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Reports the first field that cannot drive a simulation.
    pub fn invalid_field(&self) -> Option<(&'static str, &'static str)> {
        let positive = [
            ("room_width", self.room_width),
            ("room_height", self.room_height),
            ("character_width", self.character_width),
            ("character_height", self.character_height),
            ("run_speed", self.run_speed),
            ("run_accel", self.run_accel),
            ("walk_speed", self.walk_speed),
            ("walk_accel", self.walk_accel),
            ("gravity", self.gravity),
            ("anim_fps", self.anim_fps),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Some((field, "must be a positive number"));
            }
        }
        if !(self.button_cooloff >= 0.0 && self.spawner_cooloff >= 0.0) {
            return Some(("button_cooloff", "cooloff windows must not be negative"));
        }
        if !(self.depth_min.is_finite() && self.depth_max.is_finite()) {
            return Some(("depth_min", "depth bounds must be finite"));
        }
        if !(self.depth_min < self.depth_max) {
            return Some(("depth_min", "must be below depth_max"));
        }
        if !(0.0..=0.5).contains(&self.ai_walk_probability) {
            return Some(("ai_walk_probability", "must be within 0..=0.5"));
        }
        let ranges = [
            ("ai_move_min", self.ai_move_min, self.ai_move_max),
            ("ai_idle_min", self.ai_idle_min, self.ai_idle_max),
            ("ai_initial_max", 0.0, self.ai_initial_max),
        ];
        for (field, min, max) in ranges {
            if !(min >= 0.0 && min < max && max.is_finite()) {
                return Some((field, "must form a finite, non-empty, non-negative range"));
            }
        }
        None
    }
}
