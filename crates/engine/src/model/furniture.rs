use std::collections::VecDeque;

use serde::Deserialize;

use super::{CrewKind, EntityId, Rect};
use crate::config::CooloffPolicy;
use crate::index::Identified;
use crate::sprite_keys::ImageKey;

/// Timer of a timed furniture event. `Running` holds seconds since the last
/// trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Cooloff {
    #[default]
    Idle,
    Running(f32),
}

impl Cooloff {
    pub fn start(&mut self) {
        *self = Cooloff::Running(0.0);
    }

    pub fn elapsed(&self) -> Option<f32> {
        match *self {
            Cooloff::Idle => None,
            Cooloff::Running(elapsed) => Some(elapsed),
        }
    }

    /// Inside the window retriggering is refused and alternate art is shown.
    pub fn is_active(&self, window: f32) -> bool {
        matches!(*self, Cooloff::Running(elapsed) if elapsed < window)
    }

    pub fn advance(&mut self, dt: f32, window: f32, policy: CooloffPolicy) {
        if let Cooloff::Running(elapsed) = *self {
            let elapsed = elapsed + dt;
            *self = if policy == CooloffPolicy::ResetToIdle && elapsed >= window {
                Cooloff::Idle
            } else {
                Cooloff::Running(elapsed)
            };
        }
    }
}

/// Hard-coded furniture events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnEvent {
    Crew(CrewKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub event: SpawnEvent,
    pub notify_target: EntityId,
    pub timer: Cooloff,
    fired: bool,
    window: f32,
    policy: CooloffPolicy,
}

impl Button {
    pub fn new(event: SpawnEvent, notify_target: EntityId, window: f32, policy: CooloffPolicy) -> Self {
        Self {
            event,
            notify_target,
            timer: Cooloff::Idle,
            fired: false,
            window,
            policy,
        }
    }

    pub fn is_pressable(&self) -> bool {
        match self.policy {
            CooloffPolicy::Latched => !self.fired,
            CooloffPolicy::KeepRunning | CooloffPolicy::ResetToIdle => {
                !self.timer.is_active(self.window)
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active(self.window)
    }

    pub fn press(&mut self) {
        self.timer.start();
        self.fired = true;
    }

    /// Returns whether pressability flipped.
    pub fn advance(&mut self, dt: f32) -> bool {
        let before = self.is_pressable();
        self.timer.advance(dt, self.window, self.policy);
        before != self.is_pressable()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    pub pending: VecDeque<SpawnEvent>,
    pub timer: Cooloff,
    window: f32,
    policy: CooloffPolicy,
}

impl Spawner {
    pub fn new(window: f32, policy: CooloffPolicy) -> Self {
        Self {
            pending: VecDeque::new(),
            timer: Cooloff::Idle,
            window,
            policy,
        }
    }

    pub fn enqueue(&mut self, event: SpawnEvent) {
        self.pending.push_back(event);
        self.timer.start();
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active(self.window)
    }

    pub fn advance(&mut self, dt: f32) {
        self.timer.advance(dt, self.window, self.policy);
    }
}

/// Static room furniture. Only the component timers and queues change.
#[derive(Debug, Clone, PartialEq)]
pub struct Furniture {
    pub id: EntityId,
    pub key: String,
    pub kind: ImageKey,
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub room_index: i32,
    pub button: Option<Button>,
    pub spawner: Option<Spawner>,
}

impl Identified for Furniture {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Furniture {
    pub fn rect(&self) -> Rect {
        Rect::standing(self.x, 0.0, self.width, self.height)
    }

    pub fn button(&self) -> Option<&Button> {
        self.button.as_ref()
    }

    pub fn spawner(&self) -> Option<&Spawner> {
        self.spawner.as_ref()
    }

    /// Whether any timed component is inside its cooloff window.
    pub fn shows_alt(&self) -> bool {
        self.button.as_ref().is_some_and(Button::is_active)
            || self.spawner.as_ref().is_some_and(Spawner::is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(policy: CooloffPolicy) -> Button {
        Button::new(SpawnEvent::Crew(CrewKind::Science), EntityId(9), 1.0, policy)
    }

    #[test]
    fn idle_button_is_pressable_and_not_active() {
        let button = button(CooloffPolicy::KeepRunning);
        assert!(button.is_pressable());
        assert!(!button.is_active());
        assert_eq!(button.timer.elapsed(), None);
    }

    #[test]
    fn keep_running_counts_past_the_window() {
        let mut button = button(CooloffPolicy::KeepRunning);
        button.press();
        assert!(!button.is_pressable());
        assert!(!button.advance(0.5));
        assert!(button.advance(0.6), "window elapsed, pressability flips");
        assert!(button.is_pressable());
        button.advance(5.0);
        let elapsed = button.timer.elapsed().expect("still running");
        assert!((elapsed - 6.1).abs() < 1e-5, "elapsed {elapsed}");
    }

    #[test]
    fn reset_to_idle_returns_to_sentinel() {
        let mut button = button(CooloffPolicy::ResetToIdle);
        button.press();
        button.advance(0.4);
        assert_eq!(button.timer, Cooloff::Running(0.4));
        button.advance(0.6);
        assert_eq!(button.timer, Cooloff::Idle);
        assert!(button.is_pressable());
    }

    #[test]
    fn latched_button_never_rearms() {
        let mut button = button(CooloffPolicy::Latched);
        button.press();
        button.advance(100.0);
        assert!(!button.is_active());
        assert!(!button.is_pressable());
    }

    #[test]
    fn idle_timer_does_not_advance() {
        let mut timer = Cooloff::Idle;
        timer.advance(1.0, 1.0, CooloffPolicy::KeepRunning);
        assert_eq!(timer, Cooloff::Idle);
    }

    #[test]
    fn enqueue_starts_spawner_timer() {
        let mut spawner = Spawner::new(1.0, CooloffPolicy::KeepRunning);
        spawner.enqueue(SpawnEvent::Crew(CrewKind::Security));
        assert_eq!(spawner.pending.len(), 1);
        assert!(spawner.is_active());
    }
}
