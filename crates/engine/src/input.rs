use serde::Deserialize;

/// Abstract per-tick action attributed to a character, whether it comes from
/// live input or from AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Left,
    Right,
    SlowLeft,
    SlowRight,
    Up,
    Jump,
    Act,
}

const ACTION_COUNT: usize = 7;

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Left,
        Action::Right,
        Action::SlowLeft,
        Action::SlowRight,
        Action::Up,
        Action::Jump,
        Action::Act,
    ];

    const fn index(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Right => 1,
            Action::SlowLeft => 2,
            Action::SlowRight => 3,
            Action::Up => 4,
            Action::Jump => 5,
            Action::Act => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTier {
    Fast,
    Slow,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet {
    down: [bool; ACTION_COUNT],
}

impl ActionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, action: Action) -> Self {
        self.insert(action);
        self
    }

    pub fn insert(&mut self, action: Action) {
        self.down[action.index()] = true;
    }

    /// Returns whether the action was present.
    pub fn remove(&mut self, action: Action) -> bool {
        std::mem::replace(&mut self.down[action.index()], false)
    }

    pub fn contains(&self, action: Action) -> bool {
        self.down[action.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.down.iter().any(|down| *down)
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL
            .into_iter()
            .filter(|action| self.contains(*action))
    }

    pub fn wants_left(&self) -> bool {
        self.contains(Action::Left) || self.contains(Action::SlowLeft)
    }

    pub fn wants_right(&self) -> bool {
        self.contains(Action::Right) || self.contains(Action::SlowRight)
    }

    /// True when both speed tiers of one side are held.
    pub fn has_conflicting_tiers(&self) -> bool {
        (self.contains(Action::Left) && self.contains(Action::SlowLeft))
            || (self.contains(Action::Right) && self.contains(Action::SlowRight))
    }

    /// Horizontal heading and speed tier, or `None` when there is no heading
    /// or left and right cancel out. Callers reject conflicting tiers first;
    /// if both are held the fast tier wins.
    pub fn horizontal(&self) -> Option<(f32, SpeedTier)> {
        match (self.wants_left(), self.wants_right()) {
            (true, false) => {
                let tier = if self.contains(Action::Left) {
                    SpeedTier::Fast
                } else {
                    SpeedTier::Slow
                };
                Some((-1.0, tier))
            }
            (false, true) => {
                let tier = if self.contains(Action::Right) {
                    SpeedTier::Fast
                } else {
                    SpeedTier::Slow
                };
                Some((1.0, tier))
            }
            _ => None,
        }
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = Self::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}
