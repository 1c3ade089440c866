use serde::Deserialize;

use super::{Body, Direction, EntityId};
use crate::index::Identified;
use crate::input::ActionSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    #[default]
    Stand,
    Run,
    Skid,
    Jump,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationState {
    pub direction: Direction,
    pub kind: AnimationKind,
    pub time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewKind {
    Engineering,
    Science,
    Security,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carrier {
    pub carrying: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interactor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carriable {
    pub carried_by: Option<EntityId>,
}

/// Wandering state: the last chosen micro-intent and the seconds left before
/// choosing again.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AiState {
    pub pending: ActionSet,
    pub next_think: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerRole {
    pub carrier: Carrier,
    pub interactor: Interactor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrewRole {
    pub kind: CrewKind,
    pub carriable: Carriable,
    pub ai: AiState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Character<R> {
    pub id: EntityId,
    pub body: Body,
    pub animation: AnimationState,
    pub intent: ActionSet,
    pub role: R,
}

pub type Player = Character<PlayerRole>;
pub type CrewMember = Character<CrewRole>;

impl<R> Identified for Character<R> {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Player {
    pub fn new(id: EntityId, body: Body) -> Self {
        Self {
            id,
            body,
            animation: AnimationState::default(),
            intent: ActionSet::empty(),
            role: PlayerRole::default(),
        }
    }
}

impl CrewMember {
    pub fn new(id: EntityId, kind: CrewKind, body: Body, ai: AiState) -> Self {
        Self {
            id,
            body,
            animation: AnimationState::default(),
            intent: ActionSet::empty(),
            role: CrewRole {
                kind,
                carriable: Carriable::default(),
                ai,
            },
        }
    }

    pub fn is_carried(&self) -> bool {
        self.role.carriable.carried_by.is_some()
    }
}

/// Borrowed view over either character kind.
#[derive(Debug, Clone, Copy)]
pub enum CharacterRef<'a> {
    Crew(&'a CrewMember),
    Player(&'a Player),
}

impl<'a> CharacterRef<'a> {
    pub fn id(self) -> EntityId {
        match self {
            Self::Crew(crew) => crew.id,
            Self::Player(player) => player.id,
        }
    }

    pub fn body(self) -> &'a Body {
        match self {
            Self::Crew(crew) => &crew.body,
            Self::Player(player) => &player.body,
        }
    }

    pub fn animation(self) -> &'a AnimationState {
        match self {
            Self::Crew(crew) => &crew.animation,
            Self::Player(player) => &player.animation,
        }
    }
}
