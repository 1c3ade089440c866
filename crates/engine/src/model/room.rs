use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    Bridge,
    Engine,
    Store,
}

/// One slot of the room ring. Its kind only selects colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub kind: RoomKind,
}
