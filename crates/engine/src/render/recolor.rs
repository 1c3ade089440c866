use sha2::{Digest, Sha256};

use super::{ColorTag, RecolorSpec};
use crate::model::{CrewKind, EntityId};

/// Stable per-entity palette variant: the first four bytes of the SHA-256 of
/// the id.
pub fn recolor_variant(id: EntityId) -> u32 {
    let digest = Sha256::digest(id.0.to_le_bytes());
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

pub fn crew_recolor(id: EntityId, kind: CrewKind) -> RecolorSpec {
    RecolorSpec {
        base: ColorTag::Crew(kind),
        variant: recolor_variant(id),
    }
}
