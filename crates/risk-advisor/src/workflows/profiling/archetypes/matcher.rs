use tracing::{debug, warn};

use super::{ArchetypeDirectory, RiskArchetype};

/// First band containing `score`, or `None` when the score sits outside every band.
///
/// `None` is a valid outcome: the caller has to surface an unmatched profile instead of
/// falling back to some default archetype.
pub fn match_archetype(directory: &ArchetypeDirectory, score: f64) -> Option<&RiskArchetype> {
    let matched = directory
        .archetypes()
        .iter()
        .find(|archetype| archetype.contains(score));

    match matched {
        Some(archetype) => debug!(score, archetype = %archetype.id, "risk score matched"),
        None => {
            let (lowest, highest) = directory.score_range();
            warn!(score, lowest, highest, "risk score outside every archetype band");
        }
    }

    matched
}
