//! Read-only views of the cache for inspection

use std::fmt;

use mirage_sdk::GamePath;

use super::draw_object::DrawObjectData;
use super::handles::{ActorIdentifier, DrawObjectAddress, GameObjectAddress, ObjectIndex, ResourceHandle};
use super::identified::IdentifiedData;
use super::path::ResolveData;

/// Point-in-time copy of every index
///
/// Draw objects and cutscene actors are in insertion order, the other lists
/// are unordered.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    pub last_game_object: Option<ResolveData>,
    pub draw_objects: Vec<(DrawObjectAddress, DrawObjectData)>,
    pub paths: Vec<(GamePath, ResolveData)>,
    pub current_mtrl: Option<ResolveData>,
    pub current_avfx: Option<ResolveData>,
    pub resources: Vec<(ResourceHandle, ResolveData)>,
    pub identified: Vec<(GameObjectAddress, IdentifiedData)>,
    pub cutscene_actors: Vec<(ObjectIndex, ActorIdentifier)>,
}

impl CacheSnapshot {
    /// Total number of live entries across all indexes
    pub fn entry_count(&self) -> usize {
        self.draw_objects.len()
            + self.paths.len()
            + self.resources.len()
            + self.identified.len()
            + self.cutscene_actors.len()
    }
}

fn write_context(f: &mut fmt::Formatter<'_>, label: &str, data: &Option<ResolveData>) -> fmt::Result {
    match data {
        Some(data) => writeln!(f, "{}: {} ({})", label, data.collection, data.data),
        None => writeln!(f, "{}: None", label),
    }
}

impl fmt::Display for CacheSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_context(f, "Last Game Object", &self.last_game_object)?;

        writeln!(f, "Draw Objects ({})", self.draw_objects.len())?;
        for (addr, data) in &self.draw_objects {
            writeln!(f, "  {} -> {} (slot {})", addr, data.collection, data.data)?;
        }

        writeln!(f, "Paths ({})", self.paths.len())?;
        for (path, data) in &self.paths {
            writeln!(f, "  {} -> {} ({})", path, data.collection, data.data)?;
        }

        write_context(f, "Current Material", &self.current_mtrl)?;
        write_context(f, "Current AVFX", &self.current_avfx)?;

        writeln!(f, "Resources ({})", self.resources.len())?;
        for (handle, data) in &self.resources {
            writeln!(f, "  {} -> {} ({})", handle, data.collection, data.data)?;
        }

        writeln!(f, "Identified ({})", self.identified.len())?;
        for (addr, data) in &self.identified {
            writeln!(f, "  {} -> {} [{}]", addr, data.data, data.collection)?;
        }

        writeln!(f, "Cutscene Actors ({})", self.cutscene_actors.len())?;
        for (index, actor) in &self.cutscene_actors {
            writeln!(f, "  {} -> {}", index, actor)?;
        }
        Ok(())
    }
}

/// Entries removed by one compaction pass, per index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionReport {
    pub draw_objects: usize,
    pub paths: usize,
    pub resources: usize,
    pub identified: usize,
    pub last_game_object: bool,
}

impl CompactionReport {
    pub fn total(&self) -> usize {
        self.draw_objects
            + self.paths
            + self.resources
            + self.identified
            + usize::from(self.last_game_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{CollectionId, ModCollection, Resolved};

    #[test]
    fn test_display_lists_entries() {
        let a = ModCollection::new(CollectionId::new(1), "Default");
        let snapshot = CacheSnapshot {
            draw_objects: vec![(
                DrawObjectAddress::from_raw(0x20),
                Resolved {
                    collection: a.clone(),
                    data: ObjectIndex::new(4),
                },
            )],
            cutscene_actors: vec![(
                ObjectIndex::new(201),
                ActorIdentifier::Retainer {
                    name: "Mogmo".to_string(),
                },
            )],
            ..Default::default()
        };

        let text = snapshot.to_string();
        assert!(text.contains("Last Game Object: None"));
        assert!(text.contains("  0x20 -> Default (slot 4)"));
        assert!(text.contains("  201 -> Mogmo (Retainer)"));
        assert_eq!(snapshot.entry_count(), 2);
    }

    #[test]
    fn test_report_total() {
        let report = CompactionReport {
            draw_objects: 1,
            paths: 2,
            resources: 0,
            identified: 3,
            last_game_object: true,
        };
        assert_eq!(report.total(), 7);
        assert_eq!(CompactionReport::default().total(), 0);
    }
}
