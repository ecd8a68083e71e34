use crate::{
    config::GenerationConfig,
    timeline::{NoteEvent, NoteLayer, ObstacleHeight, ObstacleInterval},
};

/// Stable handle to an obstacle in an [`ObstacleStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleId(usize);

/// Owns every obstacle of a level while it is being reworked. Removed
/// obstacles leave an empty slot so ids stay valid.
#[derive(Debug, Clone, Default)]
pub struct ObstacleStore {
    slots: Vec<Option<ObstacleInterval>>,
}

impl ObstacleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, obstacle: ObstacleInterval) -> ObstacleId {
        self.slots.push(Some(obstacle));
        ObstacleId(self.slots.len() - 1)
    }

    pub fn get(&self, id: ObstacleId) -> Option<&ObstacleInterval> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ObstacleId) -> Option<&mut ObstacleInterval> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn remove(&mut self, id: ObstacleId) -> Option<ObstacleInterval> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    /// Ids of all live obstacles in insertion order.
    pub fn ids(&self) -> Vec<ObstacleId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| ObstacleId(index))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the store, returning live obstacles sorted by start time.
    pub fn into_sorted(self) -> Vec<ObstacleInterval> {
        let mut obstacles: Vec<_> = self.slots.into_iter().flatten().collect();
        obstacles.sort_by(|a, b| a.time.total_cmp(&b.time));
        obstacles
    }
}

impl FromIterator<ObstacleInterval> for ObstacleStore {
    fn from_iter<I: IntoIterator<Item = ObstacleInterval>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(Some).collect(),
        }
    }
}

/// Time window of a segment a filler wall may be placed in.
#[derive(Debug, Clone)]
pub struct WallWindow<'a> {
    pub start: f32,
    pub length: f32,
    /// Notes left in the segment after filtering.
    pub notes: Vec<&'a NoteEvent>,
    pub next: &'a NoteEvent,
}

/// Builds filler walls in the outer lanes of `window`. `existing` are the
/// obstacles authored in the base level; any overlap with them suppresses
/// generation.
pub fn generate_walls(
    window: &WallWindow<'_>,
    existing: &[ObstacleInterval],
    config: &GenerationConfig,
) -> Vec<ObstacleInterval> {
    let end = window.start + window.length;
    if existing
        .iter()
        .any(|wall| wall.end() >= window.start && wall.time < end)
    {
        return Vec::new();
    }

    let occupied = |lane: u8| window.notes.iter().any(|note| note.lane == lane);

    // (candidate lane, neighbouring inner lane)
    [(0, 1), (3, 2)]
        .into_iter()
        .filter(|&(lane, _)| !occupied(lane))
        .filter_map(|(lane, inner)| {
            let height = if occupied(inner) {
                ObstacleHeight::TopOnly
            } else {
                ObstacleHeight::Full
            };

            let mut duration = window.length;
            let ducks_under =
                height == ObstacleHeight::TopOnly && window.next.layer == NoteLayer::Bottom;
            if window.next.lane == lane && !ducks_under {
                duration = window.next.time - config.wall_back_cut - window.start;
            }

            // A wall stretched up to the next note must not run into an
            // authored wall past the segment.
            if duration > window.length
                && existing
                    .iter()
                    .any(|wall| wall.end() >= window.start && wall.time < window.start + duration)
            {
                return None;
            }

            (duration > config.min_wall_duration).then(|| ObstacleInterval {
                time: window.start,
                duration,
                lane,
                layer: match height {
                    ObstacleHeight::TopOnly => NoteLayer::Top,
                    ObstacleHeight::Full => NoteLayer::Bottom,
                },
                width: 1,
                height,
                custom: false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{CutDirection, NoteColor};

    fn note(time: f32, lane: u8, layer: NoteLayer) -> NoteEvent {
        NoteEvent {
            time,
            lane,
            layer,
            direction: CutDirection::Down,
            color: NoteColor::Blue,
        }
    }

    fn wall(time: f32, duration: f32, lane: u8) -> ObstacleInterval {
        ObstacleInterval {
            time,
            duration,
            lane,
            layer: NoteLayer::Bottom,
            width: 1,
            height: ObstacleHeight::Full,
            custom: false,
        }
    }

    #[test]
    fn store_keeps_ids_stable_across_removal() {
        let mut store: ObstacleStore = vec![wall(2.0, 1.0, 0), wall(1.0, 1.0, 3)]
            .into_iter()
            .collect();
        let ids = store.ids();
        let extra = store.insert(wall(0.5, 0.2, 0));

        assert!(store.remove(ids[0]).is_some());
        assert!(store.get(ids[0]).is_none());
        assert_eq!(store.get(extra).unwrap().time, 0.5);
        assert_eq!(store.len(), 2);

        let sorted = store.into_sorted();
        assert_eq!(sorted[0].time, 0.5);
        assert_eq!(sorted[1].time, 1.0);
    }

    #[test]
    fn fills_both_outer_lanes_when_free() {
        let a = note(1.0, 1, NoteLayer::Bottom);
        let next = note(2.0, 2, NoteLayer::Bottom);
        let window = WallWindow {
            start: 0.75,
            length: 0.5,
            notes: vec![&a],
            next: &next,
        };

        let walls = generate_walls(&window, &[], &GenerationConfig::default());
        assert_eq!(walls.len(), 2);
        assert_eq!(walls[0].lane, 0);
        assert_eq!(walls[0].height, ObstacleHeight::TopOnly);
        assert_eq!(walls[0].layer, NoteLayer::Top);
        assert_eq!(walls[1].lane, 3);
        assert_eq!(walls[1].height, ObstacleHeight::Full);
        assert!((walls[1].duration - 0.5).abs() < 1e-6);
    }

    #[test]
    fn skips_occupied_lanes_and_existing_walls() {
        let a = note(1.0, 0, NoteLayer::Bottom);
        let next = note(2.0, 2, NoteLayer::Bottom);
        let window = WallWindow {
            start: 0.75,
            length: 0.5,
            notes: vec![&a],
            next: &next,
        };
        let config = GenerationConfig::default();

        let walls = generate_walls(&window, &[], &config);
        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].lane, 3);

        assert!(generate_walls(&window, &[wall(1.0, 0.1, 1)], &config).is_empty());
    }

    #[test]
    fn stretched_wall_stops_short_of_authored_walls() {
        let a = note(1.0, 1, NoteLayer::Bottom);
        let next = note(3.0, 3, NoteLayer::Middle);
        let window = WallWindow {
            start: 1.0,
            length: 0.25,
            notes: vec![&a],
            next: &next,
        };

        let walls = generate_walls(&window, &[wall(2.0, 0.5, 3)], &GenerationConfig::default());
        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].lane, 0);
    }

    #[test]
    fn shortens_wall_before_next_note_in_lane() {
        let a = note(1.0, 1, NoteLayer::Bottom);
        let next = note(1.8, 3, NoteLayer::Middle);
        let window = WallWindow {
            start: 1.0,
            length: 1.0,
            notes: vec![&a],
            next: &next,
        };

        let walls = generate_walls(&window, &[], &GenerationConfig::default());
        let right = walls.iter().find(|w| w.lane == 3).unwrap();
        assert!((right.duration - 0.35).abs() < 1e-5);

        let tight = note(1.5, 3, NoteLayer::Middle);
        let window = WallWindow {
            next: &tight,
            ..window
        };
        let walls = generate_walls(&window, &[], &GenerationConfig::default());
        assert!(walls.iter().all(|w| w.lane != 3));
    }
}
