use crate::{
    config::Handedness,
    rotation::CutMoment,
    timeline::{NoteColor, NoteEvent},
};

/// Notes of a level being reworked. Removal only marks a note so indices
/// handed out by the bar segmenter stay valid.
#[derive(Debug, Clone)]
pub struct NoteSet {
    notes: Vec<NoteEvent>,
    removed: Vec<bool>,
}

impl NoteSet {
    pub fn new(notes: Vec<NoteEvent>) -> Self {
        let removed = vec![false; notes.len()];
        Self { notes, removed }
    }

    /// All notes, including removed ones.
    pub fn all(&self) -> &[NoteEvent] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> &NoteEvent {
        &self.notes[index]
    }

    pub fn is_removed(&self, index: usize) -> bool {
        self.removed[index]
    }

    pub fn remove(&mut self, index: usize) {
        self.removed[index] = true;
    }

    pub fn mirror(&mut self, index: usize) {
        self.notes[index].mirror();
    }

    /// Consumes the set, keeping the surviving notes in their original order.
    pub fn into_notes(self) -> Vec<NoteEvent> {
        self.notes
            .into_iter()
            .zip(self.removed)
            .filter_map(|(note, removed)| (!removed).then_some(note))
            .collect()
    }
}

/// Keeps one saber color in a segment rotating by `units`: the color on the
/// side rotated away from is dropped and the off-hand color is mirrored onto
/// the dominant hand.
pub fn single_color(notes: &mut NoteSet, segment: &[usize], units: i32, handedness: Handedness) {
    let dropped = if units > 0 {
        NoteColor::Red
    } else {
        NoteColor::Blue
    };
    let off_hand = match handedness {
        Handedness::Right => NoteColor::Red,
        Handedness::Left => NoteColor::Blue,
    };

    for &index in segment {
        let color = notes.get(index).color;
        if color == dropped {
            notes.remove(index);
        } else if color == off_hand {
            notes.mirror(index);
        }
    }
}

/// Removes bombs sitting in the way of a rotation. Returns the number of
/// bombs removed.
pub fn remove_bombs(notes: &mut NoteSet, moments: &[CutMoment], front_cut: f32, back_cut: f32) -> usize {
    let mut removed = 0;
    for index in 0..notes.all().len() {
        let note = notes.get(index);
        if !note.is_bomb() || notes.is_removed(index) {
            continue;
        }

        let in_the_way = moments.iter().any(|moment| {
            note.time >= moment.time - front_cut
                && note.time < moment.time + back_cut
                && ((note.lane <= 2 && moment.units < 0) || (note.lane >= 1 && moment.units > 0))
        });
        if in_the_way {
            notes.remove(index);
            removed += 1;
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{CutDirection, NoteLayer};

    fn note(time: f32, lane: u8, direction: CutDirection, color: NoteColor) -> NoteEvent {
        NoteEvent {
            time,
            lane,
            layer: NoteLayer::Bottom,
            direction,
            color,
        }
    }

    fn bomb(time: f32, lane: u8) -> NoteEvent {
        note(time, lane, CutDirection::None, NoteColor::Red)
    }

    #[test]
    fn single_color_leaves_one_color() {
        let mut notes = NoteSet::new(vec![
            note(1.0, 0, CutDirection::Left, NoteColor::Red),
            note(1.0, 3, CutDirection::Right, NoteColor::Blue),
            note(2.0, 1, CutDirection::UpLeft, NoteColor::Red),
        ]);

        single_color(&mut notes, &[0, 1], -1, Handedness::Right);
        single_color(&mut notes, &[2], 1, Handedness::Right);

        let left = notes.into_notes();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].color, NoteColor::Blue);
        assert_eq!(left[0].lane, 3);
        assert_eq!(left[0].direction, CutDirection::Right);
    }

    #[test]
    fn left_handed_players_keep_red() {
        let mut notes = NoteSet::new(vec![
            note(1.0, 3, CutDirection::Right, NoteColor::Blue),
            note(1.0, 0, CutDirection::Left, NoteColor::Red),
        ]);

        single_color(&mut notes, &[0, 1], 1, Handedness::Left);

        let left = notes.into_notes();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].color, NoteColor::Red);
        assert_eq!(left[0].lane, 0);
        assert_eq!(left[0].direction, CutDirection::Left);
    }

    #[test]
    fn removes_bombs_on_the_rotated_side() {
        let mut notes = NoteSet::new(vec![
            bomb(1.9, 0),
            bomb(2.1, 3),
            bomb(2.3, 1),
            bomb(3.0, 0),
            note(2.0, 0, CutDirection::Down, NoteColor::Red),
        ]);
        let moments = [CutMoment { time: 2.0, units: -1 }];

        assert_eq!(remove_bombs(&mut notes, &moments, 0.2, 0.45), 2);

        let left: Vec<_> = notes.into_notes().iter().map(|n| (n.time, n.lane)).collect();
        assert_eq!(left, vec![(2.1, 3), (3.0, 0), (2.0, 0)]);
    }
}
