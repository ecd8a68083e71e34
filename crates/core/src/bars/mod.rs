use crate::{timeline::NoteEvent, GeneratorError, Result};

/// Fractions this close to the next integer are rounded up.
const SOFT_FLOOR_TOLERANCE: f32 = 0.999;
/// Notes closer than this to the end of a bar belong to the next one.
const BAR_END_MARGIN: f32 = 0.001;

/// Floors `value`, rounding up when it sits within 0.001 of the next integer
/// to absorb floating point jitter at bar edges.
pub fn soft_floor(value: f32) -> i32 {
    let whole = value.trunc();
    if value - whole >= SOFT_FLOOR_TOLERANCE {
        whole as i32 + 1
    } else {
        whole as i32
    }
}

/// Picks the power-of-two multiple of one beat that lands between 75% and
/// 150% of the preferred bar duration.
pub fn bar_length(bpm: f32, preferred: f32) -> Result<f32> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(GeneratorError::InvalidTempo(bpm));
    }
    if !preferred.is_finite() || preferred <= 0.0 {
        return Err(GeneratorError::config(format!(
            "preferred bar duration must be positive, got {preferred}"
        )));
    }

    let mut length = 60.0 / bpm;
    while length >= preferred * 1.5 {
        length /= 2.0;
    }
    while length < preferred * 0.75 {
        length *= 2.0;
    }
    Ok(length)
}

/// Number of equal pieces a bar with `note_count` directional notes is split
/// into. Zero means the bar is too dense to rotate at all.
pub fn bar_divider(note_count: usize) -> usize {
    match note_count {
        0..=7 => 8,
        8..=25 => 4,
        26..=37 => 2,
        38..=57 => 1,
        _ => 0,
    }
}

/// One bar holding at least one directional note.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Start relative to the first note of the song.
    pub offset: f32,
    /// Absolute start time.
    pub start: f32,
    /// Indices of the directional notes inside the bar.
    pub notes: Vec<usize>,
    /// Index of the first note (of any kind) after the bar.
    pub next_note: Option<usize>,
}

/// One piece of a subdivided bar, the unit a rotation decision is made for.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    /// Absolute start time.
    pub start: f32,
    pub length: f32,
    /// Indices of the directional notes in the segment, never empty.
    pub notes: Vec<usize>,
    /// Index of the note following the segment anywhere in the song.
    pub next_note: Option<usize>,
}

/// Partitions a sorted note list into bars anchored at the first note.
#[derive(Debug, Clone)]
pub struct BarSegmenter<'a> {
    notes: &'a [NoteEvent],
    first_note_time: f32,
    bar_length: f32,
}

impl<'a> BarSegmenter<'a> {
    pub fn new(notes: &'a [NoteEvent], bpm: f32, preferred_bar_duration: f32) -> Result<Self> {
        let first = notes.first().ok_or(GeneratorError::NoNotes)?;
        let bar_length = bar_length(bpm, preferred_bar_duration)?;
        Ok(Self {
            notes,
            first_note_time: first.time,
            bar_length,
        })
    }

    /// Iterates the bars that hold at least one directional note.
    pub fn bars(&self) -> Bars<'a> {
        Bars {
            notes: self.notes,
            first_note_time: self.first_note_time,
            bar_length: self.bar_length,
            cursor: 0,
        }
    }

    pub fn bar_length(&self) -> f32 {
        self.bar_length
    }

    pub fn first_note_time(&self) -> f32 {
        self.first_note_time
    }

    /// Splits `bar` into `divider` pieces and returns the non-empty ones.
    pub fn segments(&self, bar: &Bar, divider: usize) -> Vec<Segment> {
        let mut segments = Vec::new();
        if divider == 0 {
            return segments;
        }

        let length = self.bar_length / divider as f32;
        let mut k = 0;
        for j in 0..divider {
            if k >= bar.notes.len() {
                break;
            }

            let mut notes = Vec::new();
            while let Some(&index) = bar.notes.get(k) {
                let position = (self.notes[index].time - self.first_note_time - bar.offset) / length;
                if soft_floor(position) != j as i32 {
                    break;
                }
                notes.push(index);
                k += 1;
            }

            if notes.is_empty() {
                continue;
            }

            segments.push(Segment {
                index: j,
                start: bar.start + j as f32 * length,
                length,
                notes,
                next_note: bar.notes.get(k).copied().or(bar.next_note),
            });
        }
        segments
    }
}

/// Iterator over the bars of a [`BarSegmenter`].
#[derive(Debug, Clone)]
pub struct Bars<'a> {
    notes: &'a [NoteEvent],
    first_note_time: f32,
    bar_length: f32,
    cursor: usize,
}

impl Iterator for Bars<'_> {
    type Item = Bar;

    fn next(&mut self) -> Option<Bar> {
        while self.cursor < self.notes.len() {
            let relative = self.notes[self.cursor].time - self.first_note_time;
            let index = soft_floor(relative / self.bar_length);
            let offset = index as f32 * self.bar_length;
            let end = offset + self.bar_length - BAR_END_MARGIN;

            // Bars shorter than a second end before soft_floor rounds up, so
            // notes in between still belong to this bar.
            let mut notes = Vec::new();
            while let Some(note) = self.notes.get(self.cursor) {
                let relative = note.time - self.first_note_time;
                if relative >= end && soft_floor(relative / self.bar_length) > index {
                    break;
                }
                if !note.is_bomb() {
                    notes.push(self.cursor);
                }
                self.cursor += 1;
            }

            if notes.is_empty() {
                continue;
            }

            let next_note = (self.cursor < self.notes.len()).then_some(self.cursor);
            return Some(Bar {
                offset,
                start: self.first_note_time + offset,
                notes,
                next_note,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{CutDirection, NoteColor, NoteLayer};

    fn note(time: f32, direction: CutDirection) -> NoteEvent {
        NoteEvent {
            time,
            lane: 1,
            layer: NoteLayer::Bottom,
            direction,
            color: NoteColor::Red,
        }
    }

    #[test]
    fn soft_floor_absorbs_jitter() {
        assert_eq!(soft_floor(2.0), 2);
        assert_eq!(soft_floor(2.5), 2);
        assert_eq!(soft_floor(2.9995), 3);
        assert_eq!(soft_floor(-0.0005), 0);
    }

    #[test]
    fn bar_length_doubles_into_preferred_band() {
        let length = bar_length(120.0, 1.84).unwrap();
        assert!((length - 2.0).abs() < 1e-6);
    }

    #[test]
    fn bar_length_halves_slow_tempos() {
        // 20 bpm is a 3s beat, halved once to 1.5s.
        let length = bar_length(20.0, 1.84).unwrap();
        assert!((length - 1.5).abs() < 1e-6);
    }

    #[test]
    fn rejects_degenerate_tempo() {
        assert!(matches!(
            bar_length(0.0, 1.84),
            Err(GeneratorError::InvalidTempo(_))
        ));
        assert!(matches!(
            bar_length(-90.0, 1.84),
            Err(GeneratorError::InvalidTempo(_))
        ));
    }

    #[test]
    fn divider_follows_note_density() {
        assert_eq!(bar_divider(1), 8);
        assert_eq!(bar_divider(7), 8);
        assert_eq!(bar_divider(8), 4);
        assert_eq!(bar_divider(25), 4);
        assert_eq!(bar_divider(26), 2);
        assert_eq!(bar_divider(38), 1);
        assert_eq!(bar_divider(57), 1);
        assert_eq!(bar_divider(58), 0);
    }

    #[test]
    fn empty_notes_are_rejected() {
        assert!(matches!(
            BarSegmenter::new(&[], 120.0, 1.84),
            Err(GeneratorError::NoNotes)
        ));
    }

    #[test]
    fn bars_are_anchored_at_first_note_and_skip_bomb_only_bars() {
        let notes = vec![
            note(5.0, CutDirection::Left),
            note(6.5, CutDirection::Right),
            note(7.2, CutDirection::None),
            note(9.1, CutDirection::Down),
        ];
        let bars: Vec<_> = BarSegmenter::new(&notes, 120.0, 1.84).unwrap().bars().collect();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].notes, vec![0, 1]);
        assert!((bars[0].start - 5.0).abs() < 1e-6);
        assert_eq!(bars[0].next_note, Some(2));
        assert_eq!(bars[1].notes, vec![3]);
        assert!((bars[1].start - 9.0).abs() < 1e-6);
        assert_eq!(bars[1].next_note, None);
    }

    #[test]
    fn short_bars_keep_notes_just_before_their_end() {
        // 0.5s bars: 0.4993 is past the end margin but not yet rounded up.
        let notes = vec![
            note(0.0, CutDirection::Left),
            note(0.4993, CutDirection::Right),
            note(1.2, CutDirection::Down),
        ];
        let segmenter = BarSegmenter::new(&notes, 120.0, 0.6).unwrap();
        assert!((segmenter.bar_length() - 0.5).abs() < 1e-6);

        let bars: Vec<_> = segmenter.bars().collect();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].notes, vec![0, 1]);
        assert_eq!(bars[0].next_note, Some(2));
        assert_eq!(bars[1].notes, vec![2]);
        assert!((bars[1].offset - 1.0).abs() < 1e-6);
    }

    #[test]
    fn segments_group_notes_by_piece() {
        let notes = vec![
            note(0.0, CutDirection::Left),
            note(0.1, CutDirection::Left),
            note(1.1, CutDirection::Right),
            note(2.5, CutDirection::Up),
        ];
        let segmenter = BarSegmenter::new(&notes, 120.0, 1.84).unwrap();
        let bar = segmenter.bars().next().unwrap();
        let segments = segmenter.segments(&bar, bar_divider(bar.notes.len()));

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].index, 0);
        assert_eq!(segments[0].notes, vec![0, 1]);
        assert_eq!(segments[0].next_note, Some(2));
        assert_eq!(segments[1].index, 4);
        assert!((segments[1].start - 1.0).abs() < 1e-6);
        assert_eq!(segments[1].next_note, Some(3));
    }
}
