use crate::{
    config::RotationLimits,
    timeline::{NoteEvent, RotationEvent, RotationTiming, Timeline},
};

/// Largest rotation a single event may carry, in units.
pub const MAX_UNITS_PER_EVENT: i32 = 4;
/// Notes this close to the last note of a segment count as "last notes".
const LAST_NOTE_WINDOW: f32 = 0.005;

/// A rotation that obstacles and bombs have to be cut around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutMoment {
    pub time: f32,
    pub units: i32,
}

/// Running state of one generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorState {
    pub total_rotation: i32,
    /// `true` when the last rotation went right.
    pub previous_direction: bool,
    /// Bar offset of the last spin, if any.
    pub previous_spin_time: Option<f32>,
    pub event_count: usize,
    pub cut_moments: Vec<CutMoment>,
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self {
            total_rotation: 0,
            previous_direction: true,
            previous_spin_time: None,
            event_count: 0,
            cut_moments: Vec::new(),
        }
    }
}

impl GeneratorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamps `units` against the limit and records the rotation. Returns the
    /// units actually emitted, or `None` when the rotation was dropped.
    pub fn rotate(
        &mut self,
        timeline: &mut Timeline,
        time: f32,
        units: i32,
        timing: RotationTiming,
        limit: i32,
    ) -> Option<i32> {
        let mut units = units.clamp(-MAX_UNITS_PER_EVENT, MAX_UNITS_PER_EVENT);
        if self.total_rotation + units > limit {
            units = units.min((limit - self.total_rotation).max(0));
        } else if self.total_rotation + units < -limit {
            units = units.max((-(limit + self.total_rotation)).min(0));
        }
        if units == 0 {
            return None;
        }

        self.total_rotation += units;
        self.cut_moments.push(CutMoment { time, units });
        self.emit(timeline, time, units, timing);
        Some(units)
    }

    /// Emits a rotation that bypasses the limit and leaves no cut moment.
    pub fn rotate_unbounded(
        &mut self,
        timeline: &mut Timeline,
        time: f32,
        units: i32,
        timing: RotationTiming,
    ) -> Option<i32> {
        let units = units.clamp(-MAX_UNITS_PER_EVENT, MAX_UNITS_PER_EVENT);
        if units == 0 {
            return None;
        }
        self.emit(timeline, time, units, timing);
        Some(units)
    }

    fn emit(&mut self, timeline: &mut Timeline, time: f32, units: i32, timing: RotationTiming) {
        self.previous_direction = units > 0;
        self.event_count += 1;
        timeline.insert_rotation(RotationEvent {
            time,
            units,
            timing,
        });
    }
}

/// Number of notes pointing left and right.
pub fn left_right_counts<'a>(notes: impl IntoIterator<Item = &'a NoteEvent>) -> (usize, usize) {
    notes
        .into_iter()
        .fold((0, 0), |(left, right), note| {
            if note.direction.points_left() {
                (left + 1, right)
            } else if note.direction.points_right() {
                (left, right + 1)
            } else {
                (left, right)
            }
        })
}

/// Inputs of a single segment decision.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentNotes<'a> {
    pub notes: Vec<&'a NoteEvent>,
    pub next: Option<&'a NoteEvent>,
}

/// Outcome of a segment decision before the limit clamp is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub time: f32,
    pub units: i32,
    pub left: usize,
    pub right: usize,
    pub last_notes: usize,
}

/// Decides direction and magnitude for one segment. `segment.notes` must be
/// non-empty and sorted by time.
pub fn decide(
    segment: &SegmentNotes<'_>,
    state: &GeneratorState,
    limits: RotationLimits,
    bar_length: f32,
) -> Option<Decision> {
    let last_time = segment.notes.last()?.time;
    let last_notes: Vec<&NoteEvent> = segment
        .notes
        .iter()
        .copied()
        .filter(|note| (note.time - last_time).abs() < LAST_NOTE_WINDOW)
        .collect();
    let (left, right) = left_right_counts(last_notes.iter().copied());

    let magnitude = match segment.next {
        Some(next) if next.time - last_time >= bar_length => 3,
        Some(next) if next.time - last_time >= bar_length / 8.0 => 2,
        _ => 1,
    };

    let total = state.total_rotation;
    let mut units = if left > right {
        -magnitude
    } else if right > left {
        magnitude
    } else if total >= limits.bottleneck {
        -magnitude
    } else if total <= -limits.bottleneck {
        magnitude
    } else if state.previous_direction {
        magnitude
    } else {
        -magnitude
    };

    // Only single steps further into a reached bottleneck.
    if total >= limits.bottleneck && units > 1 {
        units = 1;
    } else if total <= -limits.bottleneck && units < -1 {
        units = -1;
    }

    // Turn back one unit before the limit.
    if total >= limits.limit - 1 && units > 0 {
        units = -units;
    } else if total <= -limits.limit + 1 && units < 0 {
        units = -units;
    }

    Some(Decision {
        time: last_time,
        units,
        left,
        right,
        last_notes: last_notes.len(),
    })
}
