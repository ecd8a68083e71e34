use crate::{
    config::GenerationConfig,
    rotation::{left_right_counts, GeneratorState},
    timeline::{NoteEvent, RotationTiming, Timeline},
};

/// One spin is a full turn: 24 steps of 15 degrees.
pub const SPIN_STEPS: usize = 24;
/// Notes this close together count as simultaneous.
const SIMULTANEOUS_WINDOW: f32 = 0.001;

/// Returns whether a bar at `bar_offset` holding `notes` should spin.
pub fn should_spin(
    notes: &[&NoteEvent],
    bar_offset: f32,
    state: &GeneratorState,
    config: &GenerationConfig,
) -> bool {
    if !config.enable_spin || notes.len() < 2 {
        return false;
    }

    // No cooldown before the first spin, even in the song's first seconds.
    let cooled_down = state
        .previous_spin_time
        .map(|previous| bar_offset - previous > config.spin_cooldown)
        .unwrap_or(true);
    if !cooled_down {
        return false;
    }

    let first = notes[0].time;
    notes
        .iter()
        .all(|note| (note.time - first).abs() < SIMULTANEOUS_WINDOW)
}

/// Spin direction: where most notes point, otherwise the previous direction.
pub fn spin_direction(notes: &[&NoteEvent], state: &GeneratorState) -> i32 {
    let (left, right) = left_right_counts(notes.iter().copied());
    if left > right {
        -1
    } else if right > left {
        1
    } else if state.previous_direction {
        1
    } else {
        -1
    }
}

/// Emits a full turn starting at `start`, spread over the configured spin
/// time. The turn is exempt from the rotation limit.
pub fn emit_spin(
    timeline: &mut Timeline,
    state: &mut GeneratorState,
    notes: &[&NoteEvent],
    start: f32,
    bar_offset: f32,
    config: &GenerationConfig,
) {
    let direction = spin_direction(notes, state);
    tracing::info!(time = start, direction, "spin effect");

    let step = config.total_spin_time / SPIN_STEPS as f32;
    for s in 0..SPIN_STEPS {
        state.rotate_unbounded(
            timeline,
            start + step * s as f32,
            direction,
            RotationTiming::Early,
        );
    }
    state.previous_spin_time = Some(bar_offset);
}
