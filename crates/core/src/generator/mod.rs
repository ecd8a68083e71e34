//! Single pass that turns a standard timeline into a rotating level.

use crate::{
    bars::{bar_divider, BarSegmenter},
    config::{AppConfig, GenerationConfig, Handedness, RotationMode},
    cutter::{cut_obstacles, CutSettings},
    filter::{remove_bombs, single_color, NoteSet},
    obstacles::{generate_walls, ObstacleStore, WallWindow},
    rotation::{decide, GeneratorState, SegmentNotes},
    spin::{emit_spin, should_spin},
    timeline::{NoteEvent, RotationTiming, Timeline, TimelineSink, TimelineSource},
    Result,
};

/// Generates the rotating variant of `base`. The input is left untouched;
/// the returned timeline holds the surviving notes, the reworked obstacles
/// and the new rotation events.
pub fn generate(
    base: &Timeline,
    bpm: f32,
    mode: RotationMode,
    handedness: Handedness,
    config: &GenerationConfig,
) -> Result<Timeline> {
    generate_with_state(base, bpm, mode, handedness, config).map(|(timeline, _)| timeline)
}

/// Same as [`generate`], also returning the rotation state left after the
/// last bar.
pub(crate) fn generate_with_state(
    base: &Timeline,
    bpm: f32,
    mode: RotationMode,
    handedness: Handedness,
    config: &GenerationConfig,
) -> Result<(Timeline, GeneratorState)> {
    config.validate()?;
    let segmenter = BarSegmenter::new(&base.notes, bpm, config.preferred_bar_duration)?;
    let bar_length = segmenter.bar_length();
    let limits = config.limits(mode);
    let generate_filler_walls = config.wall_generator && !base.contains_custom_obstacles();

    tracing::info!(
        bpm,
        beat_duration = 60.0 / bpm,
        bar_length,
        first_note_time = segmenter.first_note_time(),
        ?mode,
        "generator setup"
    );

    let mut output = Timeline {
        notes: Vec::new(),
        obstacles: Vec::new(),
        rotations: base.rotations.clone(),
    };
    let mut notes = NoteSet::new(base.notes.clone());
    let mut obstacles: ObstacleStore = base.obstacles.iter().cloned().collect();
    let mut state = GeneratorState::new();

    for bar in segmenter.bars() {
        let bar_notes: Vec<&NoteEvent> = bar.notes.iter().map(|&i| &base.notes[i]).collect();

        if should_spin(&bar_notes, bar.offset, &state, config) {
            emit_spin(&mut output, &mut state, &bar_notes, bar.start, bar.offset, config);
            continue;
        }

        let divider = bar_divider(bar.notes.len());
        let segments = segmenter.segments(&bar, divider);
        tracing::debug!(
            start = bar.start,
            notes = bar.notes.len(),
            divider,
            segments = segments.len(),
            "bar"
        );

        for segment in segments {
            let next = segment.next_note.map(|i| &base.notes[i]);
            let decision = decide(
                &SegmentNotes {
                    notes: segment.notes.iter().map(|&i| &base.notes[i]).collect(),
                    next,
                },
                &state,
                limits,
                bar_length,
            );
            let Some(decision) = decision else {
                continue;
            };

            let emitted = state.rotate(
                &mut output,
                decision.time,
                decision.units,
                RotationTiming::Late,
                limits.limit,
            );
            tracing::debug!(
                start = segment.start,
                rotation = decision.units,
                ?emitted,
                notes = segment.notes.len(),
                left = decision.left,
                right = decision.right,
                last_notes = decision.last_notes,
                next_note = ?next.map(|n| n.time),
                "segment"
            );

            if config.only_one_saber {
                single_color(&mut notes, &segment.notes, decision.units, handedness);
            }

            if let Some(next) = next.filter(|_| generate_filler_walls) {
                let window = WallWindow {
                    start: segment.start,
                    length: segment.length,
                    notes: segment
                        .notes
                        .iter()
                        .filter(|&&i| !notes.is_removed(i))
                        .map(|&i| notes.get(i))
                        .collect(),
                    next,
                };
                for wall in generate_walls(&window, &base.obstacles, config) {
                    obstacles.insert(wall);
                }
            }
        }
    }

    cut_obstacles(
        &mut obstacles,
        &state.cut_moments,
        CutSettings {
            front_cut: config.wall_front_cut,
            back_cut: config.wall_back_cut,
            min_duration: config.min_wall_duration,
        },
    );
    let bombs = remove_bombs(
        &mut notes,
        &state.cut_moments,
        config.wall_front_cut,
        config.wall_back_cut,
    );

    tracing::info!(
        events = state.event_count,
        total_rotation = state.total_rotation,
        bombs_removed = bombs,
        "emitted rotation events"
    );

    output.notes = notes.into_notes();
    output.obstacles = obstacles.into_sorted();
    Ok((output, state))
}

/// Generates one level per mode enabled in `config` from the configured base
/// characteristic and hands each to `sink`. Returns the installed modes.
pub fn generate_levels<S, K>(
    source: &S,
    sink: &mut K,
    config: &AppConfig,
    handedness: Handedness,
) -> Result<Vec<RotationMode>>
where
    S: TimelineSource + ?Sized,
    K: TimelineSink + ?Sized,
{
    let modes = config.levels.enabled_modes();
    if modes.is_empty() {
        return Ok(modes);
    }

    let base = source.base_timeline(&config.levels.based_on)?;
    for &mode in &modes {
        let level = generate(&base, source.bpm(), mode, handedness, &config.generator)?;
        tracing::info!(
            characteristic = mode.characteristic(),
            rotations = level.rotations.len(),
            "installing generated level"
        );
        sink.install(mode, level)?;
    }
    Ok(modes)
}
