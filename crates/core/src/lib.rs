//! Core library for the Threesixty level generator.
//!
//! Takes the notes and walls of a standard level and produces a rotating
//! "360 degree" or "90 degree" variant: the song is split into bars, each bar
//! into segments, and every segment may turn the player's view left or right
//! depending on where its last notes point. Walls and bombs that end up in
//! the path of a rotation are cut afterwards.

pub mod bars;
pub mod beatmap;
pub mod config;
pub mod cutter;
pub mod error;
pub mod filter;
pub mod generator;
pub mod obstacles;
pub mod rotation;
pub mod spin;
pub mod timeline;

pub use bars::{bar_divider, bar_length, soft_floor, Bar, BarSegmenter, Segment};
pub use beatmap::BeatmapDocument;
pub use config::{
    AppConfig, ConfigSource, GenerationConfig, Handedness, JsonConfigFile, LevelConfig,
    RotationLimits, RotationMode,
};
pub use cutter::{cut_obstacles, CutSettings};
pub use error::{GeneratorError, Result};
pub use filter::{remove_bombs, single_color, NoteSet};
pub use generator::{generate, generate_levels};
pub use obstacles::{generate_walls, ObstacleId, ObstacleStore, WallWindow};
pub use rotation::{CutMoment, GeneratorState};
pub use timeline::{
    CutDirection, NoteColor, NoteEvent, NoteLayer, ObstacleHeight, ObstacleInterval,
    RotationEvent, RotationTiming, Timeline, TimelineSink, TimelineSource,
};
