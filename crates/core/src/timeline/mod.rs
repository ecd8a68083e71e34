use serde::{Deserialize, Serialize};

use crate::{config::RotationMode, Result};

/// Number of lanes in a standard beatmap.
pub const LANE_COUNT: u8 = 4;

/// Degrees of viewpoint rotation represented by one rotation unit.
pub const DEGREES_PER_UNIT: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteLayer {
    Bottom,
    Middle,
    Top,
}

/// Direction a note has to be cut in. `None` marks a bomb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutDirection {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Any,
    None,
}

impl CutDirection {
    pub fn is_bomb(self) -> bool {
        self == CutDirection::None
    }

    pub fn points_left(self) -> bool {
        matches!(
            self,
            CutDirection::Left | CutDirection::UpLeft | CutDirection::DownLeft
        )
    }

    pub fn points_right(self) -> bool {
        matches!(
            self,
            CutDirection::Right | CutDirection::UpRight | CutDirection::DownRight
        )
    }

    /// Reflects the direction across the vertical axis.
    pub fn mirrored(self) -> Self {
        match self {
            CutDirection::Left => CutDirection::Right,
            CutDirection::Right => CutDirection::Left,
            CutDirection::UpLeft => CutDirection::UpRight,
            CutDirection::UpRight => CutDirection::UpLeft,
            CutDirection::DownLeft => CutDirection::DownRight,
            CutDirection::DownRight => CutDirection::DownLeft,
            other => other,
        }
    }
}

/// Saber color a note belongs to. Red is held in the left hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteColor {
    Red,
    Blue,
}

impl NoteColor {
    pub fn opposite(self) -> Self {
        match self {
            NoteColor::Red => NoteColor::Blue,
            NoteColor::Blue => NoteColor::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub time: f32,
    pub lane: u8,
    pub layer: NoteLayer,
    pub direction: CutDirection,
    pub color: NoteColor,
}

impl NoteEvent {
    pub fn is_bomb(&self) -> bool {
        self.direction.is_bomb()
    }

    /// Mirrors the note onto the other hand: lane, direction and color flip.
    pub fn mirror(&mut self) {
        self.lane = (LANE_COUNT - 1).saturating_sub(self.lane);
        self.direction = self.direction.mirrored();
        self.color = self.color.opposite();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleHeight {
    Full,
    TopOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleInterval {
    pub time: f32,
    pub duration: f32,
    pub lane: u8,
    pub layer: NoteLayer,
    pub width: u8,
    pub height: ObstacleHeight,
    /// Set for obstacles placed at a custom-authored position.
    #[serde(default)]
    pub custom: bool,
}

impl ObstacleInterval {
    pub fn end(&self) -> f32 {
        self.time + self.duration
    }
}

/// Whether the rotation applies before or after notes spawning at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationTiming {
    Early,
    Late,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationEvent {
    pub time: f32,
    /// Signed rotation in units of [`DEGREES_PER_UNIT`].
    pub units: i32,
    pub timing: RotationTiming,
}

impl RotationEvent {
    pub fn degrees(&self) -> i32 {
        self.units * DEGREES_PER_UNIT
    }
}

/// Notes, obstacles and rotation events of a single playable level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub notes: Vec<NoteEvent>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleInterval>,
    #[serde(default)]
    pub rotations: Vec<RotationEvent>,
}

impl Timeline {
    /// Inserts a rotation event after every event at or before its time.
    pub fn insert_rotation(&mut self, event: RotationEvent) {
        let index = self.rotations.partition_point(|e| e.time <= event.time);
        self.rotations.insert(index, event);
    }

    pub fn contains_custom_obstacles(&self) -> bool {
        self.obstacles.iter().any(|obstacle| obstacle.custom)
    }
}

/// Supplies base timelines by characteristic name.
pub trait TimelineSource {
    fn base_timeline(&self, characteristic: &str) -> Result<Timeline>;

    /// Tempo the timeline's seconds were derived from.
    fn bpm(&self) -> f32;
}

/// Receives generated timelines.
pub trait TimelineSink {
    fn install(&mut self, mode: RotationMode, timeline: Timeline) -> Result<()>;
}
