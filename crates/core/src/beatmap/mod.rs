use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    config::RotationMode,
    timeline::{Timeline, TimelineSink, TimelineSource},
    GeneratorError, Result,
};

/// A song's levels keyed by characteristic name, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeatmapDocument {
    pub bpm: f32,
    pub timelines: BTreeMap<String, Timeline>,
}

impl BeatmapDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn timeline(&self, characteristic: &str) -> Option<&Timeline> {
        self.timelines.get(characteristic)
    }
}

impl TimelineSource for BeatmapDocument {
    fn base_timeline(&self, characteristic: &str) -> Result<Timeline> {
        self.timelines
            .get(characteristic)
            .cloned()
            .ok_or_else(|| GeneratorError::UnknownCharacteristic(characteristic.to_string()))
    }

    fn bpm(&self) -> f32 {
        self.bpm
    }
}

impl TimelineSink for BeatmapDocument {
    fn install(&mut self, mode: RotationMode, timeline: Timeline) -> Result<()> {
        self.timelines
            .insert(mode.characteristic().to_string(), timeline);
        Ok(())
    }
}
