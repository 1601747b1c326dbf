use anyhow::{Context, Result, bail};
use glam::Vec3;
use serde::Deserialize;
use std::path::Path;

use nightshift::{Command, SessionConfig};

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Office,
    FreeRoam,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TimedCommand {
    /// Seconds since the session started.
    pub at: f32,
    pub command: Command,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Walls {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

/// A scripted run: which session to build, the level geometry and the inputs to replay.
#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub preset: Option<Preset>,
    #[serde(default)]
    pub session: Option<SessionConfig>,
    #[serde(default)]
    pub walls: Walls,
    #[serde(default = "default_dt")]
    pub dt: f32,
    pub duration: f32,
    #[serde(default)]
    pub inputs: Vec<TimedCommand>,
}

fn default_dt() -> f32 {
    1.0 / 60.0
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut scenario: Scenario = serde_json::from_str(text)?;
        if scenario.dt.is_nan() || scenario.dt <= 0.0 || scenario.duration.is_nan() || scenario.duration <= 0.0 {
            bail!("dt and duration must be positive");
        }
        scenario.inputs.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(scenario)
    }

    pub fn session_config(&self) -> SessionConfig {
        if let Some(config) = &self.session {
            return config.clone();
        }
        match self.preset.unwrap_or(Preset::Office) {
            Preset::Office => SessionConfig::office(),
            Preset::FreeRoam => SessionConfig::free_roam(),
        }
    }

    /// Built-in night: grab the light, run one ritual, glance down the hall.
    pub fn demo() -> Self {
        let inputs = [
            (0.5, Command::PickupOrDrop),
            (1.0, Command::StartRitual),
            (8.0, Command::ToggleBeam),
            (10.0, Command::ToggleBeam),
            (26.5, Command::FinishRitual),
            (28.0, Command::RequestSlot(2)),
            (32.0, Command::RequestSlot(3)),
            (40.0, Command::RequestSlot(2)),
            (44.0, Command::RequestSlot(0)),
            (48.0, Command::StartRitual),
        ];
        Self {
            preset: Some(Preset::Office),
            session: None,
            walls: Walls {
                vertices: vec![
                    Vec3::new(-3.0, 0.0, -16.0),
                    Vec3::new(3.0, 0.0, -16.0),
                    Vec3::new(3.0, 4.0, -16.0),
                    Vec3::new(-3.0, 4.0, -16.0),
                ],
                indices: vec![[0, 1, 2], [0, 2, 3]],
            },
            dt: default_dt(),
            duration: 90.0,
            inputs: inputs
                .into_iter()
                .map(|(at, command)| TimedCommand { at, command })
                .collect(),
        }
    }
}
