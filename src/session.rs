use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::camera::{CameraSlotGraph, Slot, TransitionGraph};
use crate::config::*;
use crate::difficulty::DifficultyController;
use crate::error::ConfigError;
use crate::flashlight::{Flashlight, FlashlightConfig};
use crate::monster::{EncounterEvent, MonsterConfig, MonsterEncounterController, SpawnPolicy};
use crate::pose::Pose;
use crate::ritual::{RitualController, RitualEvent, RitualPhase};
use crate::visibility::{EntityId, Observer, Projection, SceneQuery};

/// Everything needed to set up a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub slots: Vec<Slot>,
    pub graph: TransitionGraph,
    #[serde(default)]
    pub projection: Projection,
    #[serde(default)]
    pub flashlight: FlashlightConfig,
    pub monster: MonsterConfig,
    #[serde(default)]
    pub ritual_slot: usize,
    #[serde(default = "default_night")]
    pub starting_night: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_night() -> u32 {
    1
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl SessionConfig {
    /// Five slots around a desk, restricted graph 0 <-> {1, 2, 4}, 2 <-> 3.
    /// The monster appears on a random cycle.
    pub fn office() -> Self {
        let slots = vec![
            Slot::new(Vec3::new(0.0, 1.6, 0.0), Vec3::new(0.0, 1.4, -6.0)),
            Slot::new(Vec3::new(-2.5, 1.6, -0.5), Vec3::new(-6.0, 1.4, -1.0)),
            Slot::new(Vec3::new(2.0, 1.6, -1.0), Vec3::new(6.0, 1.2, -3.0)),
            Slot::new(Vec3::new(4.5, 1.6, -3.5), Vec3::new(4.5, 1.0, -9.0)).with_speeds(2.0, 2.5),
            Slot::new(Vec3::new(0.0, 1.6, 1.5), Vec3::new(0.0, 1.6, 8.0)),
        ];
        Self {
            slots,
            graph: TransitionGraph::office(),
            projection: Projection::default(),
            flashlight: FlashlightConfig::default(),
            monster: MonsterConfig {
                spawn: Some(SpawnPolicy::default()),
                ..hallway_monster()
            },
            ritual_slot: 0,
            starting_night: 1,
            seed: DEFAULT_SEED,
        }
    }

    /// Nine freely reachable slots; the monster is always present.
    pub fn free_roam() -> Self {
        let slots = (0..9)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / 9.0;
                let (sin, cos) = angle.sin_cos();
                Slot::new(
                    Vec3::new(cos * 3.0, 1.6, sin * 3.0),
                    Vec3::new(cos * 9.0, 1.6, sin * 9.0),
                )
            })
            .collect();
        Self {
            slots,
            graph: TransitionGraph::FullyConnected,
            projection: Projection::default(),
            flashlight: FlashlightConfig {
                drop_requires_beam_off: false,
                drain: crate::battery::DrainRate::Flat(5.0),
                ..FlashlightConfig::default()
            },
            monster: hallway_monster(),
            ritual_slot: 0,
            starting_night: 1,
            seed: DEFAULT_SEED,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots.is_empty() {
            return Err(ConfigError::NoSlots);
        }
        self.graph.validate(self.slots.len())?;
        for (role, slot) in [
            ("ritual", self.ritual_slot),
            ("pickup", self.flashlight.pickup_slot),
        ] {
            if slot >= self.slots.len() {
                return Err(ConfigError::SlotOutOfRange {
                    role,
                    slot,
                    slots: self.slots.len(),
                });
            }
        }
        let p = &self.projection;
        if !(p.fov_y_degrees > 0.0 && p.fov_y_degrees < 180.0) {
            return Err(ConfigError::Projection("fov must be between 0 and 180 degrees"));
        }
        if !(p.aspect > 0.0 && p.near > 0.0 && p.far > p.near) {
            return Err(ConfigError::Projection("need aspect > 0 and 0 < near < far"));
        }
        self.flashlight.validate()?;
        self.monster.validate()
    }
}

fn hallway_monster() -> MonsterConfig {
    MonsterConfig {
        entity: EntityId(1),
        start: Pose::looking_at(Vec3::new(0.0, 0.0, -14.0), Vec3::new(0.0, 0.0, 0.0)),
        advance_points: [-11.0, -8.0, -5.5, -3.0]
            .into_iter()
            .map(|z| Pose::looking_at(Vec3::new(0.0, 0.0, z), Vec3::ZERO))
            .collect(),
        half_extents: Vec3::from_array(MONSTER_HALF_EXTENTS),
        ignore_threshold: IGNORE_THRESHOLD,
        lit_drain_per_second: LIT_DRAIN_PER_SECOND,
        spawn: None,
    }
}

/// Decoded player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    ToggleBeam,
    PickupOrDrop,
    RequestSlot(usize),
    StartRitual,
    FinishRitual,
}

/// Something the UI or audio layer may want to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    SlotReached(usize),
    BeamForcedOff,
    MonsterSpawned,
    MonsterDespawned,
    MonsterAdvanced(usize),
    MonsterRepelled,
    RitualStarted,
    RitualReady,
    RitualCompleted,
    RitualFailed,
    NightAdvanced(u32),
}

/// Read-only snapshot polled by the UI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionStatus {
    pub night: u32,
    pub completed_rituals: u32,
    pub required_rituals: u32,
    pub battery: f32,
    pub beam_on: bool,
    pub holding_flashlight: bool,
    pub slot: usize,
    pub in_transit: bool,
    pub ritual: RitualPhase,
    pub monster_active: bool,
    pub monster_advance: usize,
}

/// Output side of the engine: whatever draws the beam, the monster and the props.
pub trait Renderable {
    fn set_beam_enabled(&mut self, enabled: bool);
    fn set_beam_color(&mut self, color: Vec4);
    fn set_monster(&mut self, active: bool, pose: Pose);
    fn set_item_carried(&mut self, carried: bool);
    fn set_ritual_light(&mut self, color: Option<Vec4>);
    fn set_camera(&mut self, _pose: Pose) {}
}

/// One play session: owns every controller and advances them in order each frame.
pub struct Session {
    camera: CameraSlotGraph,
    flashlight: Flashlight,
    monster: MonsterEncounterController,
    ritual: RitualController,
    difficulty: DifficultyController,
    projection: Projection,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let camera = CameraSlotGraph::new(config.slots, config.graph)?;
        let mut session = Self {
            camera,
            flashlight: Flashlight::new(config.flashlight),
            monster: MonsterEncounterController::new(config.monster, config.seed),
            ritual: RitualController::new(config.ritual_slot),
            difficulty: DifficultyController::starting_at(config.starting_night),
            projection: config.projection,
            events: Vec::new(),
        };
        if session.monster.begin().is_some() {
            session.events.push(GameEvent::MonsterSpawned);
        }
        log::info!(
            "Session started: {} slots, night {}",
            session.camera.slot_count(),
            session.difficulty.night()
        );
        Ok(session)
    }

    pub fn camera(&self) -> &CameraSlotGraph {
        &self.camera
    }

    pub fn flashlight(&self) -> &Flashlight {
        &self.flashlight
    }

    pub fn monster(&self) -> &MonsterEncounterController {
        &self.monster
    }

    pub fn ritual(&self) -> &RitualController {
        &self.ritual
    }

    pub fn difficulty(&self) -> &DifficultyController {
        &self.difficulty
    }

    pub fn observer(&self) -> Observer {
        Observer::from_pose(&self.camera.pose(), &self.projection)
    }

    fn at_ritual_slot(&self) -> bool {
        self.camera.is_at_slot(self.ritual.ritual_slot())
    }

    /// Apply one input command. Rejected commands are silently dropped.
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::ToggleBeam => {
                self.flashlight.toggle_beam();
            }
            Command::PickupOrDrop => {
                self.flashlight.pickup_or_drop(self.camera.current_slot());
            }
            Command::RequestSlot(slot) => {
                self.camera.request_transition(slot);
            }
            Command::StartRitual => {
                if self.ritual.start(self.at_ritual_slot(), &self.difficulty) {
                    self.events.push(GameEvent::RitualStarted);
                }
            }
            Command::FinishRitual => self.ritual.request_finish(),
        }
    }

    /// Advance one frame: camera, flashlight, monster, ritual.
    pub fn tick(&mut self, dt: f32, scene: Option<&dyn SceneQuery>) -> Vec<GameEvent> {
        let dt = dt.max(0.0);

        if self.camera.tick(dt) {
            self.events.push(GameEvent::SlotReached(self.camera.current_slot()));
        }

        let night = self.difficulty.params();
        if self.flashlight.tick(dt, &self.camera.pose(), &night) {
            self.events.push(GameEvent::BeamForcedOff);
        }

        let observer = self.observer();
        let beam = self.flashlight.beam();
        let encounter = self.monster.tick(
            dt,
            scene,
            Some(&observer),
            Some(&beam),
            self.flashlight.battery_mut(),
        );
        if encounter.beam_forced_off {
            self.events.push(GameEvent::BeamForcedOff);
        }
        if let Some(event) = encounter.event {
            self.events.push(match event {
                EncounterEvent::Spawned => GameEvent::MonsterSpawned,
                EncounterEvent::Despawned => GameEvent::MonsterDespawned,
                EncounterEvent::Repelled => GameEvent::MonsterRepelled,
                EncounterEvent::Advanced(n) => GameEvent::MonsterAdvanced(n),
            });
        }

        let at_slot = self.at_ritual_slot();
        match self.ritual.tick(dt, at_slot, &mut self.difficulty) {
            Some(RitualEvent::Ready) => self.events.push(GameEvent::RitualReady),
            Some(RitualEvent::Failed) => self.events.push(GameEvent::RitualFailed),
            Some(RitualEvent::Completed { new_night }) => {
                self.events.push(GameEvent::RitualCompleted);
                if let Some(night) = new_night {
                    self.events.push(GameEvent::NightAdvanced(night));
                }
            }
            None => {}
        }

        std::mem::take(&mut self.events)
    }

    /// Full battery and beam off, as at the start of a night.
    pub fn reset_night_state(&mut self) {
        self.flashlight.reset_battery();
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            night: self.difficulty.night(),
            completed_rituals: self.difficulty.completed_rituals(),
            required_rituals: self.difficulty.required_rituals(),
            battery: self.flashlight.battery().charge(),
            beam_on: self.flashlight.beam().enabled,
            holding_flashlight: self.flashlight.is_held(),
            slot: self.camera.current_slot(),
            in_transit: self.camera.in_transit(),
            ritual: self.ritual.phase(),
            monster_active: self.monster.is_active(),
            monster_advance: self.monster.advance_index(),
        }
    }

    /// Push the current visual state to the renderer.
    pub fn present<R: Renderable>(&self, renderable: &mut R) {
        let beam = self.flashlight.beam();
        renderable.set_camera(self.camera.pose());
        renderable.set_beam_enabled(beam.enabled);
        renderable.set_beam_color(beam.color);
        renderable.set_monster(self.monster.is_active(), self.monster.pose());
        renderable.set_item_carried(self.flashlight.is_held());
        renderable.set_ritual_light(match self.ritual.phase() {
            RitualPhase::Idle => None,
            RitualPhase::Waiting { .. } => Some(Vec4::from_array(RITUAL_WAIT_COLOR)),
            RitualPhase::ReadyToFinish { .. } => Some(Vec4::from_array(RITUAL_READY_COLOR)),
        });
    }
}
