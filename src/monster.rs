use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::battery::BatteryModel;
use crate::config::*;
use crate::error::ConfigError;
use crate::flashlight::Beam;
use crate::pose::Pose;
use crate::timer::Timer;
use crate::visibility::{Aabb, EntityId, Observer, SceneQuery, is_in_beam, is_visible_to_observer};

/// Random appearance cycle. Without one the monster is always present.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPolicy {
    /// Percent chance per roll.
    pub chance: f32,
    pub cycle_interval: f32,
    pub appear_duration: f32,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            chance: SPAWN_CHANCE,
            cycle_interval: SPAWN_CYCLE_INTERVAL,
            appear_duration: APPEAR_DURATION,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterConfig {
    pub entity: EntityId,
    pub start: Pose,
    /// Forward positions, nearest to the player last.
    pub advance_points: Vec<Pose>,
    /// Collider half size; the box sits on top of the pose position.
    pub half_extents: Vec3,
    pub ignore_threshold: f32,
    pub lit_drain_per_second: f32,
    pub spawn: Option<SpawnPolicy>,
}

impl MonsterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ignore_threshold.is_nan() || self.ignore_threshold <= 0.0 {
            return Err(ConfigError::Monster("ignore threshold must be positive"));
        }
        if self.half_extents.cmple(Vec3::ZERO).any() {
            return Err(ConfigError::Monster("half extents must be positive"));
        }
        if self.lit_drain_per_second < 0.0 {
            return Err(ConfigError::Monster("lit drain cannot be negative"));
        }
        if let Some(spawn) = &self.spawn
            && (spawn.cycle_interval <= 0.0 || spawn.appear_duration <= 0.0)
        {
            return Err(ConfigError::Monster("spawn timers must be positive"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncounterEvent {
    Spawned,
    Despawned,
    /// Lit by the beam and sent back to the start.
    Repelled,
    /// Moved to the given forward position (1-based count of steps taken).
    Advanced(usize),
}

/// What happened to the monster this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EncounterResult {
    pub event: Option<EncounterEvent>,
    pub lit: bool,
    pub observed: bool,
    pub beam_forced_off: bool,
}

/// Ignore-and-advance monster: frozen while watched, repelled by the beam,
/// creeping forward when left alone.
#[derive(Clone, Debug)]
pub struct MonsterEncounterController {
    config: MonsterConfig,
    active: bool,
    pose: Pose,
    advance_index: usize,
    ignored: Timer,
    cycle: Timer,
    appearance: Timer,
    rng: SmallRng,
}

impl MonsterEncounterController {
    pub fn new(config: MonsterConfig, seed: u64) -> Self {
        let spawn = config.spawn.unwrap_or_default();
        Self {
            active: config.spawn.is_none(),
            pose: config.start,
            advance_index: 0,
            ignored: Timer::new(config.ignore_threshold),
            cycle: Timer::new(spawn.cycle_interval),
            appearance: Timer::new(spawn.appear_duration),
            rng: SmallRng::seed_from_u64(seed),
            config,
        }
    }

    /// Session start: roll for an immediate appearance.
    pub fn begin(&mut self) -> Option<EncounterEvent> {
        if self.active {
            return None;
        }
        self.roll_spawn()
    }

    pub fn config(&self) -> &MonsterConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn advance_index(&self) -> usize {
        self.advance_index
    }

    /// Seconds since last observed, lit or moved.
    pub fn ignore_time(&self) -> f32 {
        self.ignored.elapsed()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        if !self.active {
            return None;
        }
        let half = self.config.half_extents;
        let center = self.pose.position + Vec3::new(0.0, half.y, 0.0);
        Some(Aabb::from_center_half_extents(center, half))
    }

    pub fn tick(
        &mut self,
        dt: f32,
        scene: Option<&dyn SceneQuery>,
        observer: Option<&Observer>,
        beam: Option<&Beam>,
        battery: &mut BatteryModel,
    ) -> EncounterResult {
        let mut result = EncounterResult::default();

        if !self.active {
            if self.config.spawn.is_some() && self.cycle.tick(dt) {
                self.cycle.reset();
                result.event = self.roll_spawn();
            }
            return result;
        }

        if self.config.spawn.is_some() && self.appearance.tick(dt) {
            self.despawn();
            result.event = Some(EncounterEvent::Despawned);
            return result;
        }

        let bounds = self.bounds();
        result.lit = match (beam, &bounds) {
            (Some(beam), Some(bounds)) if beam.enabled => is_in_beam(
                scene,
                beam.origin,
                beam.forward,
                beam.half_angle_degrees,
                beam.range,
                bounds.center(),
                self.config.entity,
            ),
            _ => false,
        };

        if result.lit {
            result.beam_forced_off = battery.drain(self.config.lit_drain_per_second * dt);
            let was_away = self.advance_index > 0 || self.pose != self.config.start;
            self.reset_to_start();
            if was_away {
                log::info!("Monster repelled by the flashlight");
                result.event = Some(EncounterEvent::Repelled);
            }
            return result;
        }

        result.observed =
            is_visible_to_observer(scene, observer, self.config.entity, bounds.as_ref());
        if result.observed {
            self.ignored.reset();
            return result;
        }

        if self.ignored.tick(dt) {
            self.ignored.reset();
            result.event = self.advance();
        }
        result
    }

    fn advance(&mut self) -> Option<EncounterEvent> {
        let point = self.config.advance_points.get(self.advance_index)?;
        self.pose = *point;
        self.advance_index += 1;
        log::info!(
            "Monster advanced ({}/{})",
            self.advance_index,
            self.config.advance_points.len()
        );
        Some(EncounterEvent::Advanced(self.advance_index))
    }

    fn reset_to_start(&mut self) {
        self.pose = self.config.start;
        self.advance_index = 0;
        self.ignored.reset();
    }

    fn roll_spawn(&mut self) -> Option<EncounterEvent> {
        let spawn = self.config.spawn?;
        let roll: f32 = self.rng.random_range(0.0..100.0);
        if spawn.chance <= 0.0 || roll > spawn.chance {
            log::debug!("Spawn roll {:.1} missed ({:.1}%)", roll, spawn.chance);
            return None;
        }

        self.reset_to_start();
        self.active = true;
        self.appearance = Timer::new(spawn.appear_duration);
        log::info!("Monster appeared");
        Some(EncounterEvent::Spawned)
    }

    fn despawn(&mut self) {
        self.active = false;
        self.reset_to_start();
        log::info!("Monster left");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::DrainRate;
    use crate::visibility::Projection;
    use crate::visibility::tests::BoxScene;

    const MONSTER: EntityId = EntityId(9);
    const WALL: EntityId = EntityId(1);

    fn config(spawn: Option<SpawnPolicy>) -> MonsterConfig {
        MonsterConfig {
            entity: MONSTER,
            start: Pose::at(Vec3::new(0.0, 0.0, -20.0)),
            advance_points: (1..=4)
                .map(|i| Pose::at(Vec3::new(0.0, 0.0, -20.0 + i as f32 * 3.0)))
                .collect(),
            half_extents: Vec3::new(0.5, 1.0, 0.5),
            ignore_threshold: IGNORE_THRESHOLD,
            lit_drain_per_second: LIT_DRAIN_PER_SECOND,
            spawn,
        }
    }

    fn scene_for(monster: &MonsterEncounterController) -> BoxScene {
        let mut scene = BoxScene::new();
        if let Some(bounds) = monster.bounds() {
            scene = scene.with(MONSTER, bounds);
        }
        scene
    }

    fn battery() -> BatteryModel {
        BatteryModel::new(DrainRate::NightScaled)
    }

    fn beam_at_monster(enabled: bool) -> Beam {
        Beam {
            enabled,
            color: glam::Vec4::ONE,
            half_angle_degrees: 30.0,
            range: 50.0,
            origin: Vec3::new(0.0, 1.0, 0.0),
            forward: Vec3::NEG_Z,
        }
    }

    /// Camera looking away from the monster.
    fn looking_away() -> Observer {
        Observer::from_pose(
            &Pose::looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 10.0)),
            &Projection::default(),
        )
    }

    fn looking_at_monster() -> Observer {
        Observer::from_pose(
            &Pose::looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -10.0)),
            &Projection::default(),
        )
    }

    fn ignored_tick(monster: &mut MonsterEncounterController, dt: f32) -> EncounterResult {
        let scene = scene_for(monster);
        let observer = looking_away();
        monster.tick(dt, Some(&scene), Some(&observer), None, &mut battery())
    }

    #[test]
    fn test_advances_every_threshold_and_stops_at_last_point() {
        let mut monster = MonsterEncounterController::new(config(None), 1);
        assert!(monster.is_active());

        let mut steps = Vec::new();
        for tick in 1..=60 {
            let result = ignored_tick(&mut monster, 0.5);
            if let Some(EncounterEvent::Advanced(n)) = result.event {
                steps.push((tick, n));
            }
        }
        assert_eq!(steps, vec![(10, 1), (20, 2), (30, 3), (40, 4)]);
        assert_eq!(monster.advance_index(), 4);
        assert_eq!(monster.pose(), config(None).advance_points[3]);
    }

    #[test]
    fn test_observed_freezes() {
        let mut monster = MonsterEncounterController::new(config(None), 1);
        for _ in 0..8 {
            ignored_tick(&mut monster, 0.5);
        }
        assert!((monster.ignore_time() - 4.0).abs() < 1e-5);

        let scene = scene_for(&monster);
        let observer = looking_at_monster();
        for _ in 0..20 {
            let result = monster.tick(0.5, Some(&scene), Some(&observer), None, &mut battery());
            assert!(result.observed);
            assert_eq!(result.event, None);
        }
        assert_eq!(monster.ignore_time(), 0.0);
        assert_eq!(monster.advance_index(), 0);
    }

    #[test]
    fn test_wall_blocks_observation() {
        let mut monster = MonsterEncounterController::new(config(None), 1);
        let wall = Aabb::from_center_half_extents(Vec3::new(0.0, 1.0, -5.0), Vec3::new(10.0, 10.0, 0.1));
        let scene = scene_for(&monster).with(WALL, wall);
        let observer = looking_at_monster();
        let mut advanced = false;
        for _ in 0..10 {
            let result = monster.tick(0.5, Some(&scene), Some(&observer), None, &mut battery());
            assert!(!result.observed);
            advanced |= result.event.is_some();
        }
        assert!(advanced);
    }

    #[test]
    fn test_single_lit_tick_resets() {
        let mut monster = MonsterEncounterController::new(config(None), 1);
        for _ in 0..29 {
            ignored_tick(&mut monster, 0.5);
        }
        assert_eq!(monster.advance_index(), 2);
        assert!(monster.ignore_time() > 4.0);

        let scene = scene_for(&monster);
        let beam = beam_at_monster(true);
        let mut battery = battery();
        battery.set_beam_enabled(true);
        let result = monster.tick(0.1, Some(&scene), Some(&looking_away()), Some(&beam), &mut battery);

        assert!(result.lit);
        assert_eq!(result.event, Some(EncounterEvent::Repelled));
        assert_eq!(monster.advance_index(), 0);
        assert_eq!(monster.ignore_time(), 0.0);
        assert_eq!(monster.pose(), config(None).start);
        assert!((battery.charge() - 99.5).abs() < 1e-4);
    }

    #[test]
    fn test_disabled_beam_does_not_repel() {
        let mut monster = MonsterEncounterController::new(config(None), 1);
        let scene = scene_for(&monster);
        let beam = beam_at_monster(false);
        let result = monster.tick(0.1, Some(&scene), Some(&looking_away()), Some(&beam), &mut battery());
        assert!(!result.lit);
    }

    #[test]
    fn test_lit_drain_can_empty_battery() {
        let mut monster = MonsterEncounterController::new(config(None), 1);
        let scene = scene_for(&monster);
        let beam = beam_at_monster(true);
        let mut battery = battery();
        battery.set_beam_enabled(true);
        battery.drain(99.0);
        let result = monster.tick(1.0, Some(&scene), None, Some(&beam), &mut battery);
        assert!(result.beam_forced_off);
        assert!(!battery.beam_on());
    }

    #[test]
    fn test_missing_collaborators_count_as_ignored() {
        let mut monster = MonsterEncounterController::new(config(None), 1);
        for _ in 0..10 {
            monster.tick(0.5, None, None, None, &mut battery());
        }
        assert_eq!(monster.advance_index(), 1);
    }

    #[test]
    fn test_spawn_cycle() {
        let always = SpawnPolicy {
            chance: 100.0,
            cycle_interval: 60.0,
            appear_duration: 30.0,
        };
        let mut monster = MonsterEncounterController::new(config(Some(always)), 7);
        assert!(!monster.is_active());
        assert!(monster.bounds().is_none());
        assert_eq!(monster.begin(), Some(EncounterEvent::Spawned));
        assert!(monster.is_active());

        let mut despawned_at = None;
        for tick in 1..=70 {
            if ignored_tick(&mut monster, 0.5).event == Some(EncounterEvent::Despawned) {
                despawned_at = Some(tick);
                break;
            }
        }
        assert_eq!(despawned_at, Some(60));
        assert!(!monster.is_active());
        assert_eq!(monster.advance_index(), 0);

        let mut spawned_at = None;
        for tick in 1..=200 {
            if ignored_tick(&mut monster, 0.5).event == Some(EncounterEvent::Spawned) {
                spawned_at = Some(tick);
                break;
            }
        }
        assert_eq!(spawned_at, Some(120));
    }

    #[test]
    fn test_zero_chance_never_spawns() {
        let never = SpawnPolicy {
            chance: 0.0,
            ..SpawnPolicy::default()
        };
        let mut monster = MonsterEncounterController::new(config(Some(never)), 3);
        assert_eq!(monster.begin(), None);
        for _ in 0..1000 {
            assert_eq!(ignored_tick(&mut monster, 1.0).event, None);
        }
        assert!(!monster.is_active());
    }

    #[test]
    fn test_validate() {
        assert!(config(None).validate().is_ok());
        let mut bad = config(None);
        bad.ignore_threshold = 0.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_advance_period_holds_at_frame_rates() {
        for hz in [10, 30, 60] {
            let mut monster = MonsterEncounterController::new(config(None), 1);
            let dt = 1.0 / hz as f32;
            let mut ticks = Vec::new();
            for tick in 1..=21 * hz {
                let result = monster.tick(dt, None, None, None, &mut battery());
                if let Some(EncounterEvent::Advanced(_)) = result.event {
                    ticks.push(tick);
                }
            }
            let period = 5 * hz;
            assert_eq!(ticks, vec![period, 2 * period, 3 * period, 4 * period], "{hz} Hz");
        }
    }
}
