use anyhow::{Context, Result};

use nightshift::{EntityId, GameEvent, Session, SessionStatus};

use crate::collision::CollisionScene;
use crate::config::*;
use crate::hud::{LogHud, format_status};
use crate::scenario::{Scenario, TimedCommand};

/// Replays a scenario against a session with a parry3d scene standing in for the level.
pub struct GameState {
    pub session: Session,
    pub scene: CollisionScene,
    pub hud: LogHud,
    inputs: Vec<TimedCommand>,
    next_input: usize,
    elapsed: f32,
    since_status: f32,
    monster: EntityId,
}

impl GameState {
    pub fn new(scenario: &Scenario) -> Result<Self> {
        let session = Session::new(scenario.session_config()).context("invalid session config")?;
        let monster = session.monster().config().entity;

        let mut scene = CollisionScene::new();
        if !scenario.walls.vertices.is_empty() {
            scene = scene
                .with_walls(WALL_ENTITY, &scenario.walls.vertices, &scenario.walls.indices)
                .context("invalid wall mesh")?;
        }

        Ok(Self {
            session,
            scene,
            hud: LogHud::new(),
            inputs: scenario.inputs.clone(),
            next_input: 0,
            elapsed: 0.0,
            since_status: 0.0,
            monster,
        })
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        while let Some(input) = self.inputs.get(self.next_input)
            && input.at <= self.elapsed
        {
            log::debug!("t={:.2} input {:?}", self.elapsed, input.command);
            self.session.handle(input.command);
            self.next_input += 1;
        }

        self.scene.set_body(self.monster, self.session.monster().bounds());
        let events = self.session.tick(dt, Some(&self.scene));
        self.elapsed += dt;

        for event in &events {
            log_event(*event, self.elapsed);
        }
        if events.iter().any(|e| matches!(e, GameEvent::NightAdvanced(_))) {
            self.session.reset_night_state();
        }

        self.session.present(&mut self.hud);

        self.since_status += dt;
        if self.since_status >= STATUS_INTERVAL {
            self.since_status = 0.0;
            log::info!("t={:>6.1} {}", self.elapsed, format_status(&self.status()));
        }

        events
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }
}

fn log_event(event: GameEvent, t: f32) {
    match event {
        GameEvent::SlotReached(slot) => log::debug!("t={:.2} reached slot {}", t, slot),
        GameEvent::RitualReady => log::info!("t={:.2} ritual ready, finish it!", t),
        GameEvent::NightAdvanced(night) => log::info!("t={:.2} night {} begins", t, night),
        GameEvent::MonsterAdvanced(step) => log::warn!("t={:.2} something moved closer ({})", t, step),
        other => log::info!("t={:.2} {:?}", t, other),
    }
}
