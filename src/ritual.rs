use crate::config::FINISH_WINDOW;
use crate::difficulty::DifficultyController;
use crate::timer::Timer;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RitualPhase {
    Idle,
    /// Counting down until the ritual can be finished.
    Waiting { remaining: f32 },
    /// The finish window is open.
    ReadyToFinish { remaining: f32 },
}

impl RitualPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RitualPhase::Idle => "idle",
            RitualPhase::Waiting { .. } => "waiting",
            RitualPhase::ReadyToFinish { .. } => "ready",
        }
    }

    pub fn remaining(&self) -> Option<f32> {
        match *self {
            RitualPhase::Idle => None,
            RitualPhase::Waiting { remaining } | RitualPhase::ReadyToFinish { remaining } => {
                Some(remaining)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RitualEvent {
    Ready,
    Completed {
        /// Set when this completion rolled the night over.
        new_night: Option<u32>,
    },
    Failed,
}

#[derive(Clone, Copy, Debug)]
enum Stage {
    Idle,
    Waiting(Timer),
    ReadyToFinish(Timer),
}

/// The timed "process": start at the ritual slot, wait it out, then finish within the window.
///
/// While the camera is away from the ritual slot the timers hold still and finish
/// requests are dropped.
#[derive(Clone, Debug)]
pub struct RitualController {
    ritual_slot: usize,
    stage: Stage,
    finish_requested: bool,
}

impl RitualController {
    pub fn new(ritual_slot: usize) -> Self {
        Self {
            ritual_slot,
            stage: Stage::Idle,
            finish_requested: false,
        }
    }

    pub fn ritual_slot(&self) -> usize {
        self.ritual_slot
    }

    pub fn phase(&self) -> RitualPhase {
        match self.stage {
            Stage::Idle => RitualPhase::Idle,
            Stage::Waiting(timer) => RitualPhase::Waiting {
                remaining: timer.remaining(),
            },
            Stage::ReadyToFinish(timer) => RitualPhase::ReadyToFinish {
                remaining: timer.remaining(),
            },
        }
    }

    /// Begin a ritual. Only from idle, and only while settled at the ritual slot.
    pub fn start(&mut self, at_ritual_slot: bool, difficulty: &DifficultyController) -> bool {
        if !at_ritual_slot || !matches!(self.stage, Stage::Idle) {
            log::debug!("Ritual start ignored ({})", self.phase().name());
            return false;
        }
        let wait = difficulty.process_time();
        self.stage = Stage::Waiting(Timer::new(wait));
        self.finish_requested = false;
        log::info!("Started ritual. Must wait {} seconds before finishing.", wait);
        true
    }

    /// Latch a finish request; it is judged on the next tick.
    pub fn request_finish(&mut self) {
        self.finish_requested = true;
    }

    pub fn tick(
        &mut self,
        dt: f32,
        at_ritual_slot: bool,
        difficulty: &mut DifficultyController,
    ) -> Option<RitualEvent> {
        let finish_requested = std::mem::take(&mut self.finish_requested);
        if !at_ritual_slot {
            return None;
        }

        match &mut self.stage {
            Stage::Idle => None,
            Stage::Waiting(timer) => {
                if !timer.tick(dt) {
                    return None;
                }
                self.stage = Stage::ReadyToFinish(Timer::new(FINISH_WINDOW));
                log::info!("Ritual ready to finish! {} seconds left.", FINISH_WINDOW);
                Some(RitualEvent::Ready)
            }
            Stage::ReadyToFinish(timer) => {
                if timer.tick(dt) {
                    self.stage = Stage::Idle;
                    log::info!("Ritual failed: not finished in time");
                    Some(RitualEvent::Failed)
                } else if finish_requested {
                    self.stage = Stage::Idle;
                    log::info!("Ritual finished successfully!");
                    let new_night = difficulty.ritual_completed();
                    Some(RitualEvent::Completed { new_night })
                } else {
                    None
                }
            }
        }
    }
}
