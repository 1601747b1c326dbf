use glam::Vec4;
use nightshift::pose::Pose;
use nightshift::ritual::RitualPhase;
use nightshift::{Renderable, SessionStatus};

/// Stands in for the renderer: remembers what it was last told and logs changes.
#[derive(Default)]
pub struct LogHud {
    beam: bool,
    carried: bool,
    monster: Option<Pose>,
    ritual_light: Option<Vec4>,
}

impl LogHud {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderable for LogHud {
    fn set_beam_enabled(&mut self, enabled: bool) {
        if enabled != self.beam {
            log::info!("Flashlight {}", if enabled { "on" } else { "off" });
        }
        self.beam = enabled;
    }

    fn set_beam_color(&mut self, _color: Vec4) {}

    fn set_monster(&mut self, active: bool, pose: Pose) {
        let next = active.then_some(pose);
        if next != self.monster {
            match next {
                Some(p) => log::info!(
                    "Monster at [{:.1}, {:.1}, {:.1}]",
                    p.position.x,
                    p.position.y,
                    p.position.z
                ),
                None => log::info!("Monster gone"),
            }
        }
        self.monster = next;
    }

    fn set_item_carried(&mut self, carried: bool) {
        if carried != self.carried {
            log::info!("Flashlight {}", if carried { "picked up" } else { "put down" });
        }
        self.carried = carried;
    }

    fn set_ritual_light(&mut self, color: Option<Vec4>) {
        if color != self.ritual_light {
            match color {
                Some(c) => log::info!("Ritual light [{:.1}, {:.1}, {:.1}]", c.x, c.y, c.z),
                None => log::info!("Ritual light off"),
            }
        }
        self.ritual_light = color;
    }
}

/// One-line summary for the periodic status log.
pub fn format_status(status: &SessionStatus) -> String {
    let ritual = match status.ritual {
        RitualPhase::Idle => "idle".to_string(),
        phase => format!("{} {:.1}s", phase.name(), phase.remaining().unwrap_or(0.0)),
    };
    format!(
        "night {} ({}/{}) | slot {}{} | battery {:.1}%{} | ritual {} | monster {}",
        status.night,
        status.completed_rituals,
        status.required_rituals,
        status.slot,
        if status.in_transit { " (moving)" } else { "" },
        status.battery,
        if status.beam_on { " [on]" } else { "" },
        ritual,
        if status.monster_active {
            format!("step {}", status.monster_advance)
        } else {
            "away".to_string()
        },
    )
}
