use serde::{Deserialize, Serialize};

use crate::config::FULL_CHARGE;
use crate::difficulty::NightParams;

/// How fast the battery drains per second while the beam is on.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum DrainRate {
    #[default]
    /// Follows the night table (`0.3 + (night - 1) * 0.1`).
    NightScaled,
    /// Same rate every night.
    Flat(f32),
    #[serde(skip)]
    Custom(fn(u32) -> f32),
}

impl DrainRate {
    pub fn per_second(&self, night: &NightParams) -> f32 {
        match self {
            DrainRate::NightScaled => night.battery_drain_per_second,
            DrainRate::Flat(rate) => *rate,
            DrainRate::Custom(rate) => rate(night.night),
        }
        .max(0.0)
    }
}

/// Flashlight charge and the on/off switch it gates.
#[derive(Clone, Debug)]
pub struct BatteryModel {
    charge: f32,
    beam_on: bool,
    rate: DrainRate,
}

impl BatteryModel {
    pub fn new(rate: DrainRate) -> Self {
        Self {
            charge: FULL_CHARGE,
            beam_on: false,
            rate,
        }
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn is_empty(&self) -> bool {
        self.charge <= 0.0
    }

    pub fn beam_on(&self) -> bool {
        self.beam_on
    }

    /// Switch the beam. Turning on is refused while the battery is empty.
    /// Returns whether the beam ended up in the requested state.
    pub fn set_beam_enabled(&mut self, on: bool) -> bool {
        if on && self.is_empty() {
            log::debug!("Beam refused: battery empty");
            self.beam_on = false;
            return false;
        }
        self.beam_on = on;
        true
    }

    /// Remove `amount` of charge. Returns true if this forced the beam off.
    pub fn drain(&mut self, amount: f32) -> bool {
        if amount <= 0.0 {
            return false;
        }
        self.charge = (self.charge - amount).clamp(0.0, FULL_CHARGE);

        if self.charge <= 0.0 && self.beam_on {
            self.beam_on = false;
            log::info!("Battery depleted, beam off");
            return true;
        }
        false
    }

    /// Base drain while the beam is on. Returns true if the beam was forced off.
    pub fn tick(&mut self, dt: f32, night: &NightParams) -> bool {
        if !self.beam_on || self.is_empty() {
            return false;
        }
        self.drain(self.rate.per_second(night) * dt)
    }

    pub fn reset(&mut self) {
        self.charge = FULL_CHARGE;
        self.beam_on = false;
    }
}
