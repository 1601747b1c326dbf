use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::battery::{BatteryModel, DrainRate};
use crate::config::*;
use crate::difficulty::NightParams;
use crate::error::ConfigError;
use crate::pose::Pose;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FlashlightConfig {
    /// Slot the flashlight rests at; it can only be picked up or put down there.
    pub pickup_slot: usize,
    /// Offset from the camera in its right/up/forward basis while held.
    pub hold_offset: Vec3,
    pub color: Vec4,
    pub half_angle_degrees: f32,
    pub range: f32,
    /// Refuse to put the flashlight down while it is on.
    pub drop_requires_beam_off: bool,
    pub drain: DrainRate,
}

impl FlashlightConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=90.0).contains(&self.half_angle_degrees) {
            return Err(ConfigError::Flashlight("half angle must be within 0..=90 degrees"));
        }
        if self.range.is_nan() || self.range <= 0.0 {
            return Err(ConfigError::Flashlight("range must be positive"));
        }
        Ok(())
    }
}

impl Default for FlashlightConfig {
    fn default() -> Self {
        Self {
            pickup_slot: 0,
            hold_offset: Vec3::from_array(HOLD_OFFSET),
            color: Vec4::from_array(BEAM_COLOR),
            half_angle_degrees: BEAM_HALF_ANGLE_DEGREES,
            range: BEAM_RANGE,
            drop_requires_beam_off: true,
            drain: DrainRate::NightScaled,
        }
    }
}

/// The flashlight's light cone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Beam {
    pub enabled: bool,
    pub color: Vec4,
    pub half_angle_degrees: f32,
    pub range: f32,
    pub origin: Vec3,
    pub forward: Vec3,
}

/// Carried flashlight: pickup/drop, the on/off switch and its battery.
#[derive(Clone, Debug)]
pub struct Flashlight {
    config: FlashlightConfig,
    battery: BatteryModel,
    held: bool,
    origin: Vec3,
    forward: Vec3,
}

impl Flashlight {
    pub fn new(config: FlashlightConfig) -> Self {
        Self {
            battery: BatteryModel::new(config.drain),
            config,
            held: false,
            origin: Vec3::ZERO,
            forward: Vec3::NEG_Z,
        }
    }

    pub fn config(&self) -> &FlashlightConfig {
        &self.config
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn battery(&self) -> &BatteryModel {
        &self.battery
    }

    pub fn battery_mut(&mut self) -> &mut BatteryModel {
        &mut self.battery
    }

    pub fn beam(&self) -> Beam {
        Beam {
            enabled: self.held && self.battery.beam_on(),
            color: self.config.color,
            half_angle_degrees: self.config.half_angle_degrees,
            range: self.config.range,
            origin: self.origin,
            forward: self.forward,
        }
    }

    /// Pick up or put down, only while at the pickup slot. Returns true if state changed.
    pub fn pickup_or_drop(&mut self, current_slot: usize) -> bool {
        if current_slot != self.config.pickup_slot {
            log::debug!("Flashlight out of reach from slot {}", current_slot);
            return false;
        }

        if !self.held {
            self.held = true;
            log::info!("Picked up flashlight");
            return true;
        }

        if self.config.drop_requires_beam_off && self.battery.beam_on() {
            log::debug!("Turn the flashlight off before putting it down");
            return false;
        }
        self.held = false;
        self.battery.set_beam_enabled(false);
        log::info!("Put down flashlight");
        true
    }

    /// Flip the beam while held. Turning on needs charge. Returns the resulting state.
    pub fn toggle_beam(&mut self) -> bool {
        if !self.held {
            return false;
        }
        let want_on = !self.battery.beam_on();
        self.battery.set_beam_enabled(want_on);
        self.battery.beam_on()
    }

    /// Follow the camera and apply base drain. Returns true if the beam was forced off.
    pub fn tick(&mut self, dt: f32, camera: &Pose, night: &NightParams) -> bool {
        if self.held {
            let offset = self.config.hold_offset;
            self.origin = camera.position
                + camera.right() * offset.x
                + camera.up() * offset.y
                + camera.forward() * offset.z;
            self.forward = camera.forward();
        }
        self.battery.tick(dt, night)
    }

    pub fn reset_battery(&mut self) {
        self.battery.reset();
    }
}
