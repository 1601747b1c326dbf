use crate::config::{BASE_DRAIN_PER_SECOND, DRAIN_PER_NIGHT};

/// Per-night tuning read by the battery and the ritual.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NightParams {
    pub night: u32,
    pub required_rituals: u32,
    /// Seconds the ritual must run before it can be finished.
    pub process_time: f32,
    pub battery_drain_per_second: f32,
}

impl NightParams {
    pub fn for_night(night: u32) -> Self {
        let night = night.max(1);
        let (required_rituals, process_time) = match night {
            1 => (3, 25.0),
            2 => (4, 30.0),
            3 => (4, 35.0),
            4 => (5, 40.0),
            5 => (6, 45.0),
            6 => (7, 50.0),
            _ => (7, 50.0),
        };
        Self {
            night,
            required_rituals,
            process_time,
            battery_drain_per_second: BASE_DRAIN_PER_SECOND
                + (night - 1) as f32 * DRAIN_PER_NIGHT,
        }
    }

    /// Battery drain relative to night 1.
    pub fn drain_multiplier(&self) -> f32 {
        self.battery_drain_per_second / BASE_DRAIN_PER_SECOND
    }
}

/// Night index and ritual progress for the current night.
///
/// Owned by the session and handed to the battery and the ritual by reference each tick.
#[derive(Clone, Debug)]
pub struct DifficultyController {
    night: u32,
    completed: u32,
}

impl DifficultyController {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(night: u32) -> Self {
        Self {
            night: night.max(1),
            completed: 0,
        }
    }

    pub fn night(&self) -> u32 {
        self.night
    }

    pub fn completed_rituals(&self) -> u32 {
        self.completed
    }

    pub fn params(&self) -> NightParams {
        NightParams::for_night(self.night)
    }

    pub fn required_rituals(&self) -> u32 {
        self.params().required_rituals
    }

    pub fn process_time(&self) -> f32 {
        self.params().process_time
    }

    /// Credit one finished ritual. Returns the new night if this rolled the night over.
    pub fn ritual_completed(&mut self) -> Option<u32> {
        self.completed += 1;
        let required = self.required_rituals();
        log::info!(
            "Completed rituals this night: {}/{}",
            self.completed,
            required
        );

        if self.completed >= required {
            log::info!("Night {} completed!", self.night);
            self.night += 1;
            self.completed = 0;
            Some(self.night)
        } else {
            None
        }
    }
}

impl Default for DifficultyController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_table() {
        let expected = [
            (1, 3, 25.0),
            (2, 4, 30.0),
            (3, 4, 35.0),
            (4, 5, 40.0),
            (5, 6, 45.0),
            (6, 7, 50.0),
            (7, 7, 50.0),
            (12, 7, 50.0),
        ];
        for (night, required, time) in expected {
            let params = NightParams::for_night(night);
            assert_eq!(params.required_rituals, required, "night {night}");
            assert_eq!(params.process_time, time, "night {night}");
        }
    }

    #[test]
    fn test_drain_scales_with_night() {
        assert!((NightParams::for_night(1).battery_drain_per_second - 0.3).abs() < 1e-6);
        assert!((NightParams::for_night(3).battery_drain_per_second - 0.5).abs() < 1e-6);
        assert!((NightParams::for_night(1).drain_multiplier() - 1.0).abs() < 1e-6);
        assert!((NightParams::for_night(4).drain_multiplier() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_rollover_after_required_rituals() {
        let mut difficulty = DifficultyController::new();
        assert_eq!(difficulty.ritual_completed(), None);
        assert_eq!(difficulty.ritual_completed(), None);
        assert_eq!(difficulty.completed_rituals(), 2);
        assert_eq!(difficulty.ritual_completed(), Some(2));
        assert_eq!(difficulty.night(), 2);
        assert_eq!(difficulty.completed_rituals(), 0);
        assert_eq!(difficulty.required_rituals(), 4);
        assert_eq!(difficulty.process_time(), 30.0);
    }

    #[test]
    fn test_night_is_unbounded() {
        let mut difficulty = DifficultyController::starting_at(9);
        for _ in 0..7 {
            difficulty.ritual_completed();
        }
        assert_eq!(difficulty.night(), 10);
        assert_eq!(difficulty.required_rituals(), 7);
    }

    #[test]
    fn test_night_zero_clamps_to_one() {
        assert_eq!(DifficultyController::starting_at(0).night(), 1);
    }
}
