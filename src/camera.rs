use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::*;
use crate::error::ConfigError;
use crate::pose::{Pose, angle_degrees, look_rotation};
use crate::timer::Timer;

/// A fixed vantage point the camera can move to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub position: Vec3,
    /// Point the camera looks at once it arrives.
    pub look_at: Vec3,
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_rotate_speed")]
    pub rotate_speed: f32,
}

fn default_move_speed() -> f32 {
    DEFAULT_MOVE_SPEED
}

fn default_rotate_speed() -> f32 {
    DEFAULT_ROTATE_SPEED
}

impl Slot {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self {
            position,
            look_at,
            move_speed: DEFAULT_MOVE_SPEED,
            rotate_speed: DEFAULT_ROTATE_SPEED,
        }
    }

    pub fn with_speeds(mut self, move_speed: f32, rotate_speed: f32) -> Self {
        self.move_speed = move_speed;
        self.rotate_speed = rotate_speed;
        self
    }

    pub fn orientation(&self) -> Quat {
        look_rotation(self.position, self.look_at)
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation())
    }
}

/// Which slots can be reached directly from which.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionGraph {
    /// `table[from]` lists the slots reachable from `from`. Need not be symmetric.
    Restricted(Vec<Vec<usize>>),
    /// Any in-range slot is reachable from anywhere.
    FullyConnected,
}

impl TransitionGraph {
    /// 0 <-> {1, 2, 4}, 2 <-> 3.
    pub fn office() -> Self {
        TransitionGraph::Restricted(vec![vec![1, 2, 4], vec![0], vec![0, 3], vec![2], vec![0]])
    }

    pub fn can_move(&self, from: usize, to: usize, slot_count: usize) -> bool {
        if to >= slot_count {
            return false;
        }
        match self {
            TransitionGraph::Restricted(table) => {
                table.get(from).is_some_and(|targets| targets.contains(&to))
            }
            TransitionGraph::FullyConnected => true,
        }
    }

    pub fn validate(&self, slot_count: usize) -> Result<(), ConfigError> {
        let TransitionGraph::Restricted(table) = self else {
            return Ok(());
        };
        if table.len() != slot_count {
            return Err(ConfigError::AdjacencySize {
                table: table.len(),
                slots: slot_count,
            });
        }
        for (from, targets) in table.iter().enumerate() {
            if let Some(&to) = targets.iter().find(|&&to| to >= slot_count) {
                return Err(ConfigError::AdjacencyOutOfRange {
                    from,
                    to,
                    slots: slot_count,
                });
            }
        }
        Ok(())
    }
}

/// Camera pinned to one of a fixed set of slots, gliding between them on request.
#[derive(Clone, Debug)]
pub struct CameraSlotGraph {
    slots: Vec<Slot>,
    graph: TransitionGraph,
    current: usize,
    in_transit: bool,
    pose: Pose,
    /// Running while a new request would still be too soon.
    cooldown: Option<Timer>,
}

impl CameraSlotGraph {
    pub fn new(slots: Vec<Slot>, graph: TransitionGraph) -> Result<Self, ConfigError> {
        let Some(first) = slots.first() else {
            return Err(ConfigError::NoSlots);
        };
        graph.validate(slots.len())?;
        for (i, slot) in slots.iter().enumerate() {
            for (field, value) in [("move_speed", slot.move_speed), ("rotate_speed", slot.rotate_speed)] {
                if value.is_nan() || value <= 0.0 {
                    return Err(ConfigError::NonPositiveSpeed { slot: i, field, value });
                }
            }
        }

        let pose = first.pose();
        Ok(Self {
            slots,
            graph,
            current: 0,
            in_transit: false,
            pose,
            cooldown: None,
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slot the camera is at or heading to.
    pub fn current_slot(&self) -> usize {
        self.current
    }

    pub fn in_transit(&self) -> bool {
        self.in_transit
    }

    /// True once the camera has settled at slot `k`.
    pub fn is_at_slot(&self, k: usize) -> bool {
        self.current == k && !self.in_transit
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    fn cooling_down(&self) -> bool {
        self.cooldown.is_some_and(|timer| !timer.is_finished())
    }

    /// Start moving to `target`. Returns false (and changes nothing) if the request is
    /// out of range, unreachable from the current slot, or within the cooldown.
    pub fn request_transition(&mut self, target: usize) -> bool {
        if self.cooling_down() {
            log::debug!("Slot {} request ignored: cooling down", target);
            return false;
        }
        if !self.graph.can_move(self.current, target, self.slots.len()) {
            log::debug!("Slot {} not reachable from {}", target, self.current);
            return false;
        }

        self.current = target;
        self.in_transit = true;
        self.cooldown = Some(Timer::new(TRANSITION_COOLDOWN));
        true
    }

    /// Advance the glide. Returns true on the tick the camera arrives.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.cooldown.as_mut().is_some_and(|timer| timer.tick(dt)) {
            self.cooldown = None;
        }
        if !self.in_transit {
            return false;
        }

        let slot = self.slots[self.current];
        let move_t = (dt * slot.move_speed).clamp(0.0, 1.0);
        self.pose.position = self.pose.position.lerp(slot.position, move_t);

        let target_rotation = look_rotation(self.pose.position, slot.look_at);
        let rotate_t = (dt * slot.rotate_speed).clamp(0.0, 1.0);
        self.pose.rotation = self.pose.rotation.slerp(target_rotation, rotate_t).normalize();

        let distance = self.pose.position.distance(slot.position);
        let angle = angle_degrees(self.pose.rotation, target_rotation);
        if distance < SNAP_DISTANCE && angle < SNAP_ANGLE_DEGREES {
            self.pose = slot.pose();
            self.in_transit = false;
            log::debug!("Camera reached slot {}", self.current);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn office_slots() -> Vec<Slot> {
        (0..5)
            .map(|i| {
                let x = i as f32 * 2.0;
                Slot::new(Vec3::new(x, 1.5, 0.0), Vec3::new(x, 1.5, -5.0))
            })
            .collect()
    }

    fn office() -> CameraSlotGraph {
        CameraSlotGraph::new(office_slots(), TransitionGraph::office()).unwrap()
    }

    fn settle(camera: &mut CameraSlotGraph) -> usize {
        let mut ticks = 0;
        while camera.in_transit() {
            camera.tick(1.0 / 60.0);
            ticks += 1;
            assert!(ticks < 10_000, "transition never completed");
        }
        ticks
    }

    #[test]
    fn test_starts_pinned_to_slot_zero() {
        let camera = office();
        assert_eq!(camera.current_slot(), 0);
        assert!(camera.is_at_slot(0));
        assert_eq!(camera.pose(), office_slots()[0].pose());
    }

    #[test]
    fn test_restricted_reachability() {
        let graph = TransitionGraph::office();
        let allowed = [(0, 1), (0, 2), (0, 4), (1, 0), (2, 0), (2, 3), (3, 2), (4, 0)];
        for from in 0..5 {
            for to in 0..6 {
                assert_eq!(
                    graph.can_move(from, to, 5),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_rejected_requests_leave_state_unchanged() {
        let mut camera = office();
        assert!(!camera.request_transition(3));
        assert!(!camera.request_transition(5));
        assert!(!camera.request_transition(0));
        assert_eq!(camera.current_slot(), 0);
        assert!(!camera.in_transit());
    }

    #[test]
    fn test_cooldown_gates_requests() {
        let mut camera = office();
        assert!(camera.request_transition(2));
        camera.tick(0.5);
        assert!(!camera.request_transition(3));
        assert_eq!(camera.current_slot(), 2);
        camera.tick(0.5);
        assert!(camera.request_transition(3));
        assert_eq!(camera.current_slot(), 3);
    }

    #[test]
    fn test_transition_converges_and_snaps() {
        let mut camera = office();
        assert!(camera.request_transition(4));
        assert!(camera.in_transit());
        assert!(!camera.is_at_slot(4));

        let ticks = settle(&mut camera);
        assert!(ticks > 1);
        assert!(camera.is_at_slot(4));
        assert_eq!(camera.pose(), office_slots()[4].pose());
    }

    #[test]
    fn test_large_step_snaps_immediately() {
        let mut camera = office();
        camera.request_transition(1);
        assert!(camera.tick(1.0));
        assert_eq!(camera.pose().position, office_slots()[1].position);
    }

    #[test]
    fn test_fully_connected_graph() {
        let slots: Vec<Slot> = (0..9)
            .map(|i| Slot::new(Vec3::new(i as f32, 0.0, 0.0), Vec3::new(i as f32, 0.0, -1.0)))
            .collect();
        let mut camera = CameraSlotGraph::new(slots, TransitionGraph::FullyConnected).unwrap();
        assert!(camera.request_transition(8));
        settle(&mut camera);
        camera.tick(1.0);
        assert!(camera.request_transition(3));
        camera.tick(1.0);
        assert!(!camera.request_transition(9));
        assert_eq!(camera.current_slot(), 3);
    }

    #[test]
    fn test_invalid_configs() {
        assert_eq!(
            CameraSlotGraph::new(vec![], TransitionGraph::FullyConnected).unwrap_err(),
            ConfigError::NoSlots
        );
        assert!(matches!(
            CameraSlotGraph::new(office_slots()[..3].to_vec(), TransitionGraph::office()),
            Err(ConfigError::AdjacencySize { table: 5, slots: 3 })
        ));
        let bad = TransitionGraph::Restricted(vec![vec![1], vec![2]]);
        assert!(matches!(
            CameraSlotGraph::new(office_slots()[..2].to_vec(), bad),
            Err(ConfigError::AdjacencyOutOfRange { from: 1, to: 2, .. })
        ));
        let slow = vec![Slot::new(Vec3::ZERO, Vec3::NEG_Z).with_speeds(0.0, 1.0)];
        assert!(matches!(
            CameraSlotGraph::new(slow, TransitionGraph::FullyConnected),
            Err(ConfigError::NonPositiveSpeed { slot: 0, .. })
        ));
    }

    #[test]
    fn test_cooldown_is_one_second_of_frames() {
        for hz in [60, 120, 144] {
            let mut camera = office();
            assert!(camera.request_transition(2));
            let dt = 1.0 / hz as f32;
            for _ in 0..hz - 1 {
                camera.tick(dt);
            }
            assert!(!camera.request_transition(0), "{hz} Hz");
            camera.tick(dt);
            assert!(camera.request_transition(0), "{hz} Hz");
        }
    }

    #[test]
    fn test_cooldown_survives_long_sessions() {
        let mut camera = office();
        assert!(camera.request_transition(2));
        // A day of frames at 60 Hz.
        for _ in 0..60 * 60 * 60 * 24 {
            camera.tick(1.0 / 60.0);
        }
        assert!(camera.request_transition(0));
        assert!(!camera.request_transition(2));
    }

    #[test]
    fn test_request_succeeds_only_along_edges() {
        let graph = TransitionGraph::office();
        for from in 0..5 {
            for to in 0..6 {
                let mut camera = office();
                if from != 0 {
                    assert!(camera.request_transition(if graph.can_move(0, from, 5) { from } else { 2 }));
                    camera.tick(TRANSITION_COOLDOWN);
                    if from == 3 {
                        assert!(camera.request_transition(3));
                        camera.tick(TRANSITION_COOLDOWN);
                    }
                    settle(&mut camera);
                }
                assert!(camera.is_at_slot(from));

                let before = camera.pose();
                let accepted = camera.request_transition(to);
                assert_eq!(accepted, graph.can_move(from, to, 5), "{from} -> {to}");
                if accepted {
                    assert_eq!(camera.current_slot(), to);
                    assert!(camera.in_transit());
                } else {
                    assert_eq!(camera.current_slot(), from);
                    assert!(!camera.in_transit());
                    assert_eq!(camera.pose(), before);
                }
            }
        }
    }
}
