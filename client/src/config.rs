use nightshift::EntityId;

// Scene
pub const WALL_ENTITY: EntityId = EntityId(0);

// Logging
pub const STATUS_INTERVAL: f32 = 5.0; // seconds between status lines
