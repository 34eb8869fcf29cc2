//! Host boundary messages.
//!
//! The host drives the core with [`HostCommand`]s through
//! [`Engine::execute`](crate::engine::Engine::execute) and gets a
//! [`CommandReply`] back synchronously. Everything the core reports on its
//! own initiative is a [`HostEvent`], delivered through the
//! [`HostBridge`](crate::resources::hostbridge::HostBridge) channel.

use crate::serializer::ImportSummary;

#[derive(Clone, Debug, PartialEq)]
pub enum HostCommand {
    /// Toolbar spawn. Accepts direct kinds (`box`, `car`, ...) and recipe ids.
    SpawnPrimitive { kind: String },
    SpawnRecipe { recipe_id: String },
    SetEntityColor { id: String },
    ResetEntityTransform { id: String },
    DeleteEntity { id: String },
    SetDrivePower { value: f32 },
    PlayerAttack,
    UpdateEntityMetadata { id: String, patch: String },
    SetAiEnabled(bool),
    SetCombatEnabled(bool),
    SetSpawnersEnabled(bool),
    EnterDriveMode { id: String },
    ExitDriveMode,
    SetGroundTexture { name: String },
    SetAtmosphere { r: f32, g: f32, b: f32, fog_density: f32 },
    ToggleFog(bool),
    /// `"orbit"` or `"walk"`.
    SetCameraMode { mode: String },
    /// Picking is done host side; the core reports the selection.
    SelectEntity { id: String },
    KeyDown { key: String },
    KeyUp { key: String },
    /// Mouse wheel while driving.
    Zoom { delta: f32 },
    ExportWorld,
    ImportWorld { json: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum CommandReply {
    Ok,
    /// The command named something that does not exist (any more).
    Ignored,
    Spawned { id: String },
    World(String),
    Imported(ImportSummary),
    Failed(String),
}

/// Renderer and scene figures reported on every telemetry tick.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsTick {
    pub fps: f32,
    pub cam_x: f32,
    pub cam_y: f32,
    pub cam_z: f32,
    pub entity_count: usize,
    pub camera_type: String,
    pub light_summary: String,
    pub resolution: String,
    pub vertex_count: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    EntitySelected {
        name: String,
        id: String,
        x: f32,
        y: f32,
        z: f32,
        metadata: String,
    },
    StatsTick(StatsTick),
    RaceTimerTick { elapsed: f32 },
    PlayerHealthChanged { hp: f32 },
    PlayerDied,
    RaceFinished { duration: f32 },
}
