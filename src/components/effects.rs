//! Timed combat feedback owned by the combat resolver.
//!
//! Every effect is a component on the entity it decorates. The combat
//! upkeep system counts them down each frame and removes them when they
//! expire. Because they live on the entity, destroying the entity cancels
//! them too: no effect can outlive its target.
//!
//! - [`HitFlash`]: the entity is tinted red for [`HIT_FLASH_SECONDS`]
//! - [`DamagePopups`]: floating damage numbers that drift up and fade out
//! - [`Dying`]: the entity is shrunk and removed after [`DEATH_SECONDS`]
//! - [`HealthBar`]: proportional health indicator

use bevy_ecs::prelude::Component;
use smallvec::SmallVec;

pub const HIT_FLASH_SECONDS: f32 = 0.1;
pub const DEATH_SECONDS: f32 = 0.15;
pub const DEATH_SCALE: f32 = 0.1;
/// Alpha lost by a damage popup every frame.
pub const POPUP_FADE_PER_FRAME: f32 = 0.02;
/// Pixels a damage popup rises every frame.
pub const POPUP_RISE_PER_FRAME: f32 = 2.0;
/// Initial vertical offset of a damage popup, in pixels above the entity.
pub const POPUP_START_OFFSET: f32 = -100.0;

/// Red tint countdown.
#[derive(Component, Clone, Copy, Debug)]
pub struct HitFlash {
    pub remaining: f32,
}

impl Default for HitFlash {
    fn default() -> Self {
        Self {
            remaining: HIT_FLASH_SECONDS,
        }
    }
}

/// Death countdown. Entities carrying it are ignored by the directors.
#[derive(Component, Clone, Copy, Debug)]
pub struct Dying {
    pub remaining: f32,
}

impl Default for Dying {
    fn default() -> Self {
        Self {
            remaining: DEATH_SECONDS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DamagePopup {
    /// Unique per entity, lets the host tell concurrent popups apart.
    pub serial: u32,
    pub text: String,
    pub offset_y: f32,
    pub alpha: f32,
}

impl DamagePopup {
    pub fn new(serial: u32, amount: f32) -> Self {
        Self {
            serial,
            text: format!("-{}", amount.floor()),
            offset_y: POPUP_START_OFFSET,
            alpha: 1.0,
        }
    }

    /// Advance one frame. Returns `false` once fully faded.
    pub fn advance(&mut self) -> bool {
        self.offset_y -= POPUP_RISE_PER_FRAME;
        self.alpha -= POPUP_FADE_PER_FRAME;
        self.alpha > 0.0
    }
}

#[derive(Component, Clone, Debug, Default)]
pub struct DamagePopups {
    pub active: SmallVec<[DamagePopup; 2]>,
    pub next_serial: u32,
}

impl DamagePopups {
    pub fn push(&mut self, amount: f32) -> &DamagePopup {
        self.next_serial += 1;
        let index = self.active.len();
        self.active.push(DamagePopup::new(self.next_serial, amount));
        &self.active[index]
    }
}

/// Health indicator. `shown` is the fraction last reported to the host.
#[derive(Component, Clone, Copy, Debug)]
pub struct HealthBar {
    pub shown: f32,
}

impl Default for HealthBar {
    fn default() -> Self {
        Self { shown: 1.0 }
    }
}
