//! ECS components for logical entities.
//!
//! Identity, kind and transform are present on every entity. The rest is
//! attached by the registry according to kind and recipe role:
//!
//! - [`appearance`] – colour and child parts handed to the presentation layer
//! - [`behavior`] – recipe role (hostile, spawner, building, dashboard)
//! - [`combatstats`] – hp and attack/move tuning of damageable entities
//! - [`effects`] – hit flash, damage popups, death shrink, health bar
//! - [`entityid`] – stable string id, display name, creation order
//! - [`entitykind`] – primitive / vehicle / finish zone / recipe instance tag
//! - [`legs`] – walker leg swing state
//! - [`mob`] – AI mode and per-mob scratch state
//! - [`physicsbody`] – handle of the backing rigid body
//! - [`spawner`] – spawner timers and child tracking
//! - [`transform`] – last synced position and rotation

pub mod appearance;
pub mod behavior;
pub mod combatstats;
pub mod effects;
pub mod entityid;
pub mod entitykind;
pub mod legs;
pub mod mob;
pub mod physicsbody;
pub mod spawner;
pub mod transform;
