//! Vignette ECS - Entity Component System
//!
//! A small ECS with per-type map storage and single-threaded, priority-ordered
//! system dispatch. Entity ids only ever increase and are never reused.
//!
//! [`WorldService`] combines a [`World`] with a [`SystemSchedule`] and lets
//! callers switch systems on and off by [`SystemKey`], constructing them through
//! a [`SystemRegistry`] populated once at startup.

mod component;
mod entity;
mod error;
mod query;
mod registry;
mod resource;
mod service;
mod system;
mod world;

pub use component::Component;
pub use entity::Entity;
pub use error::EcsError;
pub use query::ComponentSet;
pub use registry::{SystemKey, SystemRegistry};
pub use service::{SystemHost, WorldService};
pub use system::{with_priority, Prioritized, System, SystemId, SystemSchedule};
pub use world::World;
