//! ECS components.
//!
//! Submodules overview:
//! - [`destroyafter`] – countdown to a delayed destroy
//! - [`group`] – tag component for grouping entities by name
//! - [`handlers`] – per-entity table of message handlers, keyed by name and signature
//! - [`inventory`] – item counts answering the pickup messages in the demo and tests
//! - [`itempickup`] – pickup configuration, runtime state and the `Hidden` marker
//! - [`itemtype`] – item kinds and display data
//! - [`messagingowned`] – marker for systems and observers owned by the messaging layer
//! - [`pooled`] – marker for entities spawned through the object pool

pub mod destroyafter;
pub mod group;
pub mod handlers;
pub mod inventory;
pub mod itempickup;
pub mod itemtype;
pub mod messagingowned;
pub mod pooled;
