//! ECS resources made available to systems.
//!
//! Overview
//! - `dispatcher` – dispatch settings and the resolution cache
//! - `globalevents` – listeners of tree-independent named events
//! - `messagingconfig` – INI-backed settings for the messaging layer
//! - `pool` – object pool free lists and prefabs
//! - `uniqueid` – non-repeating random ID generator
//! - `worldtime` – simulation time and delta
pub mod dispatcher;
pub mod globalevents;
pub mod messagingconfig;
pub mod pool;
pub mod uniqueid;
pub mod worldtime;
