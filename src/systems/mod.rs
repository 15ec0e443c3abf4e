//! Messaging and gameplay systems.
//!
//! Submodules overview
//! - [`audio`] – maintain the audio command queue
//! - [`cache`] – observers that keep the dispatch cache valid
//! - [`destroyafter`] – count down and run delayed destroys
//! - [`dispatch`] – register handlers and send messages upwards
//! - [`globalevents`] – register global listeners and broadcast
//! - [`inventory`] – inventory message handlers
//! - [`itempickup`] – resolve pickups, deplete and reset them
//! - [`pool`] – pool-aware instantiate and destroy
//! - [`time`] – update simulation time and delta

pub mod audio;
pub mod cache;
pub mod destroyafter;
pub mod dispatch;
pub mod globalevents;
pub mod inventory;
pub mod itempickup;
pub mod pool;
pub mod time;
