//! `nav-sim` — tick loop orchestrator for the navigation core.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Expiry     — purge reservations whose window ended.
//!   ② Obstacles  — poll classifiers that are due (ObstacleTracker).
//!   ③ Steering   — for each active, non-static agent: deliver buffered
//!                  rejections/evictions, then SteeringModel::plan
//!                  (parallel with the `parallel` feature).
//!   ④ Apply      — every Release / ReleaseAll first, then all Claims as
//!                  one insert_batch per flag set.  Losers are buffered
//!                  for their next steering pass.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Steering phase and per-area batches on Rayon.             |
//! | `fx-hash`  | FxHash in the reservation container.                      |
//! | `serde`    | Serde derives on configuration types.                     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nav_agent::AgentStoreBuilder;
//! use nav_core::SimConfig;
//! use nav_sim::{NavWorldBuilder, NoopObserver, NoopSteering};
//!
//! let store = AgentStoreBuilder::new(100).build();
//! let mut world = NavWorldBuilder::new(SimConfig::default(), store, NoopSteering)
//!     .build()?;
//! world.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod steering;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::NavWorldBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NavObserver, NoopObserver};
pub use steering::{NoopSteering, SteeringContext, SteeringFeedback, SteeringIntent, SteeringModel};
pub use world::NavWorld;
