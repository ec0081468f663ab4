//! `nav-obstacle` — should an agent's collision footprint be baked into the
//! navigation mesh as a static obstacle, or negotiate as a dynamic one?
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`rule`]        | `ObstacleState`, `ObstacleRule`, `ObstacleSnapshot`, `ClassifierConfig` |
//! | [`classifier`]  | `ObstacleClassifier`, `ObstacleTransition`                  |
//! | [`poll_queue`]  | `PollQueue` (`BTreeMap<Tick, Vec<AgentId>>`)                |
//! | [`tracker`]     | `ObstacleTracker`, `ObstacleEvent`                          |
//! | [`view`]        | `ObstacleView` trait, implemented for `AgentStore`          |
//! | [`error`]       | `ObstacleError`, `ObstacleResult<T>`                        |
//!
//! # Polling model
//!
//! Classification is polled at a fixed period per agent rather than driven
//! by change notifications:
//!
//! ```text
//! every poll_period_ticks, per registered agent:
//!   static? = rule(snapshot)
//!   DYNAMIC → STATIC   when static?    (BecameStatic)
//!   STATIC  → DYNAMIC  when !static?   (BecameDynamic)
//!   STATIC and transform drifted       (StaticTransformUpdated)
//! ```
//!
//! The mesh update layer consumes the events; this crate never touches mesh
//! data.

pub mod classifier;
pub mod error;
pub mod poll_queue;
pub mod rule;
pub mod tracker;
pub mod view;

#[cfg(test)]
mod tests;

pub use classifier::{ObstacleClassifier, ObstacleTransition};
pub use error::{ObstacleError, ObstacleResult};
pub use poll_queue::PollQueue;
pub use rule::{ClassifierConfig, ObstacleRule, ObstacleSnapshot, ObstacleState};
pub use tracker::{ObstacleEvent, ObstacleTracker};
pub use view::ObstacleView;
