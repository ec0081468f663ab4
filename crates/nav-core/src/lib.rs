//! `nav-core` — foundational types shared by every `nav-*` crate.
//!
//! This crate has no `nav-*` dependencies and only `thiserror` (plus optional
//! `serde`) from the outside world.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `AreaId`, `CollisionId`                    |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`transform`]   | `Vec2`, `Transform`, `TransformTolerance`             |
//! | [`mover`]       | `MoverType` enum + coarse tag classification          |
//! | [`error`]       | `NavError`, `NavResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod mover;
pub mod time;
pub mod transform;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{NavError, NavResult};
pub use ids::{AgentId, AreaId, CollisionId};
pub use mover::MoverType;
pub use time::{SimClock, SimConfig, Tick};
pub use transform::{Transform, TransformTolerance, Vec2};
