//! `nav-agent` — the Agent State View consumed by the reservation core.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`state`]     | `MovableState`, `NavigationState`, `ActionState`           |
//! | [`view`]      | `AgentView` trait (read-only seam used by the resolver)    |
//! | [`store`]     | `AgentStore` (SoA arrays implementing `AgentView`)         |
//! | [`builder`]   | `AgentStoreBuilder` (fluent construction)                  |
//!
//! The reservation and obstacle crates only ever *read* agent state.  The
//! steering layer (or a test) owns the store and writes its `pub` arrays
//! between ticks.

pub mod builder;
pub mod state;
pub mod store;
pub mod view;

#[cfg(test)]
mod tests;

pub use builder::AgentStoreBuilder;
pub use state::{ActionState, MovableState, NavigationState};
pub use store::AgentStore;
pub use view::AgentView;
