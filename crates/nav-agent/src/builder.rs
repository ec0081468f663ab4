//! Fluent builder for [`AgentStore`].
//!
//! # Usage
//!
//! ```rust
//! use nav_agent::{AgentStoreBuilder, MovableState};
//! use nav_core::MoverType;
//!
//! let mut store = AgentStoreBuilder::new(3)
//!     .mover_type(MoverType::Car)
//!     .movable(MovableState::new(0.0, 6.0))
//!     .build();
//!
//! assert_eq!(store.count, 3);
//! // Adjust individual agents after building.
//! store.mover_type[2] = MoverType::Pedestrian;
//! ```

use nav_core::MoverType;

use crate::{AgentStore, MovableState};

/// Fluent builder for [`AgentStore`].
///
/// All arrays are allocated up front and filled with the builder's defaults;
/// applications then overwrite individual entries through the `pub` fields.
pub struct AgentStoreBuilder {
    count:      usize,
    mover_type: MoverType,
    movable:    Option<MovableState>,
}

impl AgentStoreBuilder {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            mover_type: MoverType::Unknown,
            movable:    None,
        }
    }

    /// Mover type given to every agent.  Default: `Unknown`.
    pub fn mover_type(mut self, mover_type: MoverType) -> Self {
        self.mover_type = mover_type;
        self
    }

    /// Movable state given to every agent.  Default: none (stationary).
    pub fn movable(mut self, movable: MovableState) -> Self {
        self.movable = Some(movable);
        self
    }

    pub fn build(self) -> AgentStore {
        let mut store = AgentStore::with_capacity(self.count);
        store.mover_type.fill(self.mover_type);
        store.movable.fill(self.movable);
        store
    }
}
