//! `nav-reservation` — who may use which area, and when.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                        |
//! |------------------|-----------------------------------------------------------------|
//! | [`reservation`]  | `TimeWindow` (`[begin, end)`), `Reservation`                     |
//! | [`area`]         | `AreaConfig`, `AreaFootprint`                                   |
//! | [`exclusivity`]  | `ExclusivityTable`, `PairPolicy`, `ExclusivityFlags`            |
//! | [`criticality`]  | `calculate_criticality`, `CriticalityConfig`, `NavigationSnapshot` |
//! | [`resolver`]     | `ConflictResolver`, `Resolution`, `ReservationPolicy`           |
//! | [`container`]    | `ReservationContainer`, `AreaReservations`, `InsertResult`      |
//! | [`loader`]       | `load_exclusivity_csv`, `load_exclusivity_reader`               |
//! | [`error`]        | `ReservationError`, `ReservationResult<T>`                      |
//!
//! # Resolution model (summary)
//!
//! ```text
//! insert(candidate):
//!   collisions = reservations on candidate.area overlapping candidate.window
//!   for c in collisions where exclusive(candidate, c):
//!       if score(candidate) <= score(c) → Rejected (nothing changes)
//!       else                            → flag c for eviction
//!   evict flagged, store candidate     → Inserted
//! ```
//!
//! Non-exclusive collisions coexist untouched.  Rejection is an ordinary
//! outcome; the steering layer waits, re-plans, or retries next tick.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | `insert_batch` resolves areas on Rayon's thread pool.     |
//! | `fx-hash`  | FxHash instead of SipHash for the container indexes.      |
//! | `serde`    | `Serialize`/`Deserialize` on configuration and data types. |

pub mod area;
pub mod container;
pub mod criticality;
pub mod error;
pub mod exclusivity;
pub mod loader;
pub mod reservation;
pub mod resolver;


pub use area::{AreaConfig, AreaFootprint};
pub use container::{AreaReservations, ContainerStats, InsertResult, ReservationContainer};
pub use criticality::{CriticalityConfig, NavigationSnapshot, calculate_criticality};
pub use error::{ReservationError, ReservationResult};
pub use exclusivity::{ExclusivityFlags, ExclusivityTable, PairPolicy};
pub use loader::{load_exclusivity_csv, load_exclusivity_reader};
pub use reservation::{Reservation, TimeWindow};
pub use resolver::{ConflictResolver, ReservationPolicy, Resolution, ResolveDecision};
