//! Process-scoped state containers.
//!
//! Two independently owned stores, each with a closed set of synchronous
//! transitions. Readers take snapshots or subscribe through `watch` channels.

mod selection;
mod users;

pub use selection::SelectionStore;
pub use users::{UserListSnapshot, UserStore};
