//! Calendar stores.
//!
//! The reconciler treats its store as the authoritative state: it queries a
//! time window, then creates or removes events. It keeps no cache.
//!
//! Implementations must return query results in a deterministic order, since
//! update and delete act on the first matching event.

mod directory;
mod memory;

pub use directory::DirStore;
pub use memory::MemoryStore;

use crate::error::CalmailResult;
use crate::event::{EventOptions, StoredEvent, TimeWindow};

pub trait CalendarStore {
    /// Events overlapping `window`, in the store's documented order.
    fn events_in(&self, window: &TimeWindow) -> CalmailResult<Vec<StoredEvent>>;

    /// Create an event and return it with its store-assigned id.
    fn create_event(
        &mut self,
        title: &str,
        window: &TimeWindow,
        options: EventOptions,
    ) -> CalmailResult<StoredEvent>;

    /// Remove an event previously returned by this store.
    fn delete_event(&mut self, event: &StoredEvent) -> CalmailResult<()>;
}
