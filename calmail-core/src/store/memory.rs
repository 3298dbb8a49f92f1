//! In-memory calendar store.

use crate::error::{CalmailError, CalmailResult};
use crate::event::{EventOptions, StoredEvent, TimeWindow};
use crate::store::CalendarStore;

/// A store backed by a `Vec`, yielding events in creation order.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    events: Vec<StoredEvent>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[StoredEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl CalendarStore for MemoryStore {
    fn events_in(&self, window: &TimeWindow) -> CalmailResult<Vec<StoredEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| window.overlaps(e.start, e.end))
            .cloned()
            .collect())
    }

    fn create_event(
        &mut self,
        title: &str,
        window: &TimeWindow,
        options: EventOptions,
    ) -> CalmailResult<StoredEvent> {
        self.next_id += 1;
        let event = StoredEvent::new(
            format!("mem-{}", self.next_id),
            title,
            window.start,
            window.end,
            options,
        );
        self.events.push(event.clone());
        Ok(event)
    }

    fn delete_event(&mut self, event: &StoredEvent) -> CalmailResult<()> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == event.id)
            .ok_or_else(|| CalmailError::Store(format!("No event with id {}", event.id)))?;
        self.events.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_query_preserves_creation_order() {
        let mut store = MemoryStore::new();
        let window = TimeWindow::new(at(9, 0), at(10, 0));
        store.create_event("B", &window, EventOptions::default()).unwrap();
        store.create_event("A", &window, EventOptions::default()).unwrap();

        let titles: Vec<_> = store
            .events_in(&window)
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();

        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn test_query_filters_by_window() {
        let mut store = MemoryStore::new();
        store
            .create_event("Morning", &TimeWindow::new(at(9, 0), at(10, 0)), EventOptions::default())
            .unwrap();
        store
            .create_event("Afternoon", &TimeWindow::new(at(14, 0), at(15, 0)), EventOptions::default())
            .unwrap();

        let found = store.events_in(&TimeWindow::new(at(13, 0), at(16, 0))).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Afternoon");
    }

    #[test]
    fn test_delete_unknown_event_errors() {
        let mut store = MemoryStore::new();
        let window = TimeWindow::new(at(9, 0), at(10, 0));
        let event = store.create_event("A", &window, EventOptions::default()).unwrap();

        store.delete_event(&event).unwrap();

        assert!(store.is_empty());
        assert!(store.delete_event(&event).is_err());
    }
}
