//! Directory-backed calendar store: one `.ics` file per event.

use std::path::{Path, PathBuf};

use crate::error::{CalmailError, CalmailResult};
use crate::event::{EventOptions, StoredEvent, TimeWindow};
use crate::ics::{generate_ics, read_stored_event};
use crate::store::CalendarStore;

/// Events live in `<dir>/<YYYY-MM-DDTHHMM>__<slug>.ics`.
///
/// Queries yield events ordered by start time, then by file name.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

/// A stored event together with the file it was read from.
struct EventFile {
    path: PathBuf,
    event: StoredEvent,
}

impl DirStore {
    /// Open the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> CalmailResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(DirStore { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Load every readable event file, in query order.
    fn event_files(&self) -> CalmailResult<Vec<EventFile>> {
        let entries = std::fs::read_dir(&self.dir)?;

        let mut files: Vec<EventFile> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "ics"))
            .filter_map(|path| {
                let content = match std::fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable event file");
                        return None;
                    }
                };
                match read_stored_event(&content) {
                    Some(event) => Some(EventFile { path, event }),
                    None => {
                        tracing::warn!(path = %path.display(), "Skipping malformed event file");
                        None
                    }
                }
            })
            .collect();

        files.sort_by(|a, b| {
            a.event
                .start
                .cmp(&b.event.start)
                .then_with(|| a.path.cmp(&b.path))
        });

        Ok(files)
    }

    /// Pick a file name for a new event, adding -2, -3, etc. on collision.
    fn unique_filename_for(&self, title: &str, window: &TimeWindow) -> CalmailResult<String> {
        let base = format!("{}__{}", window.start.format("%Y-%m-%dT%H%M"), slugify(title));

        if !self.dir.join(format!("{}.ics", base)).exists() {
            return Ok(format!("{}.ics", base));
        }

        for n in 2..=100 {
            let suffixed = format!("{}-{}.ics", base, n);
            if !self.dir.join(&suffixed).exists() {
                return Ok(suffixed);
            }
        }

        Err(CalmailError::Store(format!(
            "Too many file name collisions for '{}'",
            base
        )))
    }
}

impl CalendarStore for DirStore {
    fn events_in(&self, window: &TimeWindow) -> CalmailResult<Vec<StoredEvent>> {
        Ok(self
            .event_files()?
            .into_iter()
            .map(|f| f.event)
            .filter(|e| window.overlaps(e.start, e.end))
            .collect())
    }

    fn create_event(
        &mut self,
        title: &str,
        window: &TimeWindow,
        options: EventOptions,
    ) -> CalmailResult<StoredEvent> {
        let event = StoredEvent::new(
            uuid::Uuid::new_v4().to_string(),
            title,
            window.start,
            window.end,
            options,
        );

        let filename = self.unique_filename_for(title, window)?;
        let content = generate_ics(&event);
        std::fs::write(self.dir.join(&filename), content)?;

        tracing::debug!(file = %filename, id = %event.id, "Wrote event file");
        Ok(event)
    }

    fn delete_event(&mut self, event: &StoredEvent) -> CalmailResult<()> {
        let file = self
            .event_files()?
            .into_iter()
            .find(|f| f.event.id == event.id)
            .ok_or_else(|| CalmailError::Store(format!("No event file with id {}", event.id)))?;

        std::fs::remove_file(&file.path)?;
        Ok(())
    }
}

/// Convert a string to a filename-safe slug
fn slugify(s: &str) -> String {
    let slug: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(50)
        .collect();

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}
