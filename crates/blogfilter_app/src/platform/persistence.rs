use std::fs;
use std::path::Path;

use blogfilter_engine::atomic_write;
use filter_logging::{filter_error, filter_warn};
use serde::{Deserialize, Serialize};

const FILTER_STATE_FILENAME: &str = ".blogfilter_state.ron";

/// The persisted side of `FilterState`: just the active tag. An absent file
/// means All, mirroring the browser original where the storage key was
/// removed for the default state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedFilter {
    active_tag: Option<String>,
}

pub(crate) fn load_filter_tag(state_dir: &Path) -> Option<String> {
    let path = state_dir.join(FILTER_STATE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            filter_warn!("Failed to read persisted filter from {:?}: {}", path, err);
            return None;
        }
    };

    match ron::from_str::<PersistedFilter>(&content) {
        Ok(state) => state.active_tag,
        Err(err) => {
            filter_warn!("Failed to parse persisted filter from {:?}: {}", path, err);
            None
        }
    }
}

pub(crate) fn save_filter_tag(state_dir: &Path, tag: Option<&str>) {
    let path = state_dir.join(FILTER_STATE_FILENAME);
    let Some(tag) = tag else {
        // All is represented by the absence of the file.
        if let Err(err) = fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                filter_warn!("Failed to remove persisted filter {:?}: {}", path, err);
            }
        }
        return;
    };

    let state = PersistedFilter {
        active_tag: Some(tag.to_string()),
    };
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&state, pretty) {
        Ok(text) => text,
        Err(err) => {
            filter_error!("Failed to serialize persisted filter: {}", err);
            return;
        }
    };

    if let Err(err) = atomic_write(state_dir, FILTER_STATE_FILENAME, &content) {
        filter_error!("Failed to write persisted filter to {:?}: {}", state_dir, err);
    }
}

#[cfg(test)]
mod tests {
    use super::{load_filter_tag, save_filter_tag};
    use tempfile::TempDir;

    #[test]
    fn round_trips_the_active_tag() {
        let temp = TempDir::new().unwrap();
        assert_eq!(load_filter_tag(temp.path()), None);

        save_filter_tag(temp.path(), Some("go"));
        assert_eq!(load_filter_tag(temp.path()), Some("go".to_string()));

        save_filter_tag(temp.path(), Some("rust"));
        assert_eq!(load_filter_tag(temp.path()), Some("rust".to_string()));
    }

    #[test]
    fn all_removes_the_state_file() {
        let temp = TempDir::new().unwrap();
        save_filter_tag(temp.path(), Some("go"));
        save_filter_tag(temp.path(), None);
        assert_eq!(load_filter_tag(temp.path()), None);
        // Removing twice is harmless.
        save_filter_tag(temp.path(), None);
    }

    #[test]
    fn corrupt_state_reads_as_all() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".blogfilter_state.ron"), "(((").unwrap();
        assert_eq!(load_filter_tag(temp.path()), None);
    }
}
