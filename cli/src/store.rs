use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pairup_core::{SaveStore, Snapshot};

/// Keeps the snapshot as a JSON file, replaced atomically on every save.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, json: &str) -> std::io::Result<()> {
        let parent = self.path.parent().unwrap_or(Path::new(""));
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)
    }
}

impl SaveStore for FileStore {
    fn save(&mut self, snapshot: &Snapshot) {
        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(err) => {
                log::error!("Could not serialize game: {}", err);
                return;
            }
        };
        if let Err(err) = self.write(&json) {
            log::error!("Could not save game to {}: {}", self.path.display(), err);
        }
    }

    fn load(&self) -> Option<Snapshot> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                log::error!("Could not read {}: {}", self.path.display(), err);
                return None;
            }
        };
        match Snapshot::from_json(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                log::warn!("Ignoring unreadable save {}: {}", self.path.display(), err);
                None
            }
        }
    }

    fn clear(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => log::info!("Removed {}", self.path.display()),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => log::error!("Could not remove {}: {}", self.path.display(), err),
        }
    }
}
