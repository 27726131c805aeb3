//! File-backed settings store
//!
//! Each task record lives in its own file under a settings directory, the
//! way the firmware keeps one custom-settings blob per task.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;

use log::debug;
use touchmap_core::{SettingsStore, TaskIndex};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn task_path(&self, task: TaskIndex) -> PathBuf {
        self.dir.join(format!("task_{task}.dat"))
    }

    /// Path of an auxiliary file next to the task records
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl SettingsStore for FileStore {
    type Error = io::Error;

    fn load(&mut self, task: TaskIndex, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let path = self.task_path(task);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let len = data.len().min(buf.len());
        buf[..len].copy_from_slice(&data[..len]);
        debug!("Read {} bytes from {}", len, path.display());
        Ok(len)
    }

    fn save(&mut self, task: TaskIndex, data: &[u8]) -> Result<(), Self::Error> {
        let path = self.task_path(task);
        fs::write(&path, data)?;
        debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use touchmap_core::settings::RECORD_SIZE;
    use touchmap_core::{Point, TouchObject, TouchSettings};

    #[test]
    fn test_missing_task_file_reads_as_empty() {
        let dir = tempdir().expect("tempdir");
        let mut store = FileStore::new(dir.path()).expect("store");

        let mut buf = [0u8; 8];
        assert_eq!(store.load(3, &mut buf).expect("load"), 0);
    }

    #[test]
    fn test_settings_survive_a_round_trip_through_files() {
        let dir = tempdir().expect("tempdir");
        let mut store = FileStore::new(dir.path().join("nested")).expect("store");

        let mut settings = TouchSettings::default();
        settings
            .objects
            .push(TouchObject::new("btn_ok", Point::new(20, 260), Point::new(110, 300)))
            .expect("room for object");
        settings.save(&mut store, 2).expect("save");

        let written = fs::read(store.task_path(2)).expect("task file");
        assert_eq!(written.len(), RECORD_SIZE);

        let loaded = TouchSettings::load(&mut store, 2).expect("load");
        assert_eq!(loaded, settings);
    }
}
