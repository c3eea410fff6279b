//! File-based implementation of EquipmentRepository
//!
//! The whole fleet lives in one JSON document. Writes go to a sibling
//! temp file that is renamed over the store, so readers never observe a
//! half-written blob.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use fleetcost_domain::model::EquipmentRecord;
use fleetcost_domain::repository::EquipmentRepository;
use fleetcost_types::{Error, Result};

/// Name of the fleet blob inside the store directory
pub const STORE_FILE_NAME: &str = "equipment-directory.json";

/// JSON file repository for the fleet collection
pub struct FileEquipmentRepository {
    store_path: PathBuf,
}

impl FileEquipmentRepository {
    /// Open a repository rooted at `store_dir`, creating the directory if needed
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join(STORE_FILE_NAME);
        Ok(Self { store_path })
    }

    /// Get the store file path
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    fn temp_path(&self) -> PathBuf {
        self.store_path.with_extension("json.tmp")
    }

    fn write_temp(&self, path: &Path, equipment: &[EquipmentRecord]) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, equipment)?;
        writer.flush()?;
        Ok(())
    }
}

impl EquipmentRepository for FileEquipmentRepository {
    fn read_all(&self) -> Vec<EquipmentRecord> {
        if !self.store_path.exists() {
            return Vec::new();
        }

        let file = match File::open(&self.store_path) {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %self.store_path.display(), error = %e, "store unreadable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(equipment) => equipment,
            Err(e) => {
                warn!(path = %self.store_path.display(), error = %e, "store corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    fn write_all(&self, equipment: &[EquipmentRecord]) -> Result<()> {
        let temp_path = self.temp_path();
        let written = self
            .write_temp(&temp_path, equipment)
            .and_then(|_| fs::rename(&temp_path, &self.store_path).map_err(Error::from));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            warn!(path = %self.store_path.display(), error = %e, "store write failed");
            return Err(Error::Storage(format!("{}: {}", self.store_path.display(), e)));
        }

        debug!(path = %self.store_path.display(), count = equipment.len(), "store written");
        Ok(())
    }
}
