//! Recovery checkpoint files in the scratch directory.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::config::{CheckpointConfig, DEFAULT_EXTENSION, DEFAULT_PREFIX};
use crate::codec::SessionCodec;
use crate::error::{PersistenceError, Result};
use crate::identity::ChecksumIdentity;
use crate::types::PersistedSession;

/// A checkpoint file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryCheckpoint {
    pub identity: ChecksumIdentity,
    pub path: PathBuf,
    pub last_written_at: DateTime<Utc>,
}

/// A checkpoint worth offering to the user on open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryOffer {
    pub identity: ChecksumIdentity,
    pub path: PathBuf,
    pub modified_at: DateTime<Utc>,
}

/// Reads and writes recovery checkpoints named after a design's identity.
#[derive(Debug, Clone)]
pub struct RecoveryCheckpointStore {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl Default for RecoveryCheckpointStore {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl RecoveryCheckpointStore {
    /// Store in `dir` with the default naming.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_naming(dir, DEFAULT_PREFIX, DEFAULT_EXTENSION)
    }

    /// Store in `dir` with a custom file name prefix and extension.
    pub fn with_naming(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// Store described by a config.
    pub fn from_config(config: &CheckpointConfig) -> Self {
        Self::with_naming(
            config.resolved_dir(),
            config.prefix.clone(),
            config.extension.clone(),
        )
    }

    /// Scratch directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Checkpoint path for an identity: `<dir>/<prefix>-<hex>.<ext>`.
    pub fn path_for(&self, identity: ChecksumIdentity) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.{}",
            self.prefix,
            identity.to_hex(),
            self.extension
        ))
    }

    /// Whether a checkpoint file exists for the identity.
    pub fn exists(&self, identity: ChecksumIdentity) -> bool {
        self.path_for(identity).is_file()
    }

    /// Whether the checkpoint file can be opened for reading.
    pub fn is_readable(&self, identity: ChecksumIdentity) -> bool {
        File::open(self.path_for(identity)).is_ok()
    }

    /// Last modification time of the checkpoint file.
    pub fn modified_at(&self, identity: ChecksumIdentity) -> Option<DateTime<Utc>> {
        modified_time(&self.path_for(identity))
    }

    /// Encode a session and write it atomically.
    ///
    /// The bytes go to a temp file in the scratch directory which is synced
    /// and renamed over the checkpoint, so a crash mid-write never leaves a
    /// truncated checkpoint behind.
    pub fn write(
        &self,
        identity: ChecksumIdentity,
        session: &PersistedSession,
    ) -> Result<RecoveryCheckpoint> {
        let bytes = SessionCodec::encode(session)?;
        let path = self.path_for(identity);
        let temp_path = path.with_extension(format!("{}.tmp", self.extension));

        fs::create_dir_all(&self.dir)
            .map_err(|e| PersistenceError::io("create directory", &self.dir, e))?;

        if let Err(e) = stage_and_rename(&temp_path, &path, &bytes) {
            if temp_path.exists() {
                let _ = fs::remove_file(&temp_path);
            }
            return Err(e);
        }

        let last_written_at = modified_time(&path).unwrap_or_else(Utc::now);
        tracing::info!(
            "Wrote recovery checkpoint {} ({} bytes)",
            path.display(),
            bytes.len()
        );

        Ok(RecoveryCheckpoint {
            identity,
            path,
            last_written_at,
        })
    }

    /// Read and decode the checkpoint for an identity.
    pub fn read(&self, identity: ChecksumIdentity) -> Result<PersistedSession> {
        let path = self.path_for(identity);
        let bytes = fs::read(&path).map_err(|e| PersistenceError::io("read", &path, e))?;

        let session = SessionCodec::decode(&bytes)?;
        tracing::info!(
            "Loaded recovery checkpoint {} ({} panels)",
            path.display(),
            session.subwindow_states.len()
        );
        Ok(session)
    }

    /// Delete the checkpoint for an identity. Returns true if a file was removed.
    pub fn delete(&self, identity: ChecksumIdentity) -> bool {
        let path = self.path_for(identity);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("Deleted recovery checkpoint {}", path.display());
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(
                    "Could not delete recovery checkpoint {}: {}",
                    path.display(),
                    e
                );
                false
            }
        }
    }

    /// Decide whether to offer recovery on open.
    ///
    /// A checkpoint is offered when it exists, can be read, and was written
    /// after the primary save. Without a primary save time any readable
    /// checkpoint qualifies.
    pub fn recovery_offer(
        &self,
        identity: ChecksumIdentity,
        primary_saved_at: Option<DateTime<Utc>>,
    ) -> Option<RecoveryOffer> {
        if !self.exists(identity) || !self.is_readable(identity) {
            return None;
        }

        let modified_at = self.modified_at(identity)?;
        if let Some(saved_at) = primary_saved_at
            && modified_at <= saved_at
        {
            tracing::debug!(
                "Checkpoint for {} ({}) is not newer than the design ({})",
                identity,
                modified_at,
                saved_at
            );
            return None;
        }

        Some(RecoveryOffer {
            identity,
            path: self.path_for(identity),
            modified_at,
        })
    }

    /// All checkpoints in the scratch directory that follow this store's
    /// naming, newest first.
    pub fn list(&self) -> Result<Vec<RecoveryCheckpoint>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistenceError::io("list", &self.dir, e)),
        };

        let mut checkpoints = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PersistenceError::io("list", &self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(identity) = entry.file_name().to_str().and_then(|n| self.parse_name(n))
            else {
                continue;
            };

            if let Some(last_written_at) = modified_time(&path) {
                checkpoints.push(RecoveryCheckpoint {
                    identity,
                    path,
                    last_written_at,
                });
            }
        }

        checkpoints.sort_by(|a, b| b.last_written_at.cmp(&a.last_written_at));
        Ok(checkpoints)
    }

    fn parse_name(&self, file_name: &str) -> Option<ChecksumIdentity> {
        let hex = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('-')?
            .strip_suffix(self.extension.as_str())?
            .strip_suffix('.')?;
        ChecksumIdentity::from_hex(hex)
    }
}

fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

/// Write `bytes` to `temp_path`, flush it to disk and move it over `path`.
fn stage_and_rename(temp_path: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file =
        File::create(temp_path).map_err(|e| PersistenceError::io("create", temp_path, e))?;
    file.write_all(bytes)
        .map_err(|e| PersistenceError::io("write", temp_path, e))?;
    file.sync_all()
        .map_err(|e| PersistenceError::io("sync", temp_path, e))?;
    drop(file);

    fs::rename(temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.to_path_buf(),
        target_path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point, Rect, SubwindowBlob, ViewState};
    use chrono::Duration;
    use tempfile::tempdir;

    fn sample_session() -> PersistedSession {
        let mut session = PersistedSession::new(
            b"board".to_vec(),
            ViewState {
                viewport_offset: Point::new(1, 2),
                frame_location: Point::new(3, 4),
                frame_bounds: Rect::new(3, 4, 640, 480),
            },
        );
        session
            .subwindow_states
            .push(SubwindowBlob::new("colors", 1, vec![9, 9]));
        session
    }

    #[test]
    fn test_path_naming() {
        let store = RecoveryCheckpointStore::new("/tmp/scratch");
        let identity = ChecksumIdentity::from_value(0xABCD1234);
        assert_eq!(
            store.path_for(identity),
            PathBuf::from("/tmp/scratch/recovery-abcd1234.frb")
        );

        let legacy = RecoveryCheckpointStore::from_config(&CheckpointConfig {
            scratch_dir: Some(PathBuf::from("/tmp/scratch")),
            ..CheckpointConfig::legacy()
        });
        assert_eq!(
            legacy.path_for(ChecksumIdentity::from_value(0x1f)),
            PathBuf::from("/tmp/scratch/freerouting-1f.frb")
        );
    }

    #[test]
    fn test_write_read_delete() {
        let dir = tempdir().unwrap();
        let store = RecoveryCheckpointStore::new(dir.path());
        let identity = ChecksumIdentity::from_value(0xABCD1234);
        let session = sample_session();

        assert!(!store.exists(identity));
        let checkpoint = store.write(identity, &session).unwrap();
        assert_eq!(checkpoint.path, store.path_for(identity));
        assert!(store.exists(identity));
        assert!(store.is_readable(identity));

        // No temp file left behind
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);

        assert_eq!(store.read(identity).unwrap(), session);

        assert!(store.delete(identity));
        assert!(!store.exists(identity));
        assert!(!store.delete(identity));
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempdir().unwrap();
        let store = RecoveryCheckpointStore::new(dir.path());
        let identity = ChecksumIdentity::from_value(7);

        store.write(identity, &sample_session()).unwrap();
        let mut newer = sample_session();
        newer.board_state = b"rerouted".to_vec();
        store.write(identity, &newer).unwrap();

        assert_eq!(store.read(identity).unwrap().board_state, b"rerouted");
    }

    #[test]
    fn test_write_creates_scratch_dir() {
        let dir = tempdir().unwrap();
        let store = RecoveryCheckpointStore::new(dir.path().join("nested").join("scratch"));
        store
            .write(ChecksumIdentity::from_value(1), &sample_session())
            .unwrap();
        assert!(store.exists(ChecksumIdentity::from_value(1)));
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = RecoveryCheckpointStore::new(dir.path());
        let identity = ChecksumIdentity::from_value(3);

        // A non-empty directory where the checkpoint should go makes the final step fail
        let target = store.path_for(identity);
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupied"), b"x").unwrap();

        let err = store.write(identity, &sample_session()).unwrap_err();
        assert!(matches!(err, PersistenceError::AtomicWriteFailed { .. }));

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![target.file_name().unwrap().to_os_string()]);
    }

    #[test]
    fn test_read_corrupted_checkpoint() {
        let dir = tempdir().unwrap();
        let store = RecoveryCheckpointStore::new(dir.path());
        let identity = ChecksumIdentity::from_value(2);
        fs::write(store.path_for(identity), b"garbage that is not a session").unwrap();

        let err = store.read(identity).unwrap_err();
        assert!(err.is_codec_error());
    }

    #[test]
    fn test_read_missing_checkpoint() {
        let dir = tempdir().unwrap();
        let store = RecoveryCheckpointStore::new(dir.path());
        let err = store.read(ChecksumIdentity::from_value(3)).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }

    #[test]
    fn test_recovery_offer() {
        let dir = tempdir().unwrap();
        let store = RecoveryCheckpointStore::new(dir.path());
        let identity = ChecksumIdentity::from_value(0xABCD1234);

        assert!(store.recovery_offer(identity, None).is_none());

        store.write(identity, &sample_session()).unwrap();
        let written = store.modified_at(identity).unwrap();

        let offer = store.recovery_offer(identity, None).unwrap();
        assert_eq!(offer.path, store.path_for(identity));
        assert_eq!(offer.modified_at, written);

        // Design saved before the checkpoint
        assert!(
            store
                .recovery_offer(identity, Some(written - Duration::seconds(60)))
                .is_some()
        );

        // Design saved at or after the checkpoint
        assert!(store.recovery_offer(identity, Some(written)).is_none());
        assert!(
            store
                .recovery_offer(identity, Some(written + Duration::seconds(60)))
                .is_none()
        );
    }

    #[test]
    fn test_list_filters_by_naming() {
        let dir = tempdir().unwrap();
        let store = RecoveryCheckpointStore::new(dir.path());

        store
            .write(ChecksumIdentity::from_value(0xAB), &sample_session())
            .unwrap();
        store
            .write(ChecksumIdentity::from_value(0xCD), &sample_session())
            .unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(dir.path().join("recovery-zz.frb"), b"x").unwrap();
        fs::write(dir.path().join("freerouting-ab.frb"), b"x").unwrap();

        let mut identities: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|c| c.identity.value())
            .collect();
        identities.sort();
        assert_eq!(identities, vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let store = RecoveryCheckpointStore::new(dir.path().join("absent"));
        assert!(store.list().unwrap().is_empty());
    }
}
