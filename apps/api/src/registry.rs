//! Short-lived registry of generated files, keyed by an opaque download token.
//!
//! Entries expire after a fixed TTL. Expired entries are invisible to `get`
//! immediately and are physically removed (with their work directory) by the
//! periodic `sweep`. `sweep_orphans` clears work directories nobody
//! registered, such as those left by a previous process.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant, SystemTime};

use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
}

impl FileKind {
    pub fn media_type(self) -> &'static str {
        match self {
            FileKind::Pdf => "application/pdf",
            FileKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::Pdf => "PDF",
            FileKind::Docx => "DOCX",
        }
    }
}

impl FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(FileKind::Pdf),
            "docx" => Ok(FileKind::Docx),
            other => Err(format!("Unknown file type '{other}'")),
        }
    }
}

/// The outputs of one successful generation.
#[derive(Debug, Clone)]
pub struct StoredFiles {
    pub name: String,
    pub docx: Option<PathBuf>,
    pub pdf: Option<PathBuf>,
    /// Per-request directory holding the files; removed on expiry.
    pub work_dir: PathBuf,
    created_at: Instant,
}

impl StoredFiles {
    pub fn new(name: String, docx: Option<PathBuf>, pdf: Option<PathBuf>, work_dir: PathBuf) -> Self {
        Self {
            name,
            docx,
            pdf,
            work_dir,
            created_at: Instant::now(),
        }
    }

    pub fn path(&self, kind: FileKind) -> Option<&PathBuf> {
        match kind {
            FileKind::Pdf => self.pdf.as_ref(),
            FileKind::Docx => self.docx.as_ref(),
        }
    }
}

pub struct FileRegistry {
    entries: RwLock<HashMap<Uuid, StoredFiles>>,
    ttl: Duration,
}

impl FileRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    // Map operations never panic midway, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, StoredFiles>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, StoredFiles>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers files and returns their download token.
    pub fn insert(&self, files: StoredFiles) -> Uuid {
        let id = Uuid::new_v4();
        debug!("Registered files {id} for '{}'", files.name);
        self.write().insert(id, files);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<StoredFiles> {
        self.get_at(id, Instant::now())
    }

    fn get_at(&self, id: &Uuid, now: Instant) -> Option<StoredFiles> {
        self.read()
            .get(id)
            .filter(|files| !self.is_expired(files, now))
            .cloned()
    }

    fn is_expired(&self, files: &StoredFiles, now: Instant) -> bool {
        now.saturating_duration_since(files.created_at) >= self.ttl
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Drops expired entries and deletes their work directories. Returns how
    /// many entries were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let expired: Vec<StoredFiles> = {
            let mut entries = self.write();
            let ids: Vec<Uuid> = entries
                .iter()
                .filter(|(_, files)| self.is_expired(files, now))
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| entries.remove(id)).collect()
        };

        for files in &expired {
            if let Err(e) = std::fs::remove_dir_all(&files.work_dir) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not remove {}: {e}", files.work_dir.display());
                }
            }
        }
        if !expired.is_empty() {
            info!(
                "Swept {} expired file sets, {} still live",
                expired.len(),
                self.len()
            );
        }
        expired.len()
    }

    /// Deletes directories under `root` that no entry owns and that were last
    /// modified more than one TTL ago. Returns how many were removed.
    pub fn sweep_orphans(&self, root: &Path) -> usize {
        self.sweep_orphans_at(root, SystemTime::now())
    }

    fn sweep_orphans_at(&self, root: &Path, now: SystemTime) -> usize {
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not scan {}: {e}", root.display());
                }
                return 0;
            }
        };
        let owned: HashSet<PathBuf> = self
            .read()
            .values()
            .map(|files| files.work_dir.clone())
            .collect();

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if owned.contains(&path) {
                continue;
            }
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            let stale = meta
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age >= self.ttl);
            if !meta.is_dir() || !stale {
                continue;
            }
            match std::fs::remove_dir_all(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Could not remove orphan {}: {e}", path.display()),
            }
        }
        if removed > 0 {
            info!("Removed {removed} orphaned work dirs");
        }
        removed
    }
}
