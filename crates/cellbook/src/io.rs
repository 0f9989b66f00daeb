//! Document load/save boundary
//!
//! Where documents are stored is up to a [`DocumentSource`]; the engine only
//! needs "give me the cells of this document" and "store these cells". Both
//! are asynchronous and suspend only the request that issued them.
//!
//! [`SyncClient`] adds last-request-wins ordering on top of a source: every
//! request for a target gets a generation number, and a response is handed
//! back as [`Fetched::Current`] only if no newer request for the same target
//! was issued while it was in flight. Older responses come back as
//! [`Fetched::Superseded`] and must not be applied.
//!
//! Saves to one target are also written one at a time, in the order they
//! were issued, and a save that is already superseded when its turn comes is
//! skipped. The last write to reach the source is therefore always the
//! newest one.

use crate::document::{parse_document, write_document};
use crate::error::{BoxError, Error, Result};
use crate::sheet::Sheet;
use ahash::AHashMap;
use cellbook_core::{Cell, DocumentRef};
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Where worksheet documents are loaded from and saved to
pub trait DocumentSource {
    /// Fetch the cells of a document
    fn load(
        &self,
        target: &DocumentRef,
    ) -> impl Future<Output = std::result::Result<Vec<Cell>, BoxError>> + Send;

    /// Store the cells of a document
    fn save(
        &self,
        target: &DocumentRef,
        cells: &[Cell],
    ) -> impl Future<Output = std::result::Result<(), BoxError>> + Send;
}

/// Outcome of a request that may have been overtaken by a newer one
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// The response to the most recent request for its target
    Current(T),
    /// A newer request for the same target was issued; discard this one
    Superseded,
}

impl<T> Fetched<T> {
    /// The value, if current
    pub fn current(self) -> Option<T> {
        match self {
            Fetched::Current(value) => Some(value),
            Fetched::Superseded => None,
        }
    }

    /// Check if superseded
    pub fn is_superseded(&self) -> bool {
        matches!(self, Fetched::Superseded)
    }
}

/// Latest issued generation per target
#[derive(Debug, Default)]
struct Generations {
    latest: Mutex<AHashMap<DocumentRef, u64>>,
}

impl Generations {
    fn issue(&self, target: &DocumentRef) -> u64 {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = latest.get(target).map_or(1, |g| g + 1);
        latest.insert(target.clone(), generation);
        generation
    }

    fn is_current(&self, target: &DocumentRef, generation: u64) -> bool {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.get(target) == Some(&generation)
    }
}

/// A [`DocumentSource`] wrapper applying last-request-wins per target
#[derive(Debug)]
pub struct SyncClient<S> {
    source: S,
    loads: Generations,
    saves: Generations,
    /// Serializes writes per target
    write_locks: Mutex<AHashMap<DocumentRef, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: DocumentSource> SyncClient<S> {
    /// Wrap a source
    pub fn new(source: S) -> Self {
        Self {
            source,
            loads: Generations::default(),
            saves: Generations::default(),
            write_locks: Mutex::new(AHashMap::new()),
        }
    }

    fn write_lock(&self, target: &DocumentRef) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(target.clone()).or_default().clone()
    }

    /// The wrapped source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load a document
    ///
    /// A failure of a superseded request is reported as superseded, not as
    /// an error.
    pub async fn load(&self, target: &DocumentRef) -> Result<Fetched<Vec<Cell>>> {
        let generation = self.loads.issue(target);
        let result = self.source.load(target).await;

        if !self.loads.is_current(target, generation) {
            tracing::debug!("Discarding stale load #{generation} of {target}");
            return Ok(Fetched::Superseded);
        }

        match result {
            Ok(cells) => Ok(Fetched::Current(cells)),
            Err(source) => Err(Error::LoadFailure {
                target: target.clone(),
                source,
            }),
        }
    }

    /// Save a document
    ///
    /// Waits for earlier saves of the same target to finish first. If a newer
    /// save was issued in the meantime, nothing is written.
    pub async fn save(&self, target: &DocumentRef, cells: &[Cell]) -> Result<Fetched<()>> {
        let generation = self.saves.issue(target);
        let lock = self.write_lock(target);
        let _turn = lock.lock().await;

        if !self.saves.is_current(target, generation) {
            tracing::debug!("Skipping stale save #{generation} of {target}");
            return Ok(Fetched::Superseded);
        }

        let result = self.source.save(target, cells).await;

        if !self.saves.is_current(target, generation) {
            tracing::debug!("Discarding stale save acknowledgement #{generation} of {target}");
            return Ok(Fetched::Superseded);
        }

        match result {
            Ok(()) => Ok(Fetched::Current(())),
            Err(source) => Err(Error::SaveFailure {
                target: target.clone(),
                source,
            }),
        }
    }

    /// Load a document into `sheet`
    ///
    /// Returns `false` if the response was superseded and not applied.
    pub async fn load_into(&self, sheet: &mut Sheet, target: &DocumentRef) -> Result<bool> {
        match self.load(target).await? {
            Fetched::Current(cells) => {
                sheet.reload(cells)?;
                Ok(true)
            }
            Fetched::Superseded => Ok(false),
        }
    }

    /// Save `sheet`, marking it clean if this was the latest save
    pub async fn save_from(&self, sheet: &mut Sheet, target: &DocumentRef) -> Result<bool> {
        let revision = sheet.revision();
        let cells = sheet.snapshot();
        match self.save(target, &cells).await? {
            Fetched::Current(()) => {
                sheet.mark_saved(revision);
                Ok(true)
            }
            Fetched::Superseded => Ok(false),
        }
    }
}

/// Documents stored as `.workbook` JSON files under a root directory
///
/// Local files have no branches; the branch of a [`DocumentRef`] is ignored.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Serve documents below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path of a document
    pub fn path_of(&self, target: &DocumentRef) -> std::result::Result<PathBuf, BoxError> {
        let relative = Path::new(&target.path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(
                cellbook_core::Error::InvalidPath(target.path.clone()).into(),
            );
        }
        Ok(self.root.join(relative))
    }
}

impl DocumentSource for FileSource {
    fn load(
        &self,
        target: &DocumentRef,
    ) -> impl Future<Output = std::result::Result<Vec<Cell>, BoxError>> + Send {
        let path = self.path_of(target);
        async move {
            let path = path?;
            let text = tokio::fs::read_to_string(&path).await?;
            Ok(parse_document(&text)?)
        }
    }

    fn save(
        &self,
        target: &DocumentRef,
        cells: &[Cell],
    ) -> impl Future<Output = std::result::Result<(), BoxError>> + Send {
        let path = self.path_of(target);
        let text = write_document(cells);
        async move {
            let path = path?;
            let text = text?;
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, text).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetched() {
        assert_eq!(Fetched::Current(3).current(), Some(3));
        assert_eq!(Fetched::<i32>::Superseded.current(), None);
        assert!(Fetched::<()>::Superseded.is_superseded());
    }

    #[test]
    fn test_generations_are_per_target() {
        let generations = Generations::default();
        let a = DocumentRef::file("a.workbook");
        let b = DocumentRef::file("b.workbook");

        let first = generations.issue(&a);
        let other = generations.issue(&b);
        assert!(generations.is_current(&a, first));

        let second = generations.issue(&a);
        assert!(!generations.is_current(&a, first));
        assert!(generations.is_current(&a, second));
        assert!(generations.is_current(&b, other));
    }

    #[test]
    fn test_path_of_rejects_escapes() {
        let source = FileSource::new("/data");
        assert_eq!(
            source.path_of(&DocumentRef::file("notes/a.workbook")).unwrap(),
            PathBuf::from("/data/notes/a.workbook")
        );
        assert!(source.path_of(&DocumentRef::file("../a.workbook")).is_err());
        assert!(source.path_of(&DocumentRef::file("/etc/passwd")).is_err());
    }
}
