//! Filesystem implementation of the store traits.
//!
//! This is the primary storage backend. Layout:
//!
//! ```text
//! <chunk_dir>/<hex digest>            one blob per unique chunk
//! <manifest_dir>/<filename>.json      one record per stored file
//! ```
//!
//! All file I/O is blocking and runs through `tokio::task::spawn_blocking`
//! so request tasks never stall the runtime.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use chunkvault_core::{ChunkDigest, FileManifest, MANIFEST_SUFFIX};

use crate::error::{Result, StoreError};
use crate::record::{decode_record, record_name};
use crate::traits::{ChunkStore, ManifestEntry, ManifestStore, PutOutcome};

const CHUNK_TMP_PREFIX: &str = ".chunk-";
const MANIFEST_TMP_PREFIX: &str = ".manifest-";
const TMP_SUFFIX: &str = ".tmp";

/// Run a blocking storage operation on the blocking pool.
async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
}

/// Write `data` to a fresh temp file in `dir` and fsync it.
fn write_temp(dir: &Path, prefix: &str, data: &[u8]) -> Result<tempfile::NamedTempFile> {
    let mut tmp = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(TMP_SUFFIX)
        .tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Fsync `dir` so a rename into it survives a power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

/// Directory handles cannot be fsynced here; the rename is already atomic.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Chunks
// ─────────────────────────────────────────────────────────────────────────────

/// Blob store with one file per digest, named by lowercase hex.
///
/// Writes go to a temp file in the same directory and are hard-linked into
/// place only if no blob exists yet, so creation is atomic and never
/// overwrites.
#[derive(Debug, Clone)]
pub struct FsChunkStore {
    dir: Arc<PathBuf>,
    verify_on_read: bool,
}

impl FsChunkStore {
    /// Open a chunk store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: Arc::new(dir),
            verify_on_read: true,
        })
    }

    /// Enable or disable re-hashing blobs on read (enabled by default).
    pub fn with_verify_on_read(mut self, verify: bool) -> Self {
        self.verify_on_read = verify;
        self
    }

    /// The chunk directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the blob for `digest`.
    pub fn chunk_path(&self, digest: &ChunkDigest) -> PathBuf {
        self.dir.join(digest.to_hex())
    }
}

fn put_chunk(dir: &Path, digest: ChunkDigest, data: &[u8]) -> Result<PutOutcome> {
    let path = dir.join(digest.to_hex());
    if path.is_file() {
        return Ok(PutOutcome::AlreadyPresent);
    }

    let tmp = write_temp(dir, CHUNK_TMP_PREFIX, data)?;
    match tmp.persist_noclobber(&path) {
        Ok(_) => {
            sync_dir(dir)?;
            debug!(%digest, size = data.len(), "wrote chunk");
            Ok(PutOutcome::Written)
        }
        // Lost a race with a concurrent writer of the same digest.
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(PutOutcome::AlreadyPresent),
        Err(e) => Err(StoreError::Io(e.error)),
    }
}

fn get_chunk(path: &Path, digest: ChunkDigest, verify: bool) -> Result<Bytes> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::ChunkMissing(digest)),
        Err(e) => return Err(StoreError::Io(e)),
    };

    if verify {
        let actual = ChunkDigest::of(&data);
        if actual != digest {
            warn!(expected = %digest, %actual, "chunk contents do not match digest");
            return Err(StoreError::ChunkCorrupt {
                expected: digest,
                actual,
            });
        }
    }

    Ok(Bytes::from(data))
}

fn list_chunks(dir: &Path) -> Result<Vec<ChunkDigest>> {
    let mut digests = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        // Temp files and anything else that is not a digest are skipped.
        if let Some(digest) = entry
            .file_name()
            .to_str()
            .and_then(|name| ChunkDigest::from_hex(name).ok())
        {
            digests.push(digest);
        }
    }
    Ok(digests)
}

#[async_trait]
impl ChunkStore for FsChunkStore {
    async fn put(&self, digest: ChunkDigest, data: Bytes) -> Result<PutOutcome> {
        let dir = Arc::clone(&self.dir);
        blocking(move || put_chunk(&dir, digest, &data)).await
    }

    async fn get(&self, digest: &ChunkDigest) -> Result<Bytes> {
        let path = self.chunk_path(digest);
        let digest = *digest;
        let verify = self.verify_on_read;
        blocking(move || get_chunk(&path, digest, verify)).await
    }

    async fn contains(&self, digest: &ChunkDigest) -> Result<bool> {
        let path = self.chunk_path(digest);
        blocking(move || match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        })
        .await
    }

    async fn list(&self) -> Result<Vec<ChunkDigest>> {
        let dir = Arc::clone(&self.dir);
        blocking(move || list_chunks(&dir)).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Manifests
// ─────────────────────────────────────────────────────────────────────────────

/// Manifest store with one `<filename>.json` record per file.
///
/// Saves replace the record atomically (temp file, fsync, rename), so a
/// crash leaves either the old record or the new one. Records damaged by
/// other means are reported as corrupt by [`ManifestStore::list`].
#[derive(Debug, Clone)]
pub struct FsManifestStore {
    dir: Arc<PathBuf>,
}

impl FsManifestStore {
    /// Open a manifest store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir: Arc::new(dir) })
    }

    /// The manifest directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `filename`.
    pub fn manifest_path(&self, filename: &str) -> PathBuf {
        self.dir.join(record_name(filename))
    }
}

fn read_record(path: &Path, name: &str) -> Result<FileManifest> {
    let bytes = fs::read(path)?;
    decode_record(name, &bytes)
}

fn save_manifest(dir: &Path, manifest: &FileManifest) -> Result<()> {
    let json = manifest.to_json()?;
    let path = dir.join(record_name(manifest.filename()));

    let tmp = write_temp(dir, MANIFEST_TMP_PREFIX, &json)?;
    tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
    sync_dir(dir)?;

    debug!(
        filename = manifest.filename(),
        chunks = manifest.chunk_count(),
        "saved manifest"
    );
    Ok(())
}

fn list_manifests(dir: &Path) -> Result<Vec<ManifestEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let os_name = entry.file_name();
        let Some(name) = os_name.to_str() else {
            entries.push(ManifestEntry::Corrupt {
                name: os_name.to_string_lossy().into_owned(),
                reason: "record name is not valid UTF-8".into(),
            });
            continue;
        };
        if !name.ends_with(MANIFEST_SUFFIX) {
            continue;
        }

        match read_record(&entry.path(), name) {
            Ok(manifest) => entries.push(ManifestEntry::Valid(manifest)),
            Err(e) => entries.push(ManifestEntry::Corrupt {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }
    Ok(entries)
}

#[async_trait]
impl ManifestStore for FsManifestStore {
    async fn save(&self, manifest: &FileManifest) -> Result<()> {
        let dir = Arc::clone(&self.dir);
        let manifest = manifest.clone();
        blocking(move || save_manifest(&dir, &manifest)).await
    }

    async fn load(&self, filename: &str) -> Result<Option<FileManifest>> {
        let path = self.manifest_path(filename);
        let name = record_name(filename);
        blocking(move || {
            if !path.is_file() {
                return Ok(None);
            }
            read_record(&path, &name).map(Some)
        })
        .await
    }

    async fn list(&self) -> Result<Vec<ManifestEntry>> {
        let dir = Arc::clone(&self.dir);
        blocking(move || list_manifests(&dir)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(name: &str, parts: &[&[u8]]) -> FileManifest {
        FileManifest::new(name, parts.iter().map(|p| ChunkDigest::of(p)).collect())
    }

    #[tokio::test]
    async fn test_chunk_put_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsChunkStore::open(dir.path()).unwrap();
        let data = Bytes::from_static(b"chunk bytes");
        let digest = ChunkDigest::of(&data);

        assert_eq!(store.put(digest, data.clone()).await.unwrap(), PutOutcome::Written);
        assert_eq!(store.get(&digest).await.unwrap(), data);
        assert!(store.contains(&digest).await.unwrap());

        // Stored flat, named by hex digest.
        let on_disk = fs::read(dir.path().join(digest.to_hex())).unwrap();
        assert_eq!(on_disk, data.as_ref());
    }

    #[test]
    fn test_sync_dir() {
        let dir = tempfile::tempdir().unwrap();
        sync_dir(dir.path()).unwrap();
        assert!(sync_dir(&dir.path().join("missing")).is_err() || cfg!(not(unix)));
    }

    #[tokio::test]
    async fn test_chunk_put_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsChunkStore::open(dir.path()).unwrap();
        let data = Bytes::from_static(b"same");
        let digest = ChunkDigest::of(&data);

        assert!(store.put(digest, data.clone()).await.unwrap().is_written());
        assert_eq!(
            store.put(digest, data).await.unwrap(),
            PutOutcome::AlreadyPresent
        );
        assert_eq!(store.list().await.unwrap(), vec![digest]);
    }

    #[tokio::test]
    async fn test_chunk_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsChunkStore::open(dir.path()).unwrap();
        let digest = ChunkDigest::of(b"never stored");

        assert!(!store.contains(&digest).await.unwrap());
        assert!(matches!(
            store.get(&digest).await,
            Err(StoreError::ChunkMissing(d)) if d == digest
        ));
    }

    #[tokio::test]
    async fn test_chunk_verify_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsChunkStore::open(dir.path()).unwrap();
        let digest = ChunkDigest::of(b"original");
        store.put(digest, Bytes::from_static(b"original")).await.unwrap();

        fs::write(store.chunk_path(&digest), b"tampered").unwrap();
        assert!(matches!(
            store.get(&digest).await,
            Err(StoreError::ChunkCorrupt { expected, .. }) if expected == digest
        ));

        let lax = store.clone().with_verify_on_read(false);
        assert_eq!(lax.get(&digest).await.unwrap().as_ref(), b"tampered");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_puts_same_digest() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsChunkStore::open(dir.path()).unwrap();
        let data = Bytes::from(vec![0x5a; 64 * 1024]);
        let digest = ChunkDigest::of(&data);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            let data = data.clone();
            handles.push(tokio::spawn(async move { store.put(digest, data).await }));
        }

        let mut written = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().is_written() {
                written += 1;
            }
        }

        assert_eq!(written, 1);
        assert_eq!(store.get(&digest).await.unwrap(), data);
        // No temp files left behind.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_manifest_save_load_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsManifestStore::open(dir.path()).unwrap();
        let m = manifest("notes.txt", &[b"a", b"b"]);

        store.save(&m).await.unwrap();
        assert!(dir.path().join("notes.txt.json").is_file());
        assert_eq!(store.load("notes.txt").await.unwrap(), Some(m.clone()));
        assert_eq!(store.load("other.txt").await.unwrap(), None);
        assert_eq!(store.list().await.unwrap(), vec![ManifestEntry::Valid(m)]);
    }

    #[tokio::test]
    async fn test_manifest_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsManifestStore::open(dir.path()).unwrap();

        store.save(&manifest("f", &[b"v1"])).await.unwrap();
        let v2 = manifest("f", &[b"v2", b"more"]);
        store.save(&v2).await.unwrap();

        assert_eq!(store.load("f").await.unwrap(), Some(v2));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_manifest_list_reports_corrupt_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsManifestStore::open(dir.path()).unwrap();
        let good = manifest("good.bin", &[b"x"]);
        store.save(&good).await.unwrap();

        fs::write(dir.path().join("torn.bin.json"), b"{\"filename\": \"torn").unwrap();
        // Valid record stored under the wrong name.
        fs::write(dir.path().join("alias.json"), good.to_json().unwrap()).unwrap();
        // Ignored: not a record.
        fs::write(dir.path().join(".manifest-abc.tmp"), b"partial").unwrap();

        let mut corrupt: Vec<String> = Vec::new();
        let mut valid = Vec::new();
        for entry in store.list().await.unwrap() {
            match entry {
                ManifestEntry::Valid(m) => valid.push(m),
                ManifestEntry::Corrupt { name, .. } => corrupt.push(name),
            }
        }
        corrupt.sort();

        assert_eq!(valid, vec![good]);
        assert_eq!(corrupt, vec!["alias.json".to_string(), "torn.bin.json".to_string()]);
        assert!(matches!(
            store.load("torn.bin").await,
            Err(StoreError::ManifestCorrupt { .. })
        ));
    }
}
