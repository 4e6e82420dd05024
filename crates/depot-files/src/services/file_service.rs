//! File Service
//!
//! Flat on-disk storage for named files. The files directory is the single
//! source of truth: there is no in-memory index, so concurrent instances and
//! concurrent requests cannot drift out of sync with the disk.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use depot_config::ConfigService;

use crate::error::FilesError;
use crate::services::name::FileName;

pub struct FileService {
    files_dir: PathBuf,
    tmp_dir: PathBuf,
}

impl FileService {
    pub fn new(config_service: Arc<ConfigService>) -> Self {
        Self {
            files_dir: config_service.files_dir(),
            tmp_dir: config_service.tmp_dir(),
        }
    }

    /// Construct a service over explicit directories. Both must already
    /// exist and live on the same filesystem so renames stay atomic.
    pub fn with_dirs(files_dir: PathBuf, tmp_dir: PathBuf) -> Self {
        Self { files_dir, tmp_dir }
    }

    fn file_path(&self, name: &FileName) -> PathBuf {
        self.files_dir.join(name.as_str())
    }

    /// List the names of all stored files, sorted for determinism.
    ///
    /// Only regular files count; directories and other entries are skipped,
    /// as are entries whose names are not valid UTF-8 (no valid request can
    /// address them). An empty store yields an empty list, not an error.
    pub async fn list_files(&self) -> Result<Vec<String>, FilesError> {
        let mut names = Vec::new();

        let mut entries = fs::read_dir(&self.files_dir)
            .await
            .map_err(|e| FilesError::storage("listing files", e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FilesError::storage("listing files", e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| FilesError::storage("listing files", e))?;
            if !file_type.is_file() {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!("Skipping non-UTF-8 directory entry: {:?}", raw),
            }
        }

        names.sort_unstable();
        Ok(names)
    }

    /// Read the full content of a stored file.
    ///
    /// Because writes replace files via rename, this sees either the
    /// complete old content or the complete new content of a concurrent
    /// overwrite, never a mixture.
    pub async fn get_file(&self, name: &FileName) -> Result<Vec<u8>, FilesError> {
        debug!("GET {}", name);

        match fs::read(self.file_path(name)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound || e.kind() == ErrorKind::IsADirectory => {
                Err(FilesError::NotFound(name.to_string()))
            }
            Err(e) => Err(FilesError::storage(format!("reading '{}'", name), e)),
        }
    }

    /// Store `content` under `name`, replacing any previous content.
    ///
    /// The bytes are staged in the temp directory and renamed into place, so
    /// a concurrent reader never observes a partially written file, and a
    /// failed write leaves any previous content intact.
    pub async fn put_file(&self, name: &FileName, content: Bytes) -> Result<(), FilesError> {
        debug!("PUT {} ({} bytes)", name, content.len());

        let staging_path = self.tmp_dir.join(format!("upload-{}", Uuid::new_v4()));

        fs::write(&staging_path, &content)
            .await
            .map_err(|e| FilesError::storage(format!("staging upload for '{}'", name), e))?;

        if let Err(e) = fs::rename(&staging_path, self.file_path(name)).await {
            let _ = fs::remove_file(&staging_path).await;
            return Err(FilesError::storage(format!("publishing '{}'", name), e));
        }

        Ok(())
    }

    /// Delete a stored file.
    ///
    /// Absence is an error: deleting a name that holds no file reports
    /// `NotFound`, including a repeated delete of the same name.
    pub async fn delete_file(&self, name: &FileName) -> Result<(), FilesError> {
        debug!("DELETE {}", name);

        match fs::remove_file(self.file_path(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound || e.kind() == ErrorKind::IsADirectory => {
                Err(FilesError::NotFound(name.to_string()))
            }
            Err(e) => Err(FilesError::storage(format!("deleting '{}'", name), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (Arc<FileService>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let files_dir = dir.path().join("files");
        let tmp_dir = dir.path().join("tmp");
        std::fs::create_dir_all(&files_dir).unwrap();
        std::fs::create_dir_all(&tmp_dir).unwrap();

        (Arc::new(FileService::with_dirs(files_dir, tmp_dir)), dir)
    }

    fn name(s: &str) -> FileName {
        FileName::parse(s).unwrap()
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let (service, _dir) = setup();
        let n = name("a.txt");

        service.put_file(&n, Bytes::from_static(b"hello")).await.unwrap();

        assert_eq!(service.get_file(&n).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn empty_content_is_a_valid_file() {
        let (service, _dir) = setup();
        let n = name("empty.bin");

        service.put_file(&n, Bytes::new()).await.unwrap();

        assert_eq!(service.get_file(&n).await.unwrap(), Vec::<u8>::new());
        assert_eq!(service.list_files().await.unwrap(), vec!["empty.bin"]);
    }

    #[tokio::test]
    async fn overwrite_replaces_content_wholesale() {
        let (service, _dir) = setup();
        let n = name("a.txt");

        service
            .put_file(&n, Bytes::from_static(b"first version, quite long"))
            .await
            .unwrap();
        service.put_file(&n, Bytes::from_static(b"second")).await.unwrap();

        assert_eq!(service.get_file(&n).await.unwrap(), b"second");
        assert_eq!(service.list_files().await.unwrap(), vec!["a.txt"]);
    }

    #[tokio::test]
    async fn get_missing_file_reports_not_found() {
        let (service, _dir) = setup();

        let err = service.get_file(&name("nope.txt")).await.unwrap_err();
        assert!(matches!(err, FilesError::NotFound(n) if n == "nope.txt"));
    }

    #[tokio::test]
    async fn delete_removes_file_and_second_delete_fails() {
        let (service, _dir) = setup();
        let n = name("a.txt");
        service.put_file(&n, Bytes::from_static(b"hello")).await.unwrap();

        service.delete_file(&n).await.unwrap();

        assert!(service.list_files().await.unwrap().is_empty());
        assert!(matches!(
            service.get_file(&n).await.unwrap_err(),
            FilesError::NotFound(_)
        ));
        assert!(matches!(
            service.delete_file(&n).await.unwrap_err(),
            FilesError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let (service, _dir) = setup();
        assert!(service.list_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_is_sorted_and_skips_directories() {
        let (service, dir) = setup();

        service.put_file(&name("b.txt"), Bytes::from_static(b"b")).await.unwrap();
        service.put_file(&name("a.txt"), Bytes::from_static(b"a")).await.unwrap();
        std::fs::create_dir(dir.path().join("files").join("subdir")).unwrap();

        assert_eq!(service.list_files().await.unwrap(), vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn directory_entries_are_not_addressable() {
        let (service, dir) = setup();
        std::fs::create_dir(dir.path().join("files").join("subdir")).unwrap();

        let n = name("subdir");
        assert!(matches!(
            service.get_file(&n).await.unwrap_err(),
            FilesError::NotFound(_)
        ));
        assert!(matches!(
            service.delete_file(&n).await.unwrap_err(),
            FilesError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn failed_publish_reports_storage_error_and_cleans_staging() {
        let (service, dir) = setup();
        let n = name("a.txt");
        service.put_file(&n, Bytes::from_static(b"original")).await.unwrap();

        // Turning the target into a non-empty directory makes the rename fail.
        let target = dir.path().join("files").join("a.txt");
        std::fs::remove_file(&target).unwrap();
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("occupied"), b"x").unwrap();

        let err = service.put_file(&n, Bytes::from_static(b"new")).await.unwrap_err();
        assert!(matches!(err, FilesError::Storage { .. }));

        // The staged temp file was cleaned up.
        assert_eq!(std::fs::read_dir(dir.path().join("tmp")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn concurrent_readers_never_observe_partial_writes() {
        let (service, _dir) = setup();
        let n = name("racy.bin");

        let old = Bytes::from(vec![0xAAu8; 1 << 20]);
        let new = Bytes::from(vec![0xBBu8; 1 << 20]);
        service.put_file(&n, old.clone()).await.unwrap();

        let writer = {
            let service = service.clone();
            let n = n.clone();
            let new = new.clone();
            tokio::spawn(async move {
                for _ in 0..25 {
                    service.put_file(&n, new.clone()).await.unwrap();
                }
            })
        };

        let mut readers = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            let n = n.clone();
            let old = old.clone();
            let new = new.clone();
            readers.push(tokio::spawn(async move {
                for _ in 0..25 {
                    let content = service.get_file(&n).await.unwrap();
                    assert!(
                        content[..] == old[..] || content[..] == new[..],
                        "observed a torn read of {} bytes",
                        content.len()
                    );
                }
            }));
        }

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }

        assert_eq!(service.get_file(&n).await.unwrap(), new);
    }
}
