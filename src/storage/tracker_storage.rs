use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
};
use tracing::{debug, warn};

use super::entities::RecordEntity;

/// Interface for abstracting storage of tracker records.
pub trait TrackerStorage {
    /// Retrieves every historical record of one tracker. A tracker that was
    /// never written to reads as an empty set.
    fn fetch_records(&self, name: &str) -> impl Future<Output = Result<Vec<RecordEntity>>>;

    /// A tracker exists iff at least one record references it.
    fn tracker_exists(&self, name: &str) -> impl Future<Output = Result<bool>>;

    fn list_tracker_names(&self) -> impl Future<Output = Result<Vec<String>>>;

    /// Additive merge: a record already present for `(name, day)` has `value`
    /// added onto it, otherwise a new record is inserted.
    fn upsert(&self, name: &str, day: NaiveDate, value: f64) -> impl Future<Output = Result<()>>;

    /// Removes every record of the tracker, and with them the tracker itself.
    fn delete_all(&self, name: &str) -> impl Future<Output = Result<()>>;
}

/// The main realization of [TrackerStorage]. Keeps one JSON lines file per
/// tracker inside `record_dir`, named after the tracker. Names are validated
/// at the cli boundary before they ever become file names.
pub struct TrackerStorageImpl {
    record_dir: PathBuf,
}

impl TrackerStorageImpl {
    pub fn new(record_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&record_dir)?;

        Ok(Self { record_dir })
    }

    fn tracker_path(&self, name: &str) -> PathBuf {
        self.record_dir.join(name)
    }

    async fn read_all(&self, path: &Path) -> Result<Vec<RecordEntity>> {
        async fn extract(path: &Path) -> std::result::Result<Vec<RecordEntity>, std::io::Error> {
            debug!("Extracting {path:?}");
            let file = File::open(path).await?;
            file.lock_shared()?;
            let buffer = BufReader::new(file);
            let mut lines = buffer.lines();
            let mut records = vec![];
            while let Ok(Some(v)) = lines.next_line().await {
                match serde_json::from_str::<RecordEntity>(&v) {
                    Ok(v) => records.push(v),
                    Err(e) => {
                        // ignore illegal values. Might happen after shutdowns
                        warn!(
                            "During parsing in path {:?} found illegal json string {}:  {e}",
                            path, &v
                        )
                    }
                }
            }

            lines.into_inner().into_inner().unlock_async().await?;

            Ok(records)
        }

        match extract(path).await {
            Ok(s) => Ok(s),
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    Ok(vec![])
                } else {
                    Err(e)?
                }
            }
        }
    }

    async fn write_all(&self, path: &Path, records: &[RecordEntity]) -> Result<()> {
        let mut buffer = Vec::<u8>::new();
        for record in records {
            serde_json::to_writer(&mut buffer, record)?;
            buffer.push(b'\n');
        }

        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .await?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = async {
            file.write_all(&buffer).await?;
            file.flush().await?;
            Ok(())
        }
        .await;
        file.unlock_async().await?;
        result
    }
}

impl TrackerStorage for TrackerStorageImpl {
    async fn fetch_records(&self, name: &str) -> Result<Vec<RecordEntity>> {
        self.read_all(&self.tracker_path(name)).await
    }

    async fn tracker_exists(&self, name: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.tracker_path(name)).await?)
    }

    async fn list_tracker_names(&self) -> Result<Vec<String>> {
        let mut names = vec![];
        let mut entries = tokio::fs::read_dir(&self.record_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn upsert(&self, name: &str, day: NaiveDate, value: f64) -> Result<()> {
        let path = self.tracker_path(name);
        let mut records = self.read_all(&path).await?;
        match records.iter_mut().find(|record| record.day == day) {
            Some(existing) => existing.value += value,
            None => records.push(RecordEntity::new(name, day, value)),
        }
        self.write_all(&path, &records).await
    }

    async fn delete_all(&self, name: &str) -> Result<()> {
        match tokio::fs::remove_file(self.tracker_path(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::{
        storage::{
            entities::RecordEntity,
            tracker_storage::{TrackerStorage, TrackerStorageImpl},
        },
        utils::logging::TEST_LOGGING,
    };

    const TEST_DAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();

    #[tokio::test]
    async fn test_upsert_inserts_then_merges() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let storage = TrackerStorageImpl::new(dir.path().to_owned())?;

        storage.upsert("pushups", TEST_DAY, 20.).await?;
        storage.upsert("pushups", TEST_DAY, 15.).await?;
        storage
            .upsert("pushups", TEST_DAY.succ_opt().unwrap(), 10.)
            .await?;

        let records = storage.fetch_records("pushups").await?;
        assert_eq!(
            records,
            vec![
                RecordEntity::new("pushups", TEST_DAY, 35.),
                RecordEntity::new("pushups", TEST_DAY.succ_opt().unwrap(), 10.),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_tracker_reads_as_empty() -> Result<()> {
        let dir = tempdir()?;
        let storage = TrackerStorageImpl::new(dir.path().to_owned())?;

        assert_eq!(storage.fetch_records("nothing").await?, vec![]);
        assert!(!storage.tracker_exists("nothing").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_tracker_names_is_sorted() -> Result<()> {
        let dir = tempdir()?;
        let storage = TrackerStorageImpl::new(dir.path().to_owned())?;

        storage.upsert("weight", TEST_DAY, 81.4).await?;
        storage.upsert("pushups", TEST_DAY, 20.).await?;
        storage.upsert("sleep", TEST_DAY, 7.5).await?;

        assert_eq!(
            storage.list_tracker_names().await?,
            vec!["pushups", "sleep", "weight"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_all_removes_the_tracker() -> Result<()> {
        let dir = tempdir()?;
        let storage = TrackerStorageImpl::new(dir.path().to_owned())?;

        storage.upsert("weight", TEST_DAY, 81.4).await?;
        assert!(storage.tracker_exists("weight").await?);

        storage.delete_all("weight").await?;
        assert!(!storage.tracker_exists("weight").await?);
        assert_eq!(storage.fetch_records("weight").await?, vec![]);

        // deleting a tracker that's already gone is not an error
        storage.delete_all("weight").await?;
        Ok(())
    }
}
