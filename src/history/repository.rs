use std::{
    future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use fs4::tokio::AsyncFileExt;
use futures::StreamExt;
use serde_json::{Map, Value};
use tokio::{
    fs::{DirEntry, File},
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tokio_stream::wrappers::ReadDirStream;
use tracing::{debug, info, instrument, warn};

use crate::utils::time::date_to_record_name;

use super::{
    entities::{DailyRecord, History},
    normalize::{parse_history, parse_record},
};

/// Namespaced name of the document holding the anonymous history.
pub const LOCAL_HISTORY_FILE: &str = "daymaker_analytics_history.json";

/// Interface for abstracting persistence of daily records. Every backend hands out normalized
/// [DailyRecord] values, so the aggregation layer never sees a loosely typed document.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Reads the whole history as a snapshot.
    async fn load_history(&self) -> Result<History>;

    /// Writes the record for its date. Last write wins.
    async fn save_daily_record(&self, record: &DailyRecord) -> Result<()>;

    async fn get_record(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        Ok(self.load_history().await?.remove(&date))
    }
}

#[async_trait]
impl<T> HistoryRepository for T
where
    T: Deref + Send + Sync,
    T::Target: HistoryRepository,
{
    async fn load_history(&self) -> Result<History> {
        self.deref().load_history().await
    }

    async fn save_daily_record(&self, record: &DailyRecord) -> Result<()> {
        self.deref().save_daily_record(record).await
    }

    async fn get_record(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        self.deref().get_record(date).await
    }
}

/// Anonymous backend. The whole history lives in one JSON object keyed by ISO date.
pub struct LocalHistoryStore {
    path: PathBuf,
}

impl LocalHistoryStore {
    pub fn new(dir: &Path) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(dir)?;

        Ok(Self {
            path: dir.join(LOCAL_HISTORY_FILE),
        })
    }

    async fn read_document(file: &mut File) -> Result<Value> {
        let mut content = String::new();
        file.read_to_string(&mut content).await?;
        if content.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(v) => Ok(v),
            Err(e) => {
                // A torn write shouldn't make the whole app unusable.
                warn!("History document {:?} is corrupted, treating as empty: {e}", file);
                Ok(Value::Object(Map::new()))
            }
        }
    }
}

#[async_trait]
impl HistoryRepository for LocalHistoryStore {
    #[instrument(skip(self), fields(path = ?self.path))]
    async fn load_history(&self) -> Result<History> {
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No history document yet");
                return Ok(History::new());
            }
            Err(e) => return Err(e).context("Failed to open history document"),
        };

        file.lock_shared()?;
        let document = Self::read_document(&mut file).await;
        file.unlock_async().await?;

        let history = parse_history(document?);
        debug!("Loaded {} records", history.len());
        Ok(history)
    }

    #[instrument(skip(self, record), fields(date = %record.date()))]
    async fn save_daily_record(&self, record: &DailyRecord) -> Result<()> {
        let mut file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .await
            .context("Failed to open history document")?;

        // Semi-safe acquire-release for a file
        file.lock_exclusive()?;
        let result = Self::write_record(&mut file, record).await;
        file.unlock_async().await?;
        result?;

        info!("Saved daily record");
        Ok(())
    }
}

impl LocalHistoryStore {
    async fn write_record(file: &mut File, record: &DailyRecord) -> Result<()> {
        // Entries we can't parse are kept as they are, only the written date is replaced.
        let mut document = match Self::read_document(file).await? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        document.insert(
            date_to_record_name(record.date()),
            serde_json::to_value(record)?,
        );

        let buffer = serde_json::to_vec(&Value::Object(document))?;
        file.rewind().await?;
        file.set_len(0).await?;
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Per-user backend. Mirrors a remote collection: one document per date under
/// `users/<user>/history/<YYYY-MM-DD>.json`.
pub struct UserHistoryStore {
    history_dir: PathBuf,
}

impl UserHistoryStore {
    pub fn new(app_dir: &Path, user: &str) -> Result<Self> {
        if user.is_empty() || user.contains(['/', '\\']) || user == "." || user == ".." {
            bail!("Invalid user id {user:?}");
        }
        let history_dir = app_dir.join("users").join(user).join("history");
        std::fs::create_dir_all(&history_dir)?;
        Ok(Self { history_dir })
    }

    fn record_path(&self, date: NaiveDate) -> PathBuf {
        self.history_dir
            .join(format!("{}.json", date_to_record_name(date)))
    }

    /// Path and date key of a listed `<YYYY-MM-DD>.json` document. Anything else in the
    /// directory is skipped.
    fn record_entry(entry: std::io::Result<DirEntry>) -> Option<(PathBuf, String)> {
        let entry = entry
            .inspect_err(|e| warn!("Failed to list history entry {e}"))
            .ok()?;
        let path = entry.path();
        let key = path
            .file_name()?
            .to_str()?
            .strip_suffix(".json")?
            .to_string();
        Some((path, key))
    }

    async fn read_record(path: PathBuf, key: String) -> Result<Option<DailyRecord>> {
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {path:?}")),
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(document) => Ok(parse_record(&key, document)),
            Err(e) => {
                warn!("During parsing in path {path:?} found illegal json: {e}");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl HistoryRepository for UserHistoryStore {
    #[instrument(skip(self), fields(dir = ?self.history_dir))]
    async fn load_history(&self) -> Result<History> {
        let entries = match tokio::fs::read_dir(&self.history_dir).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(History::new()),
            Err(e) => return Err(e.into()),
        };

        let records = ReadDirStream::new(entries)
            .filter_map(|entry| future::ready(Self::record_entry(entry)))
            .map(|(path, key)| Self::read_record(path, key))
            .buffered(4)
            .collect::<Vec<_>>()
            .await;

        let mut history = History::new();
        for record in records {
            if let Some(record) = record? {
                history.insert(record.date(), record);
            }
        }
        debug!("Loaded {} records", history.len());
        Ok(history)
    }

    #[instrument(skip(self, record), fields(date = %record.date()))]
    async fn save_daily_record(&self, record: &DailyRecord) -> Result<()> {
        let path = self.record_path(record.date());
        let temp = path.with_extension("json.tmp");
        let buffer = serde_json::to_vec(record)?;

        tokio::fs::write(&temp, &buffer).await?;
        tokio::fs::rename(&temp, &path).await?;
        info!("Saved daily record");
        Ok(())
    }

    async fn get_record(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        Self::read_record(self.record_path(date), date_to_record_name(date)).await
    }
}

/// Serves as the repository the rest of the application talks to. Anonymous users get the local
/// document, signed in users get their own collection.
pub struct GenericHistoryRepository {
    inner: Box<dyn HistoryRepository>,
}

impl GenericHistoryRepository {
    pub fn for_user(app_dir: &Path, user: Option<&str>) -> Result<Self> {
        let inner: Box<dyn HistoryRepository> = match user {
            Some(user) => Box::new(UserHistoryStore::new(app_dir, user)?),
            None => Box::new(LocalHistoryStore::new(app_dir)?),
        };
        Ok(Self { inner })
    }
}

#[async_trait]
impl HistoryRepository for GenericHistoryRepository {
    async fn load_history(&self) -> Result<History> {
        self.inner.load_history().await
    }

    async fn save_daily_record(&self, record: &DailyRecord) -> Result<()> {
        self.inner.save_daily_record(record).await
    }

    async fn get_record(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        self.inner.get_record(date).await
    }
}
