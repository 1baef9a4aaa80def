//! File-backed store
//!
//! Layout under the data directory:
//! - `index.json`: queries and the fingerprint index
//! - `comments/<query id>.jsonl`: one comment record per line, append-only
//! - `analytics/<query id>.json`
//! - `settings.json`: credentials and alert preferences
//!
//! JSON documents are replaced by writing a temporary file and renaming it
//! over the old one. The index is held in memory and every operation runs
//! under its lock, so a commit is never observed half-applied.

use crate::store::{alert_key, paginate, AlertPreferences, CommentListing, PageRequest, SearchSnapshot, SearchStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use sentiscope_core::{Analytics, Comment, Error, Platform, QueryFingerprint, Result, SearchQuery};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const INDEX_FILE: &str = "index.json";
const SETTINGS_FILE: &str = "settings.json";
const COMMENTS_DIR: &str = "comments";
const ANALYTICS_DIR: &str = "analytics";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Index {
    #[serde(default)]
    queries: BTreeMap<String, SearchQuery>,
    /// Fingerprint display form -> query id
    #[serde(default)]
    fingerprints: BTreeMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Settings {
    #[serde(default)]
    credentials: BTreeMap<String, String>,
    #[serde(default)]
    alerts: AlertPreferences,
}

pub struct FileStore {
    root: PathBuf,
    index: RwLock<Index>,
    settings: RwLock<Settings>,
}

impl FileStore {
    /// Open or create a store rooted at `root`
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.join(COMMENTS_DIR))?;
        std::fs::create_dir_all(root.join(ANALYTICS_DIR))?;

        let index: Index = read_json(&root.join(INDEX_FILE))?.unwrap_or_default();
        let settings: Settings = read_json(&root.join(SETTINGS_FILE))?.unwrap_or_default();

        info!(
            path = %root.display(),
            queries = index.queries.len(),
            "Opened file store"
        );

        Ok(Self {
            root,
            index: RwLock::new(index),
            settings: RwLock::new(settings),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn comments_path(&self, query_id: &str) -> PathBuf {
        self.root.join(COMMENTS_DIR).join(format!("{query_id}.jsonl"))
    }

    fn analytics_path(&self, query_id: &str) -> PathBuf {
        self.root.join(ANALYTICS_DIR).join(format!("{query_id}.json"))
    }

    fn persist_index(&self, index: &Index) -> Result<()> {
        write_json(&self.root.join(INDEX_FILE), index)
    }

    fn persist_settings(&self, settings: &Settings) -> Result<()> {
        write_json(&self.root.join(SETTINGS_FILE), settings)
    }

    fn append_lines(&self, query_id: &str, comments: &[Comment]) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.comments_path(query_id))?;
        let mut writer = BufWriter::new(file);
        for comment in comments {
            serde_json::to_writer(&mut writer, comment)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read_lines(&self, query_id: &str) -> Result<Vec<Comment>> {
        let file = match File::open(self.comments_path(query_id)) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut comments = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Comment>(&line) {
                Ok(comment) => comments.push(comment),
                Err(e) => warn!(query_id, line = line_no + 1, error = %e, "Skipping unreadable comment record"),
            }
        }
        Ok(comments)
    }

    fn remove_files(&self, query_id: &str) {
        for path in [self.comments_path(query_id), self.analytics_path(query_id)] {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "Failed to remove replaced query file");
                }
            }
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write to a sibling temp file, then rename over the target
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[async_trait]
impl SearchStore for FileStore {
    async fn create_query(&self, query: &SearchQuery) -> Result<()> {
        let mut index = self.index.write();
        if index.queries.contains_key(&query.id) {
            return Err(Error::store(format!("query {} already exists", query.id)));
        }
        index.queries.insert(query.id.clone(), query.clone());
        File::create(self.comments_path(&query.id))?;
        self.persist_index(&index)
    }

    async fn get_query(&self, id: &str) -> Result<Option<SearchQuery>> {
        Ok(self.index.read().queries.get(id).cloned())
    }

    async fn append_comments(&self, query_id: &str, comments: &[Comment]) -> Result<usize> {
        let index = self.index.write();
        if !index.queries.contains_key(query_id) {
            return Err(Error::not_found(format!("query {query_id}")));
        }
        self.append_lines(query_id, comments)?;
        Ok(self.read_lines(query_id)?.len())
    }

    async fn list_comments(&self, query_id: &str, page: PageRequest) -> Result<Option<CommentListing>> {
        let index = self.index.read();
        if !index.queries.contains_key(query_id) {
            return Ok(None);
        }
        let records = self.read_lines(query_id)?;
        paginate(&records, page).map(Some)
    }

    async fn all_comments(&self, query_id: &str) -> Result<Option<Vec<Comment>>> {
        let index = self.index.read();
        if !index.queries.contains_key(query_id) {
            return Ok(None);
        }
        self.read_lines(query_id).map(Some)
    }

    async fn put_analytics(&self, query_id: &str, analytics: &Analytics) -> Result<()> {
        let index = self.index.write();
        if !index.queries.contains_key(query_id) {
            return Err(Error::not_found(format!("query {query_id}")));
        }
        write_json(&self.analytics_path(query_id), analytics)
    }

    async fn get_analytics(&self, query_id: &str) -> Result<Option<Analytics>> {
        let index = self.index.read();
        if !index.queries.contains_key(query_id) {
            return Ok(None);
        }
        read_json(&self.analytics_path(query_id))
    }

    async fn find_by_fingerprint(&self, fingerprint: &QueryFingerprint) -> Result<Option<SearchQuery>> {
        let index = self.index.read();
        Ok(index
            .fingerprints
            .get(&fingerprint.to_string())
            .and_then(|id| index.queries.get(id))
            .cloned())
    }

    async fn commit_search(&self, snapshot: SearchSnapshot) -> Result<Option<String>> {
        let SearchSnapshot {
            query,
            comments,
            analytics,
        } = snapshot;
        let id = query.id.clone();
        let fingerprint = query.fingerprint().to_string();

        let mut index = self.index.write();

        // Data files first; the index switch below publishes them
        File::create(self.comments_path(&id))?;
        self.append_lines(&id, &comments)?;
        write_json(&self.analytics_path(&id), &analytics)?;

        index.queries.insert(id.clone(), query);
        let replaced = index
            .fingerprints
            .insert(fingerprint, id.clone())
            .filter(|previous| *previous != id);
        if let Some(previous) = &replaced {
            index.queries.remove(previous);
        }
        self.persist_index(&index)?;

        if let Some(previous) = &replaced {
            self.remove_files(previous);
            debug!(query_id = %id, replaced = %previous, "Replaced cached search");
        }
        Ok(replaced)
    }

    async fn set_credential(&self, platform: &Platform, secret: &str) -> Result<()> {
        let mut settings = self.settings.write();
        settings.credentials.insert(platform.key(), secret.to_string());
        self.persist_settings(&settings)
    }

    async fn remove_credential(&self, platform: &Platform) -> Result<bool> {
        let mut settings = self.settings.write();
        let removed = settings.credentials.remove(&platform.key()).is_some();
        if removed {
            self.persist_settings(&settings)?;
        }
        Ok(removed)
    }

    async fn get_credential(&self, platform: &Platform) -> Result<Option<String>> {
        Ok(self.settings.read().credentials.get(&platform.key()).cloned())
    }

    async fn credentials(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.settings.read().credentials.clone())
    }

    async fn set_alert(&self, name: &str, enabled: bool) -> Result<()> {
        let key = alert_key(name)?;
        let mut settings = self.settings.write();
        settings.alerts.insert(key, enabled);
        self.persist_settings(&settings)
    }

    async fn alert_preferences(&self) -> Result<AlertPreferences> {
        Ok(self.settings.read().alerts.clone())
    }
}
