//! Analysis record persistence
//!
//! The pipeline hands a finished report plus request metadata to an
//! [`AnalysisStore`], which assigns identity and a creation timestamp.
//! [`JsonStore`] keeps one JSON document per record in the user data
//! directory; [`MemoryStore`] backs tests and unsaved runs. Anything with
//! a real schema (SQL, a service) lives behind the same trait.

use crate::models::AnalysisReport;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Request metadata accompanying a report into the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnalysis {
    pub title: String,
    pub language: String,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Submitted code size in bytes.
    pub file_size: u64,
    pub lines_of_code: usize,
    #[serde(default)]
    pub model_used: Option<String>,
    /// Wall-clock analysis time in seconds.
    #[serde(default)]
    pub analysis_duration: Option<f64>,
    pub report: AnalysisReport,
}

/// A persisted record with store-assigned identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub analysis: NewAnalysis,
}

/// Persistence seam between the pipeline and whatever owns the schema.
pub trait AnalysisStore {
    /// Persist a record, assigning an id and creation timestamp.
    fn save(&self, analysis: NewAnalysis) -> Result<StoredAnalysis>;

    /// All records, newest first.
    fn list(&self) -> Result<Vec<StoredAnalysis>>;

    fn get(&self, id: &str) -> Result<Option<StoredAnalysis>>;
}

fn new_record(analysis: NewAnalysis) -> StoredAnalysis {
    StoredAnalysis {
        id: uuid::Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        analysis,
    }
}

/// File-backed store: one pretty-printed JSON document per record.
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Open the store in the user data directory.
    pub fn open_default() -> Result<Self> {
        let root = dirs::data_dir()
            .context("no user data directory available")?
            .join("retrocode")
            .join("analyses");
        Self::open(root)
    }

    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating store directory {}", root.display()))?;
        Ok(Self { root })
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

impl AnalysisStore for JsonStore {
    fn save(&self, analysis: NewAnalysis) -> Result<StoredAnalysis> {
        let record = new_record(analysis);
        let path = self.record_path(&record.id);
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        debug!(id = %record.id, "analysis persisted");
        Ok(record)
    }

    fn list(&self) -> Result<Vec<StoredAnalysis>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)
            .with_context(|| format!("reading store directory {}", self.root.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .ok()
                .and_then(|content| serde_json::from_str(&content).ok());
            match parsed {
                Some(record) => records.push(record),
                None => warn!(path = %path.display(), "skipping unreadable record"),
            }
        }
        records.sort_by(|a: &StoredAnalysis, b: &StoredAnalysis| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn get(&self, id: &str) -> Result<Option<StoredAnalysis>> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

/// In-memory store for tests and `--no-save` runs.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<StoredAnalysis>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnalysisStore for MemoryStore {
    fn save(&self, analysis: NewAnalysis) -> Result<StoredAnalysis> {
        let record = new_record(analysis);
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<StoredAnalysis>> {
        let mut records = self
            .records
            .lock()
            .expect("store mutex poisoned")
            .clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn get(&self, id: &str) -> Result<Option<StoredAnalysis>> {
        Ok(self
            .records
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring;

    fn sample_analysis(title: &str) -> NewAnalysis {
        NewAnalysis {
            title: title.to_string(),
            language: "python".to_string(),
            file_name: Some("app.py".to_string()),
            file_size: 120,
            lines_of_code: 8,
            model_used: Some("llama-3.1-70b-versatile".to_string()),
            analysis_duration: Some(1.5),
            report: AnalysisReport {
                summary: "fine".to_string(),
                issues: vec!["slow loop".to_string()],
                suggestions: Vec::new(),
                security_issues: Vec::new(),
                performance_issues: Vec::new(),
                enhanced_code: String::new(),
                quality_score: 90.0,
                security_score: 90.0,
                performance_score: 90.0,
                language: "python".to_string(),
                recommendations: scoring::recommendations("python"),
            },
        }
    }

    #[test]
    fn test_json_store_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::open(dir.path().join("analyses")).expect("open");

        let saved = store.save(sample_analysis("first")).expect("save");
        assert!(!saved.id.is_empty());

        let loaded = store.get(&saved.id).expect("get").expect("record exists");
        assert_eq!(loaded.analysis.title, "first");
        assert_eq!(loaded.analysis.report.quality_score, 90.0);
        assert_eq!(loaded.created_at, saved.created_at);

        assert_eq!(store.list().expect("list").len(), 1);
    }

    #[test]
    fn test_json_store_get_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::open(dir.path()).expect("open");
        assert!(store.get("no-such-id").expect("get").is_none());
    }

    #[test]
    fn test_memory_store_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.save(sample_analysis("a")).expect("save");
        let b = store.save(sample_analysis("b")).expect("save");

        assert_ne!(a.id, b.id);
        assert_eq!(store.list().expect("list").len(), 2);
        assert_eq!(
            store.get(&b.id).expect("get").expect("exists").analysis.title,
            "b"
        );
    }
}
