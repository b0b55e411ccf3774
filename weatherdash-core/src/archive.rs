//! Archive of user-submitted project links and the profiles that own them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Mutex,
};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::validation::{LinkForm, ValidationError, validate_telegram_url};

/// Tags an archive link may carry.
pub const AVAILABLE_TAGS: &[&str] = &[
    "html", "css", "javascript", "typescript", "react", "vue", "angular", "node", "python", "php",
    "java", "csharp", "go", "rust", "svelte", "nextjs", "nuxt", "tailwind", "bootstrap", "sass",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    pub id: String,
    pub link_name: String,
    pub url: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub tags: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// A link as submitted; the author's name is copied from their profile on create.
#[derive(Debug, Clone)]
pub struct NewArchive {
    pub link_name: String,
    pub url: String,
    pub user_id: String,
    pub tags: Vec<String>,
}

/// Both parts are optional. Tags match if any of them overlaps the entry's tags.
#[derive(Debug, Clone, Default)]
pub struct ArchiveFilter {
    pub tags: Vec<String>,
    pub user_id: Option<String>,
}

impl ArchiveFilter {
    fn matches(&self, entry: &ArchiveEntry) -> bool {
        let tags_ok = self.tags.is_empty() || self.tags.iter().any(|t| entry.tags.contains(t));
        let owner_ok = self.user_id.as_ref().is_none_or(|uid| &entry.user_id == uid);
        tags_ok && owner_ok
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Some("")` clears the link.
    pub telegram_url: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArchiveError {
    #[error("Archive '{0}' not found")]
    NotFound(String),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[async_trait]
pub trait ArchiveRepository: Send + Sync + std::fmt::Debug {
    async fn create(&self, new: NewArchive) -> Result<String, ArchiveError>;

    /// Matching entries, newest first.
    async fn list(&self, filter: &ArchiveFilter) -> Result<Vec<ArchiveEntry>, ArchiveError>;

    async fn get(&self, id: &str) -> Result<ArchiveEntry, ArchiveError>;

    async fn get_user(&self, uid: &str) -> Result<UserProfile, ArchiveError>;

    async fn upsert_user(&self, profile: UserProfile) -> Result<(), ArchiveError>;

    async fn update_user(&self, uid: &str, update: ProfileUpdate) -> Result<UserProfile, ArchiveError>;

    /// Every tag used by at least one entry, sorted.
    async fn all_tags(&self) -> Result<Vec<String>, ArchiveError> {
        let entries = self.list(&ArchiveFilter::default()).await?;
        let tags: BTreeSet<String> = entries.into_iter().flat_map(|e| e.tags).collect();
        Ok(tags.into_iter().collect())
    }

    /// One `(user_id, first_name, last_name)` per poster, sorted by user id.
    /// The name comes from that user's most recent upload.
    async fn all_authors(&self) -> Result<Vec<(String, String, String)>, ArchiveError> {
        let entries = self.list(&ArchiveFilter::default()).await?;
        let mut authors: BTreeMap<String, (String, String)> = BTreeMap::new();
        for e in entries {
            authors.entry(e.user_id).or_insert((e.first_name, e.last_name));
        }
        Ok(authors.into_iter().map(|(uid, (first, last))| (uid, first, last)).collect())
    }
}

#[derive(Debug, Default)]
struct Tables {
    entries: HashMap<String, ArchiveEntry>,
    users: HashMap<String, UserProfile>,
}

#[derive(Debug, Default)]
pub struct InMemoryArchiveRepository {
    tables: Mutex<Tables>,
}

impl InMemoryArchiveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    fn insert_entry(&self, entry: ArchiveEntry) {
        self.tables().entries.insert(entry.id.clone(), entry);
    }
}

#[async_trait]
impl ArchiveRepository for InMemoryArchiveRepository {
    async fn create(&self, new: NewArchive) -> Result<String, ArchiveError> {
        LinkForm {
            link_name: new.link_name.clone(),
            url: new.url.clone(),
            tags: new.tags.clone(),
        }
        .validate()?;

        let mut tables = self.tables();
        let author = tables
            .users
            .get(&new.user_id)
            .ok_or_else(|| ArchiveError::UserNotFound(new.user_id.clone()))?;

        let id = Uuid::new_v4().to_string();
        let entry = ArchiveEntry {
            id: id.clone(),
            link_name: new.link_name.trim().to_string(),
            url: new.url.trim().to_string(),
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            user_id: new.user_id,
            tags: new.tags,
            uploaded_at: Utc::now(),
        };

        debug!(%id, user = %entry.user_id, "archive created");
        tables.entries.insert(id.clone(), entry);
        Ok(id)
    }

    async fn list(&self, filter: &ArchiveFilter) -> Result<Vec<ArchiveEntry>, ArchiveError> {
        let mut found: Vec<ArchiveEntry> = self
            .tables()
            .entries
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(found)
    }

    async fn get(&self, id: &str) -> Result<ArchiveEntry, ArchiveError> {
        self.tables()
            .entries
            .get(id)
            .cloned()
            .ok_or_else(|| ArchiveError::NotFound(id.to_string()))
    }

    async fn get_user(&self, uid: &str) -> Result<UserProfile, ArchiveError> {
        self.tables()
            .users
            .get(uid)
            .cloned()
            .ok_or_else(|| ArchiveError::UserNotFound(uid.to_string()))
    }

    async fn upsert_user(&self, profile: UserProfile) -> Result<(), ArchiveError> {
        validate_telegram_url(profile.telegram_url.as_deref())?;
        self.tables().users.insert(profile.uid.clone(), profile);
        Ok(())
    }

    async fn update_user(&self, uid: &str, update: ProfileUpdate) -> Result<UserProfile, ArchiveError> {
        validate_telegram_url(update.telegram_url.as_deref())?;

        let mut tables = self.tables();
        let profile = tables
            .users
            .get_mut(uid)
            .ok_or_else(|| ArchiveError::UserNotFound(uid.to_string()))?;

        if let Some(first) = update.first_name {
            profile.first_name = first;
        }
        if let Some(last) = update.last_name {
            profile.last_name = last;
        }
        if let Some(link) = update.telegram_url {
            profile.telegram_url = if link.trim().is_empty() { None } else { Some(link) };
        }

        Ok(profile.clone())
    }
}
