//! Dublin Core metadata block.
//!
//! A value object composed into [`crate::content::Content`] rather than
//! mixed in: titles, descriptions, authorship, and the effective /
//! expiration publication window, plus the creation and modification
//! timestamps the resolver cache keys on.
//!
//! Catalog-facing accessors never return `None`: a missing effective
//! date falls back to the creation date and a missing expiration
//! ceilings far in the future ("never expires"), so range queries stay
//! total. The floor/ceiling sentinels bracket every representable
//! publication window for catalog range indexes.

use crate::security::SecurityPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for "always effective": 1970-01-01T00:00:00Z. The lower
/// bracket catalog range indexes pair with [`ceiling_date`]; every
/// block's window sits inside `[floor_date, ceiling_date]`.
pub fn floor_date() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Sentinel for "never expires": 2500-01-01T00:00:00Z.
pub fn ceiling_date() -> DateTime<Utc> {
    DateTime::from_timestamp(16_725_225_600, 0).expect("ceiling date is representable")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataBlock {
    pub title: String,
    pub description: String,
    pub subject: Vec<String>,
    pub creators: Vec<String>,
    pub contributors: Vec<String>,
    pub creation_date: DateTime<Utc>,
    pub modification_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    pub format: String,
    pub language: String,
    pub rights: String,
}

impl Default for MetadataBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataBlock {
    /// Fresh block stamped with the current time.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            title: String::new(),
            description: String::new(),
            subject: Vec::new(),
            creators: Vec::new(),
            contributors: Vec::new(),
            creation_date: now,
            modification_date: now,
            effective_date: None,
            expiration_date: None,
            format: "text/html".to_string(),
            language: String::new(),
            rights: String::new(),
        }
    }

    // Catalog-facing accessors.

    pub fn created(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modification_date
    }

    /// Effective date, falling back to the creation date.
    pub fn effective(&self) -> DateTime<Utc> {
        self.effective_date.unwrap_or(self.creation_date)
    }

    /// Expiration date, or the ceiling when none is set.
    pub fn expires(&self) -> DateTime<Utc> {
        self.expiration_date.unwrap_or_else(ceiling_date)
    }

    /// Default date: the effective date if set, modification date otherwise.
    pub fn date(&self) -> DateTime<Utc> {
        self.effective_date.unwrap_or(self.modification_date)
    }

    /// Is `at` within the publication window? Missing bounds are open.
    pub fn is_effective(&self, at: DateTime<Utc>) -> bool {
        let past_effective = self.effective_date.is_none_or(|effective| effective <= at);
        let before_expiration = self.expiration_date.is_none_or(|expiration| expiration >= at);
        past_effective && before_expiration
    }

    // Mutators. String inputs are trimmed element-wise; enforcement of
    // modify permissions stays with the caller.

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_subject<I, S>(&mut self, subject: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.subject = trimmed(subject);
    }

    pub fn set_creators<I, S>(&mut self, creators: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.creators = trimmed(creators);
    }

    pub fn set_contributors<I, S>(&mut self, contributors: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.contributors = trimmed(contributors);
    }

    pub fn set_effective_date(&mut self, date: Option<DateTime<Utc>>) {
        self.effective_date = date;
    }

    pub fn set_expiration_date(&mut self, date: Option<DateTime<Utc>>) {
        self.expiration_date = date;
    }

    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    pub fn set_rights(&mut self, rights: impl Into<String>) {
        self.rights = rights.into();
    }

    /// Stamp the modification date; `None` means now.
    pub fn set_modification_date(&mut self, date: Option<DateTime<Utc>>) {
        self.modification_date = date.unwrap_or_else(Utc::now);
    }

    /// Append a creator unless already listed.
    pub fn add_creator(&mut self, creator: Option<&str>) {
        let Some(creator) = creator.map(str::trim).filter(|c| !c.is_empty()) else {
            return;
        };
        if !self.creators.iter().any(|existing| existing == creator) {
            self.creators.push(creator.to_string());
        }
    }

    /// Update creators and the modification date. Called when the content
    /// is re-indexed after a change.
    pub fn notify_modified(&mut self, policy: &dyn SecurityPolicy) {
        let user = policy.current_user_id();
        self.add_creator(user.as_deref());
        self.set_modification_date(None);
    }
}

fn trimmed<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_string())
        .collect()
}
