//! Public models for the sales-pipeline module.
//!
//! Transport-agnostic: ids are opaque strings, dates are calendar dates and
//! serialize as `YYYY-MM-DD`. Conversion to the gateway's field names and
//! `DD/MM/YYYY` dates happens inside the module.

use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// A sales pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funnel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub active: bool,
    #[serde(default, with = "iso_date::option")]
    pub created_on: Option<Date>,
    #[serde(default, with = "iso_date::option")]
    pub updated_on: Option<Date>,
}

/// One phase of a funnel. `position` orders stages ascending and is not
/// renumbered or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub funnel_id: String,
    pub name: String,
    pub position: i32,
    pub color: String,
    pub active: bool,
}

/// A sales opportunity sitting in one stage of one funnel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub description: String,
    pub value: f64,
    pub stage_id: String,
    pub funnel_id: String,
    #[serde(default, with = "iso_date::option")]
    pub due_on: Option<Date>,
    pub tag: String,
    pub tag_color: String,
    #[serde(default)]
    pub partner_id: Option<String>,
    pub active: bool,
    #[serde(default, with = "iso_date::option")]
    pub created_on: Option<Date>,
    #[serde(default, with = "iso_date::option")]
    pub updated_on: Option<Date>,
}

/// Funnel write. A present, non-blank `id` means update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Falls back to the module's default color.
    #[serde(default)]
    pub color: Option<String>,
}

/// Stage write. A present, non-blank `id` means update.
///
/// `funnel_id` is needed for both modes: it is written on create and scopes
/// the re-read after any save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub funnel_id: String,
    #[serde(default)]
    pub name: String,
    /// Defaults to 0.
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Lead write. A present, non-blank `id` means update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: f64,
    pub stage_id: String,
    pub funnel_id: String,
    #[serde(default, with = "iso_date::option")]
    pub due_on: Option<Date>,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub tag_color: String,
    #[serde(default)]
    pub partner_id: Option<String>,
}

impl FunnelDraft {
    /// The id when this draft targets an existing funnel.
    #[must_use]
    pub fn existing_id(&self) -> Option<&str> {
        existing(self.id.as_deref())
    }
}

impl StageDraft {
    #[must_use]
    pub fn existing_id(&self) -> Option<&str> {
        existing(self.id.as_deref())
    }
}

impl LeadDraft {
    #[must_use]
    pub fn existing_id(&self) -> Option<&str> {
        existing(self.id.as_deref())
    }
}

fn existing(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}
