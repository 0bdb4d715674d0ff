// Stored records, request payloads, and response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A transaction parsed out of a bank email, waiting to be categorised and
/// picked up by the finance service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingTransaction {
    pub id: i64,
    pub store_name: String,
    pub amount: f64,
    pub currency: String,
    pub date: String,
    pub email_id: String,
    pub created_at: DateTime<Utc>,
    pub processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub description_added_at: Option<DateTime<Utc>>,
    pub requires_description: bool,
    /// Category and tags written onto this record by hand, independent of the mapping table.
    pub assigned: Option<DirectAssignment>,
}

impl PendingTransaction {
    pub fn has_description(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectAssignment {
    pub has_mapping: bool,
    pub category: String,
    pub tags: Vec<String>,
    pub mapping_updated_at: DateTime<Utc>,
}

/// Validated input for a new pending transaction.
#[derive(Debug, Clone)]
pub struct NewPendingTransaction {
    pub store_name: String,
    pub amount: f64,
    pub currency: String,
    pub date: String,
    pub email_id: String,
    pub requires_description: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MerchantMapping {
    pub id: i64,
    pub store_name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub updated_at: DateTime<Utc>,
}

/// A pending transaction with mapping info joined on at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTransaction {
    #[serde(flatten)]
    pub transaction: PendingTransaction,
    pub has_mapping: bool,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub name: String,
    #[serde(default)]
    pub usage_count: i64,
}

// Amounts and ids arrive either as JSON numbers or as strings from the email parser.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Number(i64),
    Text(String),
}

// API request models

#[derive(Debug, Deserialize)]
pub struct CreatePendingRequest {
    pub store_name: Option<String>,
    pub amount: Option<AmountInput>,
    pub currency: Option<String>,
    pub date: Option<String>,
    pub email_id: Option<String>,
    #[serde(default)]
    pub requires_description: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpsertMappingRequest {
    pub store_name: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub clear_tags: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMappingRequest {
    #[serde(alias = "_id")]
    pub id: Option<IdInput>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub clear_tags: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteMappingRequest {
    #[serde(alias = "_id")]
    pub id: Option<IdInput>,
}

#[derive(Debug, Deserialize)]
pub struct DescriptionRequest {
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignMappingRequest {
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SyncCategoriesRequest {
    pub categories: Option<Vec<UsageEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct SyncTagsRequest {
    pub tags: Option<Vec<UsageEntry>>,
}

// API response models

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct UpsertOutcome {
    pub id: i64,
    pub created: bool,
}

#[derive(Debug, Serialize)]
pub struct CountOutcome {
    pub count: u64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessedOutcome {
    pub id: i64,
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Serialize)]
pub struct CategoryLookup {
    pub store_name: String,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Suggestions {
    pub names: Vec<String>,
    pub count: usize,
}
