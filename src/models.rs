use md5::Md5;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};
use sha1::{Digest, Sha1};

use crate::error::RecordError;

// ===== Input Records =====

/// A decoded message, validated once at ingestion.
///
/// Identity fields are never mutated by threading; navigation data is
/// attached separately through [`LinkedMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub message_id: String,
    pub message_id_hash: String,
    pub in_reply_to: Option<String>,
    /// Ancestor message ids, oldest first.
    #[serde(default)]
    pub references: Vec<String>,
    pub subject: String,
    /// Raw Date header, kept for display.
    #[serde(default)]
    pub date: Option<String>,
    pub date_utc: i64,
    pub from: String,
    pub from_hash: String,
    #[serde(default)]
    pub payload: String,
}

/// Loosely typed record as it arrives from a JSON export.
///
/// Every field is optional; [`Record::from_raw`] decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    pub message_id: Option<String>,
    pub message_id_hash: Option<String>,
    pub in_reply_to: Option<String>,
    /// Whitespace separated ids, oldest first.
    pub references: Option<String>,
    pub subject: Option<String>,
    pub date: Option<String>,
    pub date_utc: Option<i64>,
    pub from: Option<String>,
    pub payload: Option<String>,
}

impl Record {
    /// Validate a raw record. `position` is only used for error reporting.
    pub fn from_raw(raw: RawRecord, position: usize) -> Result<Self, RecordError> {
        let message_id = raw
            .message_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(RecordError::MissingMessageId { position })?;

        let date_utc = raw.date_utc.ok_or_else(|| RecordError::MissingDate {
            message_id: message_id.clone(),
        })?;

        let message_id_hash = raw
            .message_id_hash
            .unwrap_or_else(|| message_id_hash(&message_id));
        let from = raw.from.unwrap_or_default();

        Ok(Record {
            in_reply_to: raw
                .in_reply_to
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            references: raw
                .references
                .as_deref()
                .map(split_references)
                .unwrap_or_default(),
            subject: raw.subject.unwrap_or_default(),
            date: raw.date,
            date_utc,
            from_hash: sender_hash(&from),
            from,
            payload: raw.payload.unwrap_or_default(),
            message_id_hash,
            message_id,
        })
    }
}

/// Split a References header value into ids, oldest first
pub fn split_references(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Hex SHA-1 of a Message-ID, used in archive URLs.
pub fn message_id_hash(message_id: &str) -> String {
    format!("{:x}", Sha1::digest(message_id.as_bytes()))
}

/// Hex MD5 of the sender address.
///
/// Pipermail archives obfuscate addresses as `user at host`; those are
/// rewritten to `user@host` first so both spellings hash the same.
pub fn sender_hash(from: &str) -> String {
    let plain_address = matches!(
        (from.find('@'), from.find(' ')),
        (Some(at), Some(space)) if space > at
    );
    let sender = if plain_address {
        from.to_string()
    } else {
        from.replace(" at ", "@")
    };

    format!("{:x}", Md5::digest(sender.as_bytes()))
}

// ===== Threading Output =====

/// Minimal projection of a message used for previous/next navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub message_id: String,
    pub message_id_hash: String,
    pub from: String,
    pub subject: String,
}

/// Identifies a thread by its root (real or synthesized).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadInfo {
    pub message_id: String,
    pub subject: String,
}

/// A record annotated with its global chronological neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedMessage {
    #[serde(flatten)]
    pub record: Record,
    pub previous: Option<PagingInfo>,
    pub next: Option<PagingInfo>,
}

/// A finished thread: its identity and its messages in depth-first order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub info: ThreadInfo,
    pub messages: Vec<LinkedMessage>,
}

// Threads are written as `[info, messages]` pairs.
impl Serialize for Thread {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.info)?;
        pair.serialize_element(&self.messages)?;
        pair.end()
    }
}
