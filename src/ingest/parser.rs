//! Message parsing and normalization.
//!
//! Turns raw RFC 5322 message bytes into [`Record`]s using the `mailparse`
//! crate. Encoded headers (RFC 2047) are decoded by `mailparse`; this module
//! only normalizes what threading depends on.
//!
//! # Threading Support
//!
//! - **message_id**: unique identifier, angle brackets removed (required)
//! - **in_reply_to**: direct parent reference, normalized the same way
//! - **references**: full reference chain from oldest to newest
//! - **date_utc**: seconds since the epoch, used for ordering
//!
//! # Error Handling
//!
//! A message that cannot be used produces a [`RecordError`] for that
//! message only. Callers collect these and continue with the rest.

use mailparse::{MailHeaderMap, ParsedMail, parse_mail};

use crate::error::RecordError;
use crate::models::{Record, message_id_hash, sender_hash};

/// Remove NUL bytes and surrounding whitespace
fn sanitize_text(text: &str) -> String {
    text.replace('\0', "").trim().to_string()
}

/// Clean and normalize message IDs by removing angle brackets and whitespace
fn normalize_message_id(msg_id: Option<&str>) -> Option<String> {
    msg_id.and_then(|id| {
        let cleaned = id.trim().trim_matches(&['<', '>'][..]).trim();
        if cleaned.is_empty() {
            None
        } else {
            Some(sanitize_text(cleaned))
        }
    })
}

/// Extract message IDs from a References header, oldest first
fn extract_references(header_value: &str) -> Vec<String> {
    header_value
        .split_whitespace()
        .map(|id| sanitize_text(id.trim_matches(&['<', '>'][..])))
        .filter(|id| !id.is_empty())
        .collect()
}

/// Parse one message into a record.
///
/// `position` is the message's index in its archive and is only used to
/// identify messages that have no Message-ID.
///
/// # Optional Fields (with defaults)
///
/// - **Subject**: defaults to `"(No Subject)"`
/// - **From**: empty string if missing
/// - **Body**: the first `text/plain` part, or the root body
/// - **In-Reply-To** / **References**: none if missing
///
/// # Error Cases
///
/// - MIME parsing fails
/// - Message-ID missing or empty after normalization
/// - Date missing or unparseable
pub fn parse_message(position: usize, raw: &[u8]) -> Result<Record, RecordError> {
    let parsed = parse_mail(raw).map_err(|source| {
        log::debug!("failed to parse MIME for message {}: {}", position, source);
        RecordError::MimeParse { position, source }
    })?;

    let raw_message_id = parsed.headers.get_first_value("Message-ID");
    let message_id = normalize_message_id(raw_message_id.as_deref())
        .ok_or(RecordError::MissingMessageId { position })?;

    let subject = parsed
        .headers
        .get_first_value("Subject")
        .map(|s| sanitize_text(&s))
        .unwrap_or_else(|| "(No Subject)".to_string());

    let raw_date = parsed.headers.get_first_value("Date");
    let date_utc = parse_date_utc(raw_date.as_deref(), &message_id)?;

    let from = parsed
        .headers
        .get_first_value("From")
        .map(|s| sanitize_text(&s))
        .unwrap_or_default();

    let in_reply_to = normalize_message_id(parsed.headers.get_first_value("In-Reply-To").as_deref());

    let references = parsed
        .headers
        .get_first_value("References")
        .map(|v| extract_references(&v))
        .unwrap_or_default();

    log::trace!("parsed: {} - {}", message_id, subject);

    Ok(Record {
        // Archive URLs hash the header exactly as it was sent
        message_id_hash: message_id_hash(raw_message_id.as_deref().unwrap_or_default().trim()),
        message_id,
        in_reply_to,
        references,
        subject,
        date: raw_date.map(|d| sanitize_text(&d)),
        date_utc,
        from_hash: sender_hash(&from),
        from,
        payload: extract_body(&parsed),
    })
}

fn extract_body(parsed: &ParsedMail<'_>) -> String {
    let body = parsed
        .subparts
        .iter()
        .find(|part| part.ctype.mimetype == "text/plain")
        .and_then(|part| part.get_body().ok())
        .filter(|text| !text.is_empty())
        .or_else(|| parsed.get_body().ok())
        .unwrap_or_default();

    sanitize_text(&body)
}

fn parse_date_utc(raw_date: Option<&str>, message_id: &str) -> Result<i64, RecordError> {
    let raw = raw_date.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(RecordError::MissingDate {
            message_id: message_id.to_string(),
        });
    }

    dateparser::parse(raw)
        .map(|dt| dt.timestamp())
        .map_err(|source| {
            log::debug!("message {} has invalid date `{}`: {}", message_id, raw, source);
            RecordError::InvalidDate {
                message_id: message_id.to_string(),
                raw: raw.to_string(),
                error: source.to_string(),
            }
        })
}
