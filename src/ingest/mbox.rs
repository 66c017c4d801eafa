//! Mbox archive decoding
//!
//! Messages in an mbox file are separated by lines starting with `From `
//! (note the space). The separator line belongs to the container, not the
//! message, and is dropped.

use std::io::Read;

use flate2::read::GzDecoder;
use rayon::prelude::*;

use super::parser::parse_message;
use crate::error::{ConvertError, RecordError};
use crate::models::Record;

/// Split mbox content into raw messages
///
/// Content before the first separator is ignored, so input without any
/// separator yields no messages.
pub fn split_messages(content: &[u8]) -> Vec<&[u8]> {
    let mut messages = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    for line in content.split_inclusive(|&byte| byte == b'\n') {
        if line.starts_with(b"From ") {
            if let Some(begin) = start {
                messages.push(&content[begin..offset]);
            }
            start = Some(offset + line.len());
        }
        offset += line.len();
    }

    if let Some(begin) = start {
        messages.push(&content[begin..]);
    }

    messages
}

/// Decode every message of an mbox archive.
///
/// Parsing is parallelized with Rayon; results keep archive order.
pub fn parse_mbox(content: &[u8]) -> Vec<Result<Record, RecordError>> {
    let messages = split_messages(content);
    log::debug!("mbox contains {} messages", messages.len());

    messages
        .par_iter()
        .enumerate()
        .map(|(position, raw)| parse_message(position, raw))
        .collect()
}

/// Decompress a gzip compressed archive
pub fn gunzip(compressed: &[u8]) -> Result<Vec<u8>, ConvertError> {
    log::debug!("decompressing archive ({} bytes)", compressed.len());

    let mut decoder = GzDecoder::new(compressed);
    let mut content = Vec::new();
    decoder
        .read_to_end(&mut content)
        .map_err(ConvertError::Gzip)?;

    Ok(content)
}
