//! End-to-end archive conversion
//!
//! load -> (gunzip) -> decode -> reconstruct -> serialise

use std::io::Write;

use crate::config::{ConvertConfig, InputFormat};
use crate::error::ConvertError;
use crate::ingest::{gunzip, load_source, parse_mbox, parse_records_json};
use crate::models::Thread;
use crate::threading::{Reconstruction, reconstruct};

/// Load, decode and thread the archive described by `config`.
pub async fn convert(config: &ConvertConfig) -> Result<Reconstruction, ConvertError> {
    let mut content = load_source(&config.source, config.fetch_timeout).await?;
    if config.gzip {
        content = gunzip(&content)?;
    }

    let results = match config.format {
        InputFormat::Mbox => parse_mbox(&content),
        InputFormat::Json => parse_records_json(&content)?,
    };
    log::info!("decoded {} {} records from {}", results.len(), config.format, config.source);

    Ok(reconstruct(results))
}

/// Write threads as a JSON array followed by a newline.
pub fn write_threads<W: Write>(
    threads: &[Thread],
    mut writer: W,
    pretty: bool,
) -> Result<(), ConvertError> {
    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, threads)
    } else {
        serde_json::to_writer(&mut writer, threads)
    };
    written.map_err(|err| {
        if err.is_io() {
            ConvertError::Write(err.into())
        } else {
            ConvertError::Json(err)
        }
    })?;
    writer.write_all(b"\n").map_err(ConvertError::Write)?;
    writer.flush().map_err(ConvertError::Write)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threading::reconstruct_threads;
    use crate::threading::test_support::record;

    #[test]
    fn test_write_threads_shape() {
        let threads = reconstruct_threads(vec![record("a", None, 1), record("b", Some("a"), 2)]);

        let mut out = Vec::new();
        write_threads(&threads, &mut out, false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let thread = &value[0];
        assert_eq!(thread[0]["message_id"], "a");
        assert_eq!(thread[1][0]["message_id"], "a");
        assert!(thread[1][0]["previous"].is_null());
        assert_eq!(thread[1][0]["next"]["message_id"], "b");
        assert!(thread[1][1]["next"].is_null());
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("no space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_not_a_json_error() {
        let threads = reconstruct_threads(vec![record("a", None, 1)]);

        for pretty in [false, true] {
            let err = write_threads(&threads, FullDisk, pretty).unwrap_err();
            assert!(matches!(err, ConvertError::Write(_)), "got {err:?}");
        }
    }

    #[test]
    fn test_write_empty_result() {
        let mut out = Vec::new();
        write_threads(&[], &mut out, true).unwrap();
        assert_eq!(out, b"[]\n");
    }
}
