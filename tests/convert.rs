use std::io::Write;
use std::path::Path;
use std::time::Duration;

use flate2::Compression;
use flate2::write::GzEncoder;
use mailarchive::{ConvertConfig, ConvertError, InputFormat, convert, write_threads};
use tempfile::NamedTempFile;

const MBOX: &str = "\
From alice at example.com  Tue Jan  1 09:00:00 2008
From: alice at example.com (Alice)
Message-ID: <start@example.com>
Date: Tue, 01 Jan 2008 09:00:00 +0000
Subject: Release planning

When do we branch?

From bob at example.com  Tue Jan  1 10:00:00 2008
From: bob at example.com (Bob)
Message-ID: <reply@example.com>
In-Reply-To: <start@example.com>
References: <start@example.com>
Date: Tue, 01 Jan 2008 10:00:00 +0000
Subject: Re: Release planning

Next week.

From carol at example.com  Tue Jan  1 11:00:00 2008
From: carol at example.com (Carol)
Subject: Lost header

This one has no Message-ID.

From dave at example.com  Mon Dec 31 08:00:00 2007
From: dave at example.com (Dave)
Message-ID: <late@example.com>
In-Reply-To: <december@example.com>
References: <november@example.com> <december@example.com>
Date: Mon, 31 Dec 2007 08:00:00 +0000
Subject: Re: Holiday schedule

Catching up on last month.
";

fn write_temp(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

fn config_for(path: &Path, format: InputFormat, gzip: bool) -> ConvertConfig {
    ConvertConfig {
        source: path.display().to_string(),
        format,
        gzip,
        output: None,
        pretty: false,
        fetch_timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_convert_mbox_file() {
    let file = write_temp(MBOX.as_bytes());

    let outcome = convert(&config_for(file.path(), InputFormat::Mbox, false))
        .await
        .unwrap();

    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.threads.len(), 2);

    let december = &outcome.threads[0];
    assert_eq!(december.info.message_id, "december@example.com");
    assert_eq!(december.info.subject, "Re: Holiday schedule");

    let planning = &outcome.threads[1];
    assert_eq!(planning.info.message_id, "start@example.com");
    let ids: Vec<&str> = planning
        .messages
        .iter()
        .map(|m| m.record.message_id.as_str())
        .collect();
    assert_eq!(ids, vec!["start@example.com", "reply@example.com"]);

    let start = &planning.messages[0];
    assert_eq!(start.previous.as_ref().unwrap().message_id, "late@example.com");
    assert_eq!(start.next.as_ref().unwrap().from, "Bob");
    assert_eq!(start.record.payload, "When do we branch?");
}

#[tokio::test]
async fn test_convert_gzip_mbox() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(MBOX.as_bytes()).unwrap();
    let file = write_temp(&encoder.finish().unwrap());

    let outcome = convert(&config_for(file.path(), InputFormat::Mbox, true))
        .await
        .unwrap();
    assert_eq!(outcome.threads.len(), 2);

    let undecoded = convert(&config_for(file.path(), InputFormat::Mbox, false))
        .await
        .map(|outcome| outcome.threads.len());
    // Compressed bytes have no "From " separators
    assert_eq!(undecoded.unwrap(), 0);
}

#[tokio::test]
async fn test_convert_json_records() {
    let file = write_temp(
        br#"[
            {"message_id": "b", "in_reply_to": "a", "subject": "Re: hi", "date_utc": 20, "from": "b at x.org (Bee)"},
            {"message_id": "a", "subject": "hi", "date_utc": 10, "from": "a at x.org"},
            {"subject": "broken", "date_utc": 30}
        ]"#,
    );

    let outcome = convert(&config_for(file.path(), InputFormat::Json, false))
        .await
        .unwrap();

    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.threads.len(), 1);
    let thread = &outcome.threads[0];
    assert_eq!(thread.messages[0].record.message_id, "a");
    assert_eq!(thread.messages[0].next.as_ref().unwrap().from, "Bee");
}

#[tokio::test]
async fn test_missing_source_is_fatal() {
    let config = config_for(Path::new("/nonexistent/archive.txt"), InputFormat::Mbox, false);
    assert!(matches!(convert(&config).await, Err(ConvertError::Io { .. })));
}

#[tokio::test]
async fn test_malformed_json_is_fatal() {
    let file = write_temp(b"[{\"message_id\": ");
    let result = convert(&config_for(file.path(), InputFormat::Json, false)).await;
    assert!(matches!(result, Err(ConvertError::Json(_))));
}

#[tokio::test]
async fn test_written_output_is_thread_pairs() {
    let file = write_temp(MBOX.as_bytes());
    let outcome = convert(&config_for(file.path(), InputFormat::Mbox, false))
        .await
        .unwrap();

    let output = NamedTempFile::new().unwrap();
    write_threads(&outcome.threads, output.reopen().unwrap(), true).unwrap();

    let written = std::fs::read_to_string(output.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    let threads = value.as_array().unwrap();

    assert_eq!(threads.len(), 2);
    assert_eq!(threads[1][0]["message_id"], "start@example.com");
    assert_eq!(threads[1][1][1]["in_reply_to"], "start@example.com");
    assert_eq!(threads[1][1][1]["previous"]["subject"], "Release planning");
    assert!(threads[1][1][1]["next"].is_null());
}
