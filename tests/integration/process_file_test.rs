use anyhow::Result;
use std::time::Duration;

use data_processor::{ProcessError, Processor};
use test_support::{timeouts, IsolatedData};

#[tokio::test]
async fn test_process_file_reads_and_normalizes() -> Result<()> {
    let data = IsolatedData::new()?;
    let mut processor =
        Processor::new(data.file_path("greeting.txt")).with_timeout(timeouts::file_read());

    let result = processor.process_file().await?;

    assert_eq!(result, "HELLO WORLD");
    assert_eq!(processor.results(), ["HELLO WORLD"]);
    Ok(())
}

#[tokio::test]
async fn test_process_file_unicode() -> Result<()> {
    let data = IsolatedData::new()?;
    let mut processor = Processor::new(data.file_path("unicode.txt"));

    assert_eq!(processor.process_file().await?, "STRASSE CAF\u{c9}");
    Ok(())
}

#[tokio::test]
async fn test_process_file_keeps_inner_newlines() -> Result<()> {
    let data = IsolatedData::new()?;
    let mut processor = Processor::new(data.file_path("multiline.txt"));

    assert_eq!(processor.process_file().await?, "LINE ONE\nLINE TWO");
    Ok(())
}

#[tokio::test]
async fn test_process_file_blank_file() -> Result<()> {
    let data = IsolatedData::new()?;
    let mut processor = Processor::new(data.file_path("blank.txt"));

    assert_eq!(processor.process_file().await?, "");
    assert_eq!(processor.results().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_process_file_invalid_utf8() -> Result<()> {
    let data = IsolatedData::new()?;
    let mut processor = Processor::new(data.file_path("invalid.bin"));

    let err = processor.process_file().await.unwrap_err();

    assert!(matches!(err, ProcessError::Decode(_)));
    assert!(processor.results().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_process_file_missing_file() -> Result<()> {
    let data = IsolatedData::new()?;
    let mut processor = Processor::new(data.file_path("does-not-exist.txt"));

    let err = processor.process_file().await.unwrap_err();

    match &err {
        ProcessError::Io { path, source } => {
            assert_eq!(path, &data.file_path("does-not-exist.txt"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert!(err.to_string().contains("does-not-exist.txt"));
    assert!(processor.results().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_process_file_on_directory_fails() -> Result<()> {
    let data = IsolatedData::new()?;
    let mut processor = Processor::new(data.path()).with_timeout(Duration::from_secs(5));

    let err = processor.process_file().await.unwrap_err();

    assert!(matches!(err, ProcessError::Io { .. }));
    assert!(processor.results().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_process_file_follows_in_memory_results() -> Result<()> {
    let data = IsolatedData::new()?;
    let path = data.write_file("custom.txt", b"  from disk ")?;
    let mut processor = Processor::new(path);

    processor.process(b"in memory")?;
    processor.process_file().await?;

    assert_eq!(processor.results(), ["IN MEMORY", "FROM DISK"]);
    Ok(())
}

#[test]
fn test_process_file_blocking() -> Result<()> {
    let data = IsolatedData::new()?;
    let mut processor = Processor::new(data.file_path("greeting.txt"));

    let result = tokio_test::block_on(processor.process_file())?;

    assert_eq!(result, "HELLO WORLD");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_file_timeout_leaves_results_untouched() -> Result<()> {
    let data = IsolatedData::new()?;
    let fifo = data.file_path("stalled.fifo");
    let status = std::process::Command::new("mkfifo").arg(&fifo).status()?;
    assert!(status.success());

    // Opening a FIFO for reading blocks until a writer shows up.
    let mut processor = Processor::new(&fifo).with_timeout(Duration::from_millis(100));
    processor.process(b"kept")?;

    let err = processor.process_file().await.unwrap_err();

    match &err {
        ProcessError::Timeout { path, timeout } => {
            assert_eq!(path, &fifo);
            assert_eq!(*timeout, Duration::from_millis(100));
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
    assert!(!err.is_transient());
    assert_eq!(processor.results(), ["KEPT"]);

    // Release the blocked reader so the runtime can shut down.
    drop(std::fs::OpenOptions::new().write(true).open(&fifo)?);
    Ok(())
}
