//! Batch driver integration tests.
//!
//! Exercise the public surface end-to-end: catalog loading, folder
//! iteration, typed event emission, progress reporting, and cooperative
//! cancellation. Paths that need a real ffmpeg (dual-episode splitting)
//! are covered at the unit level instead.

use std::sync::Arc;

use episplit_engine::{BatchDriver, ChannelSink, EngineConfig};
use episplit_models::BatchEvent;

fn setup(dir: &std::path::Path, catalog_rows: &str) -> EngineConfig {
    let config = EngineConfig {
        input_folder: dir.join("in"),
        output_folder: dir.join("out"),
        catalog_path: dir.join("episode_list.csv"),
        ..EngineConfig::default()
    };
    std::fs::create_dir_all(&config.input_folder).unwrap();
    std::fs::write(
        &config.catalog_path,
        format!("SeasonNumber,EpisodeNumber,EpisodeName,AbbvCombo\n{catalog_rows}"),
    )
    .unwrap();
    config
}

/// A mixed folder: one resolvable single episode, one file outside the
/// naming contract. The batch finishes, skipping only the stray file.
#[tokio::test]
async fn test_mixed_folder_processes_and_skips() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), "1,3,Gamma,g\n");
    let output_folder = config.output_folder.clone();

    std::fs::write(
        config.input_folder.join("Show - S01E03 - Gamma.mkv"),
        b"payload",
    )
    .unwrap();
    std::fs::write(config.input_folder.join("stray_recording.mkv"), b"x").unwrap();

    let (sink, mut rx) = ChannelSink::new();
    let driver = BatchDriver::new(config).with_event_sink(Arc::new(sink));
    let summary = driver.run().await.unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.skipped, 1);
    assert!(!summary.cancelled);
    assert_eq!(
        std::fs::read(output_folder.join("Show - S01E03 - Gamma.mkv")).unwrap(),
        b"payload"
    );

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert!(events
        .iter()
        .any(|e| matches!(e, BatchEvent::FileCopied { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, BatchEvent::FileSkipped { .. })));
    match events.last().unwrap() {
        BatchEvent::BatchFinished {
            completed,
            total,
            cancelled,
        } => {
            assert_eq!(*completed, 1);
            assert_eq!(*total, 2);
            assert!(!cancelled);
        }
        other => panic!("expected BatchFinished, got {other:?}"),
    }
}

/// A flag raised before the run starts stops the batch at the first file
/// boundary; nothing is processed and the finish event says cancelled.
#[tokio::test]
async fn test_pre_raised_flag_stops_at_first_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path(), "1,1,Alpha,a\n");

    std::fs::write(
        config.input_folder.join("Show - S01E01 - Alpha.mkv"),
        b"payload",
    )
    .unwrap();

    let (sink, mut rx) = ChannelSink::new();
    let driver = BatchDriver::new(config).with_event_sink(Arc::new(sink));
    driver.cancellation_flag().request();

    let summary = driver.run().await.unwrap();
    assert_eq!(summary.completed, 0);
    assert_eq!(summary.total, 1);
    assert!(summary.cancelled);

    let mut last = None;
    while let Ok(event) = rx.try_recv() {
        last = Some(event);
    }
    assert!(matches!(
        last,
        Some(BatchEvent::BatchFinished {
            completed: 0,
            cancelled: true,
            ..
        })
    ));
}
