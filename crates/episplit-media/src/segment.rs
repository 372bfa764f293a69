//! Segment extraction, re-encode, remux, and concatenation.

use std::path::Path;

use tracing::info;

use episplit_models::{EncodingConfig, SplitBoundary};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Extract a segment without re-encoding (stream copy).
///
/// Used for the first episode, which keeps its own intro and needs no
/// processing beyond the cut.
pub async fn extract_segment(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    boundary: &SplitBoundary,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Extracting segment: {} -> {} ({:.3}s to {:.3}s)",
        input.display(),
        output.display(),
        boundary.start,
        boundary.end
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(boundary.start)
        .until(boundary.end)
        .codec_copy();

    FfmpegRunner::new().run(&cmd).await
}

/// Extract a segment and re-encode it.
///
/// The second episode goes through here so the later concatenation joins
/// two streams with identical codec parameters.
pub async fn extract_segment_reencoded(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    boundary: &SplitBoundary,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Re-encoding segment: {} -> {} ({:.3}s to {:.3}s)",
        input.display(),
        output.display(),
        boundary.start,
        boundary.end
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(boundary.start)
        .until(boundary.end)
        .output_args(encoding.to_ffmpeg_args());

    FfmpegRunner::new().run(&cmd).await
}

/// Re-encode the leading seconds of a file into a standalone intro clip.
pub async fn extract_intro(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    duration_secs: f64,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Extracting intro: {} -> {} ({:.3}s)",
        input.display(),
        output.display(),
        duration_secs
    );

    let cmd = FfmpegCommand::new(input, output)
        .duration(duration_secs)
        .output_args(encoding.to_ffmpeg_args());

    FfmpegRunner::new().run(&cmd).await
}

/// Remux into the container implied by the output extension, copying all
/// streams.
pub async fn convert_container(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Remuxing container: {} -> {}",
        input.display(),
        output.display()
    );

    let cmd = FfmpegCommand::new(input, output).codec_copy();
    FfmpegRunner::new().run(&cmd).await
}

/// Concatenate two clips with the concat demuxer, re-encoding the result.
///
/// `manifest_path` is where the demuxer's file list is written; the caller
/// owns its lifetime (it lives in the per-file temp directory).
pub async fn concat_clips(
    first: impl AsRef<Path>,
    second: impl AsRef<Path>,
    output: impl AsRef<Path>,
    manifest_path: impl AsRef<Path>,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    let manifest_path = manifest_path.as_ref();
    let output = output.as_ref();

    let manifest = concat_manifest(&[first.as_ref(), second.as_ref()]);
    tokio::fs::write(manifest_path, manifest).await?;

    info!(
        "Concatenating clips -> {} (manifest: {})",
        output.display(),
        manifest_path.display()
    );

    let cmd = FfmpegCommand::new(manifest_path, output)
        .input_arg("-f")
        .input_arg("concat")
        .input_arg("-safe")
        .input_arg("0")
        .output_args(encoding.to_ffmpeg_args());

    FfmpegRunner::new().run(&cmd).await
}

/// Build the concat demuxer's file list.
fn concat_manifest(paths: &[&Path]) -> String {
    let mut manifest = String::new();
    for path in paths {
        // The demuxer wants forward slashes and quoted entries
        let entry = path.to_string_lossy().replace('\\', "/").replace('\'', "'\\''");
        manifest.push_str(&format!("file '{}'\n", entry));
    }
    manifest
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_concat_manifest_format() {
        let first = PathBuf::from("/tmp/work/intro.mkv");
        let second = PathBuf::from("/tmp/work/episode2.mkv");
        let manifest = concat_manifest(&[&first, &second]);
        assert_eq!(
            manifest,
            "file '/tmp/work/intro.mkv'\nfile '/tmp/work/episode2.mkv'\n"
        );
    }

    #[test]
    fn test_concat_manifest_escapes_single_quotes() {
        let path = PathBuf::from("/tmp/it's here.mkv");
        let manifest = concat_manifest(&[&path]);
        assert_eq!(manifest, "file '/tmp/it'\\''s here.mkv'\n");
    }

    #[tokio::test]
    async fn test_concat_writes_manifest_before_running() {
        // ffmpeg is not on PATH in CI; the call must still have produced
        // the manifest before failing to spawn
        let dir = tempfile::TempDir::new().unwrap();
        let manifest_path = dir.path().join("concat.txt");
        let result = concat_clips(
            "/nonexistent/a.mkv",
            "/nonexistent/b.mkv",
            dir.path().join("out.mkv"),
            &manifest_path,
            &EncodingConfig::default(),
        )
        .await;

        let content = std::fs::read_to_string(&manifest_path).unwrap();
        assert!(content.contains("file '/nonexistent/a.mkv'"));
        assert!(content.contains("file '/nonexistent/b.mkv'"));
        // Either ffmpeg is installed (command fails on missing inputs) or
        // it is absent entirely; both are errors here
        assert!(result.is_err());
    }
}
