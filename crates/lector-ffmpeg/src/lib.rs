//! ffmpeg-backed implementation of the audio assembly port.
//!
//! The encoder is driven entirely through its file-based contract: merge
//! consumes a concat-demuxer list file with one artifact path per line,
//! mix builds an `amix` filter graph. Both re-encode with `libmp3lame` -
//! stream-copying concatenated segments with heterogeneous encoder
//! settings produces inconsistent duration metadata, so lector never
//! does it.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use lector_core::ports::{AssemblyError, AudioAssemblyPort};

/// How much captured stderr to keep in an error.
const STDERR_TAIL: usize = 800;

/// Assembly adapter spawning the external `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegAssembly {
    ffmpeg: PathBuf,
}

impl FfmpegAssembly {
    /// Locate `ffmpeg` on `PATH`.
    pub fn discover() -> Result<Self, AssemblyError> {
        which::which("ffmpeg").map_or_else(
            |_| {
                Err(AssemblyError::ToolMissing {
                    hint: "ffmpeg not found on PATH; install it or pass an explicit binary path"
                        .to_string(),
                })
            },
            |path| {
                debug!(path = %path.display(), "using ffmpeg");
                Ok(Self { ffmpeg: path })
            },
        )
    }

    /// Use an explicit `ffmpeg` binary (bundled installs, tests).
    pub fn with_binary(path: impl Into<PathBuf>) -> Result<Self, AssemblyError> {
        let path = path.into();
        if path.is_file() {
            Ok(Self { ffmpeg: path })
        } else {
            Err(AssemblyError::ToolMissing {
                hint: format!("no ffmpeg binary at {}", path.display()),
            })
        }
    }

    /// Run ffmpeg with `args`, failing on a non-zero exit status.
    async fn run(&self, args: &[String]) -> Result<(), AssemblyError> {
        debug!(args = ?args, "spawning ffmpeg");
        let output = Command::new(&self.ffmpeg)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AssemblyError::from_io_error(&e))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail_start = stderr.len().saturating_sub(STDERR_TAIL);
        let tail = stderr
            .get(tail_start..)
            .unwrap_or(&stderr)
            .trim()
            .to_string();
        warn!(status = ?output.status.code(), "ffmpeg failed");
        Err(AssemblyError::CommandFailed {
            status: output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string()),
            stderr: tail,
        })
    }
}

/// Concat-demuxer manifest: one `file '<absolute path>'` line per input,
/// in the given order, with forward slashes throughout.
fn concat_manifest(inputs: &[PathBuf]) -> Result<String, AssemblyError> {
    let mut manifest = String::new();
    for input in inputs {
        let abs = std::fs::canonicalize(input).map_err(|e| AssemblyError::from_io_error(&e))?;
        let line = abs.to_string_lossy().replace('\\', "/");
        manifest.push_str(&format!("file '{line}'\n"));
    }
    Ok(manifest)
}

fn merge_args(list_file: &Path, output: &Path) -> Vec<String> {
    vec![
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        list_file.display().to_string(),
        "-codec:a".into(),
        "libmp3lame".into(),
        "-qscale:a".into(),
        "4".into(),
        "-y".into(),
        output.display().to_string(),
    ]
}

fn mix_args(
    voice: &Path,
    bgm: Option<&Path>,
    output: &Path,
    voice_gain: f32,
    bgm_gain: f32,
) -> Vec<String> {
    match bgm {
        // The background track is looped indefinitely; `duration=first`
        // bounds the mix to the voice track (shorter wins).
        Some(bgm) => vec![
            "-i".into(),
            voice.display().to_string(),
            "-stream_loop".into(),
            "-1".into(),
            "-i".into(),
            bgm.display().to_string(),
            "-filter_complex".into(),
            format!(
                "[0:a]volume={voice_gain}[v];[1:a]volume={bgm_gain}[b];[v][b]amix=inputs=2:duration=first[out]"
            ),
            "-map".into(),
            "[out]".into(),
            "-codec:a".into(),
            "libmp3lame".into(),
            "-qscale:a".into(),
            "4".into(),
            "-y".into(),
            output.display().to_string(),
        ],
        None => vec![
            "-i".into(),
            voice.display().to_string(),
            "-filter:a".into(),
            format!("volume={voice_gain}"),
            "-codec:a".into(),
            "libmp3lame".into(),
            "-qscale:a".into(),
            "4".into(),
            "-y".into(),
            output.display().to_string(),
        ],
    }
}

fn convert_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".into(),
        input.display().to_string(),
        "-codec:a".into(),
        "libmp3lame".into(),
        "-qscale:a".into(),
        "4".into(),
        "-y".into(),
        output.display().to_string(),
    ]
}

fn silence_args(duration_secs: f64, output: &Path) -> Vec<String> {
    vec![
        "-f".into(),
        "lavfi".into(),
        "-i".into(),
        "anullsrc=r=44100:cl=stereo".into(),
        "-t".into(),
        duration_secs.to_string(),
        "-codec:a".into(),
        "libmp3lame".into(),
        "-y".into(),
        output.display().to_string(),
    ]
}

fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp3"))
}

#[async_trait]
impl AudioAssemblyPort for FfmpegAssembly {
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<PathBuf, AssemblyError> {
        if inputs.is_empty() {
            return Err(AssemblyError::NoInput);
        }

        let manifest = concat_manifest(inputs)?;
        let list_file = tempfile::Builder::new()
            .suffix(".list.txt")
            .tempfile()
            .map_err(|e| AssemblyError::from_io_error(&e))?;
        std::fs::write(list_file.path(), manifest)
            .map_err(|e| AssemblyError::from_io_error(&e))?;

        self.run(&merge_args(list_file.path(), output)).await?;
        debug!(segments = inputs.len(), output = %output.display(), "merged narration");
        Ok(output.to_path_buf())
    }

    async fn mix(
        &self,
        voice: &Path,
        bgm: Option<&Path>,
        output: &Path,
        voice_gain: f32,
        bgm_gain: f32,
    ) -> Result<PathBuf, AssemblyError> {
        // Neutral gain on an MP3 voice track with no background needs no
        // encoder pass at all.
        if bgm.is_none() && (voice_gain - 1.0).abs() < 0.01 && is_mp3(voice) {
            if voice != output {
                tokio::fs::copy(voice, output)
                    .await
                    .map_err(|e| AssemblyError::from_io_error(&e))?;
            }
            return Ok(output.to_path_buf());
        }

        self.run(&mix_args(voice, bgm, output, voice_gain, bgm_gain))
            .await?;
        Ok(output.to_path_buf())
    }

    async fn convert_to_mp3(&self, input: &Path) -> Result<PathBuf, AssemblyError> {
        if is_mp3(input) {
            return Ok(input.to_path_buf());
        }
        let output = input.with_extension("mp3");
        self.run(&convert_args(input, &output)).await?;
        Ok(output)
    }

    async fn silence(&self, duration_secs: f64, output: &Path) -> Result<PathBuf, AssemblyError> {
        self.run(&silence_args(duration_secs, output)).await?;
        Ok(output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_re_encodes_instead_of_stream_copying() {
        let args = merge_args(Path::new("/tmp/x.list.txt"), Path::new("/tmp/out.mp3"));
        assert!(args.contains(&"concat".to_string()));
        assert!(args.contains(&"libmp3lame".to_string()));
        assert!(!args.contains(&"copy".to_string()));
    }

    #[test]
    fn mix_with_bgm_loops_and_bounds_to_voice_duration() {
        let args = mix_args(
            Path::new("/v.mp3"),
            Some(Path::new("/b.mp3")),
            Path::new("/o.mp3"),
            1.0,
            0.2,
        );
        let loop_pos = args.iter().position(|a| a == "-stream_loop").unwrap();
        assert_eq!(args[loop_pos + 1], "-1");

        let filter = args
            .iter()
            .find(|a| a.contains("amix"))
            .expect("filter graph present");
        assert!(filter.contains("duration=first"));
        assert!(filter.contains("volume=1[v]") || filter.contains("volume=1.0[v]"));
        assert!(filter.contains("volume=0.2[b]"));
    }

    #[test]
    fn mix_without_bgm_applies_voice_gain_only() {
        let args = mix_args(Path::new("/v.mp3"), None, Path::new("/o.mp3"), 0.5, 0.2);
        assert!(args.contains(&"volume=0.5".to_string()));
        assert!(!args.iter().any(|a| a.contains("amix")));
        assert!(!args.contains(&"-stream_loop".to_string()));
    }

    #[test]
    fn manifest_lists_inputs_in_given_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp3");
        let b = dir.path().join("b.mp3");
        std::fs::write(&a, b"x").unwrap();
        std::fs::write(&b, b"y").unwrap();

        let manifest = concat_manifest(&[b.clone(), a.clone()]).unwrap();
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("file '"));
        assert!(lines[0].contains("b.mp3"));
        assert!(lines[1].contains("a.mp3"));
    }

    #[test]
    fn manifest_fails_on_missing_input() {
        let missing = PathBuf::from("/definitely/not/here.mp3");
        assert!(matches!(
            concat_manifest(&[missing]),
            Err(AssemblyError::Io(_))
        ));
    }

    #[test]
    fn missing_binary_is_reported_up_front() {
        let err = FfmpegAssembly::with_binary("/nonexistent/ffmpeg").unwrap_err();
        assert!(matches!(err, AssemblyError::ToolMissing { .. }));
    }

    #[tokio::test]
    async fn empty_merge_is_rejected_before_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("ffmpeg");
        std::fs::write(&fake, b"#!/bin/sh\nexit 1\n").unwrap();

        let assembly = FfmpegAssembly::with_binary(&fake).unwrap();
        let err = assembly
            .merge(&[], &dir.path().join("out.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssemblyError::NoInput));
    }

    #[tokio::test]
    async fn convert_returns_mp3_inputs_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("ffmpeg");
        std::fs::write(&fake, b"#!/bin/sh\nexit 1\n").unwrap();

        let assembly = FfmpegAssembly::with_binary(&fake).unwrap();
        let input = dir.path().join("already.MP3");
        std::fs::write(&input, b"x").unwrap();

        // The failing fake binary proves no encoder pass happens.
        let out = assembly.convert_to_mp3(&input).await.unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn silence_duration_is_forwarded() {
        let args = silence_args(2.5, Path::new("/o.mp3"));
        assert!(args.contains(&"2.5".to_string()));
        assert!(args.iter().any(|a| a.contains("anullsrc")));
    }
}
