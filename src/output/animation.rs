//! Animation assembly.
//!
//! Renders one map frame per output step and hands the frame sequence to an
//! external `ffmpeg` for encoding. A missing or failing encoder is reported
//! as a typed error the caller can ignore: the static plots written earlier
//! stay valid either way.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

use crate::env::Landmask;
use crate::simulation::RunResult;

use super::map::{plot_bbox, render_map};
use super::OutputConfig;

/// Error type for animation rendering.
#[derive(Debug, Error)]
pub enum AnimationError {
    /// Frame or directory I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame encoding failure
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// No output steps to animate
    #[error("run result holds no snapshots to animate")]
    EmptyResult,

    /// ffmpeg binary not found on PATH
    #[error("external renderer 'ffmpeg' not found on PATH")]
    RendererMissing,

    /// ffmpeg exited with a failure status
    #[error("external renderer failed ({status}): {stderr}")]
    RendererFailed {
        /// Exit status description
        status: String,
        /// Tail of the renderer's stderr
        stderr: String,
    },
}

/// Render all frames and assemble the animation file.
///
/// Returns the path of the written animation on success. Frames are staged in
/// a scratch directory under the output directory and removed afterwards.
pub(crate) fn render_animation(
    result: &RunResult,
    landmask: Option<&Landmask>,
    config: &OutputConfig,
) -> Result<PathBuf, AnimationError> {
    if result.snapshots.is_empty() {
        return Err(AnimationError::EmptyResult);
    }
    let bbox = plot_bbox(result).ok_or(AnimationError::EmptyResult)?;

    let frames_dir = config.directory.join("frames");
    std::fs::create_dir_all(&frames_dir)?;

    for (k, _) in result.snapshots.iter().enumerate() {
        let frame = render_map(
            result,
            landmask,
            bbox,
            config.figure_width,
            config.figure_height,
            Some(k),
        );
        frame.save(frames_dir.join(format!("frame_{k:04}.png")))?;
    }
    debug!(frames = result.snapshots.len(), "animation frames rendered");

    let output_path = config.directory.join(&config.animation_file);
    encode_with_ffmpeg(&frames_dir, &output_path, config.frame_rate)?;

    // Frames are scratch data once the video exists.
    let _ = std::fs::remove_dir_all(&frames_dir);

    info!(path = %output_path.display(), "animation written");
    Ok(output_path)
}

/// Invoke ffmpeg on the staged frame sequence.
fn encode_with_ffmpeg(
    frames_dir: &Path,
    output: &Path,
    frame_rate: u32,
) -> Result<(), AnimationError> {
    let pattern = frames_dir.join("frame_%04d.png");

    let result = Command::new("ffmpeg")
        .arg("-y")
        .arg("-framerate")
        .arg(frame_rate.to_string())
        .arg("-i")
        .arg(&pattern)
        .arg("-pix_fmt")
        .arg("yuv420p")
        .arg(output)
        .output();

    let output_data = match result {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AnimationError::RendererMissing);
        }
        Err(e) => return Err(AnimationError::Io(e)),
    };

    if !output_data.status.success() {
        let stderr = String::from_utf8_lossy(&output_data.stderr);
        let tail: String = stderr
            .lines()
            .rev()
            .take(3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join(" | ");
        return Err(AnimationError::RendererFailed {
            status: output_data.status.to_string(),
            stderr: tail,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriftConfig;
    use crate::ensemble::SeedSpec;
    use crate::env::{UniformFlowProvider, Variable};
    use crate::simulation::{OilDriftSimulation, RunParams};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    #[test]
    fn test_empty_result_rejected() {
        let result = RunResult::new(
            Vec::new(),
            Vec::new(),
            crate::simulation::MassBudget::default(),
            "GENERIC MEDIUM CRUDE".to_string(),
        );
        let config = OutputConfig::default();
        let err = render_animation(&result, None, &config).unwrap_err();
        assert!(matches!(err, AnimationError::EmptyResult));
    }

    #[test]
    fn test_frames_rendered_even_if_encoder_absent() {
        let start = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let mut sim = OilDriftSimulation::new(DriftConfig::default());
        sim.register_provider(
            Arc::new(UniformFlowProvider::new(0.3, 0.0, 0.0, 0.0)),
            &Variable::MANDATORY,
        )
        .unwrap();
        sim.seed_elements(
            SeedSpec::new(89.5, 21.5, start, "GENERIC MEDIUM CRUDE").with_number(5),
        )
        .unwrap();
        let result = sim.run(RunParams::new(start + Duration::hours(2))).unwrap();

        let scratch = tempfile::tempdir().unwrap();
        let config = OutputConfig::default()
            .with_directory(scratch.path())
            .with_figure_size(120, 90);

        // Whatever the encoder situation, the call must not panic and must
        // surface a typed result.
        match render_animation(&result, None, &config) {
            Ok(path) => assert!(path.exists()),
            Err(AnimationError::RendererMissing) => {}
            Err(AnimationError::RendererFailed { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
