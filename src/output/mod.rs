//! Post-run output: plots, budget chart, animation.
//!
//! The reporter takes a finished [`RunResult`] and writes the configured
//! artifacts into the output directory, creating it when absent:
//!
//! - a trajectory map (PNG)
//! - an oil budget chart (PNG), titled with the oil name and peak density
//! - an animation (mp4 via an external `ffmpeg`)
//!
//! Artifact names and the directory are configuration, not hardcoded paths.
//! Animation failure is independent of the plots: [`Reporter::write_all`]
//! reports it in the summary instead of propagating, so the plots already on
//! disk stay valid.

mod animation;
mod chart;
mod font;
mod map;
mod raster;

pub use animation::AnimationError;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::env::Landmask;
use crate::simulation::RunResult;

/// Error type for plot generation.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Directory or file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failure
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The run produced no output steps
    #[error("run result holds no output steps to plot")]
    EmptyResult,
}

/// Output location and artifact names.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Directory all artifacts are written into
    pub directory: PathBuf,
    /// Trajectory map file name
    pub trajectory_file: String,
    /// Budget chart file name
    pub budget_file: String,
    /// Animation file name
    pub animation_file: String,
    /// Figure width in pixels
    pub figure_width: u32,
    /// Figure height in pixels
    pub figure_height: u32,
    /// Animation frame rate (frames/s)
    pub frame_rate: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            trajectory_file: "trajectory_map.png".to_string(),
            budget_file: "oil_budget.png".to_string(),
            animation_file: "simulation_video.mp4".to_string(),
            figure_width: 900,
            figure_height: 600,
            frame_rate: 8,
        }
    }
}

impl OutputConfig {
    /// Set the output directory.
    pub fn with_directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.directory = directory.as_ref().to_path_buf();
        self
    }

    /// Set the figure dimensions in pixels.
    pub fn with_figure_size(mut self, width: u32, height: u32) -> Self {
        self.figure_width = width;
        self.figure_height = height;
        self
    }

    /// Set the animation frame rate.
    pub fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        self.frame_rate = frame_rate;
        self
    }
}

/// Paths of the artifacts a reporting pass produced.
#[derive(Debug, Clone)]
pub struct ReportSummary {
    /// Trajectory map path
    pub trajectory: PathBuf,
    /// Budget chart path
    pub budget: PathBuf,
    /// Animation path, `None` when rendering failed or was skipped
    pub animation: Option<PathBuf>,
}

/// Writes run artifacts to the output directory.
pub struct Reporter {
    config: OutputConfig,
}

impl Reporter {
    /// Create a reporter with the given output configuration.
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// The output configuration.
    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Create the output directory if needed.
    fn ensure_directory(&self) -> Result<(), PlotError> {
        std::fs::create_dir_all(&self.config.directory)?;
        Ok(())
    }

    /// Write the trajectory map.
    pub fn plot_trajectory(
        &self,
        result: &RunResult,
        landmask: Option<&Landmask>,
    ) -> Result<PathBuf, PlotError> {
        self.ensure_directory()?;
        let bbox = map::plot_bbox(result).ok_or(PlotError::EmptyResult)?;
        let image = map::render_map(
            result,
            landmask,
            bbox,
            self.config.figure_width,
            self.config.figure_height,
            None,
        );
        let path = self.config.directory.join(&self.config.trajectory_file);
        image.save(&path)?;
        info!(path = %path.display(), "trajectory map written");
        Ok(path)
    }

    /// Write the oil budget chart.
    pub fn plot_budget(&self, result: &RunResult) -> Result<PathBuf, PlotError> {
        if result.n_outputs() == 0 {
            return Err(PlotError::EmptyResult);
        }
        self.ensure_directory()?;
        let image =
            chart::render_budget_chart(result, self.config.figure_width, self.config.figure_height);
        let path = self.config.directory.join(&self.config.budget_file);
        image.save(&path)?;
        info!(path = %path.display(), "budget chart written");
        Ok(path)
    }

    /// Render and encode the animation.
    pub fn animate(
        &self,
        result: &RunResult,
        landmask: Option<&Landmask>,
    ) -> Result<PathBuf, AnimationError> {
        std::fs::create_dir_all(&self.config.directory).map_err(AnimationError::Io)?;
        animation::render_animation(result, landmask, &self.config)
    }

    /// Write every artifact.
    ///
    /// The plots must succeed; an animation failure is logged and recorded as
    /// `animation: None` in the summary rather than propagated.
    pub fn write_all(
        &self,
        result: &RunResult,
        landmask: Option<&Landmask>,
    ) -> Result<ReportSummary, PlotError> {
        let trajectory = self.plot_trajectory(result, landmask)?;
        let budget = self.plot_budget(result)?;

        let animation = match self.animate(result, landmask) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "animation rendering failed; plots are unaffected");
                None
            }
        };

        Ok(ReportSummary {
            trajectory,
            budget,
            animation,
        })
    }
}
