//! Process-lifetime handles for the pipeline
//!
//! The model and district coordinates are loaded once at startup and then
//! shared read-only by every request.

use crate::{
    normalize, run, ExecutionMode, PipelineResult, Result, RuntimeConfig, TimeContext,
    ZoneDirectory,
};
use std::sync::Arc;
use tracing::info;
use zone_model::{GradientBoostedModel, Predictor};

#[derive(Clone)]
pub struct Runtime {
    predictor: Arc<dyn Predictor>,
    directory: Arc<ZoneDirectory>,
    mode: ExecutionMode,
}

impl Runtime {
    /// Wrap already-initialized handles
    pub fn new(predictor: Arc<dyn Predictor>, directory: ZoneDirectory, mode: ExecutionMode) -> Self {
        Self {
            predictor,
            directory: Arc::new(directory),
            mode,
        }
    }

    /// Load the model artifact and district coordinates named in `config`
    pub fn load(config: &RuntimeConfig) -> Result<Self> {
        let model = GradientBoostedModel::load(&config.model_path)?;
        let directory = ZoneDirectory::load(&config.zones_path)?;

        info!(
            "Runtime ready: {} districts with coordinates, {:?} sweep",
            directory.len(),
            config.mode
        );

        Ok(Self::new(Arc::new(model), directory, config.mode))
    }

    pub fn directory(&self) -> &ZoneDirectory {
        &self.directory
    }

    /// One pipeline run for a normalized time context
    pub fn run(&self, ctx: &TimeContext) -> Result<PipelineResult> {
        run(ctx, self.predictor.as_ref(), &self.directory, self.mode)
    }

    /// Normalize labels, then run
    pub fn predict(&self, month: &str, day: &str, hour: i64) -> Result<PipelineResult> {
        let ctx = normalize(month, day, hour)?;
        self.run(&ctx)
    }
}
