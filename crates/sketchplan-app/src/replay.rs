//! Recorded drawing sessions
//!
//! A replay script is a RON file with an optional planning boundary and the
//! tool and pointer steps a user performed. Replaying it against a
//! [`DrawingController`] reproduces the layers the user would have drawn.

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use sketchplan_engine::ConstraintRegion;
use thiserror::Error;

use crate::controller::{DrawRequest, DrawingController};
use crate::error::DrawError;
use crate::input::PointerInput;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Cannot read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot parse script: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Step {step} failed: {source}")]
    Step {
        step: usize,
        #[source]
        source: DrawError,
    },
}

/// Planning boundary drawn within
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub outer: Vec<Vec2>,
    #[serde(default)]
    pub holes: Vec<Vec<Vec2>>,
}

/// One recorded user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplayStep {
    Start(DrawRequest),
    Pointer(PointerInput),
    FinishTool,
    CancelTool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Unbounded when absent
    #[serde(default)]
    pub region: Option<RegionSpec>,
    pub steps: Vec<ReplayStep>,
}

/// Totals of a replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub tools: usize,
    pub graphics: usize,
    pub rejected: usize,
}

impl ReplayScript {
    pub fn from_ron(text: &str) -> Result<Self, ReplayError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        Self::from_ron(&std::fs::read_to_string(path)?)
    }

    pub fn region(&self) -> Arc<ConstraintRegion> {
        let region = match &self.region {
            Some(spec) => ConstraintRegion::with_holes(spec.outer.clone(), spec.holes.clone()),
            None => ConstraintRegion::unbounded(),
        };
        Arc::new(region)
    }

    /// Perform every step; a tool still open at the end is finished
    pub fn run(&self, controller: &mut DrawingController) -> Result<ReplaySummary, ReplayError> {
        let mut summary = ReplaySummary::default();

        for (step, action) in self.steps.iter().enumerate() {
            let failed = |source| ReplayError::Step { step, source };
            match action {
                ReplayStep::Start(request) => {
                    controller.start(request.clone()).map_err(failed)?;
                    summary.tools += 1;
                }
                ReplayStep::Pointer(input) => {
                    let report = controller.pointer(*input).map_err(failed)?;
                    summary.rejected += report.rejected;
                }
                ReplayStep::FinishTool => {
                    summary.graphics += controller.finish_tool().map_err(failed)?;
                }
                ReplayStep::CancelTool => {
                    summary.graphics += controller.cancel_tool().map_err(failed)?;
                }
            }
        }

        if controller.is_drawing() {
            tracing::debug!("Finishing tool left open by the script");
            summary.graphics += controller
                .finish_tool()
                .map_err(|source| ReplayError::Step {
                    step: self.steps.len(),
                    source,
                })?;
        }

        tracing::info!(
            "Replayed {} steps: {} tools, {} graphics",
            self.steps.len(),
            summary.tools,
            summary.graphics
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigManager, DrawConfig};
    use crate::layer::LayerId;
    use parking_lot::RwLock;

    const SCRIPT: &str = r#"(
        region: Some((outer: [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])),
        steps: [
            Start((kind: polyline, layer: "streets")),
            Pointer(Click(x: 0.0, y: 0.0)),
            Pointer(Finish),
            Pointer(DoubleClick(x: 10.0, y: 0.0)),
            FinishTool,
            Start((kind: polygon, layer: "zones")),
            Pointer(Click(x: 1.0, y: 1.0)),
            Pointer(Click(x: 4.0, y: 1.0)),
            Pointer(DoubleClick(x: 4.0, y: 4.0)),
        ],
    )"#;

    fn controller(region: Arc<ConstraintRegion>) -> DrawingController {
        let path = std::env::temp_dir().join("sketchplan-replay-unused.ron");
        let config = Arc::new(RwLock::new(ConfigManager::from_config(DrawConfig::new(), path)));
        DrawingController::new(region, config)
    }

    #[test]
    fn test_replay_script() {
        let script = ReplayScript::from_ron(SCRIPT).unwrap();
        let region = script.region();
        assert!(region.contains(Vec2::new(5.0, 5.0)));

        let mut controller = controller(region);
        let summary = script.run(&mut controller).unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                tools: 2,
                graphics: 2,
                rejected: 1,
            }
        );
        let layer_graphics = |id: LayerId| controller.layer(&id).map_or(0, |l| l.graphics().len());
        assert_eq!(layer_graphics(LayerId::streets()), 1);
        assert_eq!(layer_graphics(LayerId::zones()), 1);
    }

    #[test]
    fn test_step_error_names_step() {
        let script = ReplayScript::from_ron("(steps: [FinishTool])").unwrap();
        assert!(script.region().is_unbounded());

        let err = script
            .run(&mut controller(script.region()))
            .unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Step {
                step: 0,
                source: DrawError::NoActiveTool
            }
        ));
    }

    #[test]
    fn test_malformed_script() {
        assert!(matches!(
            ReplayScript::from_ron("(steps: [Jump])"),
            Err(ReplayError::Parse(_))
        ));
    }
}
