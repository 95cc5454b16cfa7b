//! Highlighting of the sketch in progress

use sketchplan_engine::{
    FeedbackSink, GeometryKind, SessionId, SessionOutcome, SketchError, Validity, ValidityUpdate,
};

use crate::config::FeedbackConfig;
use crate::symbol::{Color, LineSymbol};

/// Recolors the in-progress sketch from validity signals
#[derive(Debug, Clone)]
pub struct SketchHighlighter {
    config: FeedbackConfig,
    validity: Validity,
    session: Option<SessionId>,
    last_message: Option<String>,
}

impl SketchHighlighter {
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            config,
            validity: Validity::Neutral,
            session: None,
            last_message: None,
        }
    }

    /// Current sketch color
    pub fn color(&self) -> Color {
        if self.validity.is_violation() {
            self.config.violation_color
        } else {
            self.config.valid_color
        }
    }

    /// Symbol the sketch in progress is drawn with
    pub fn symbol(&self) -> LineSymbol {
        LineSymbol::new(self.color(), self.config.width)
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Session being highlighted, if one is running
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    /// Last soft validation message shown to the user
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    pub fn set_config(&mut self, config: FeedbackConfig) {
        self.config = config;
    }
}

impl FeedbackSink for SketchHighlighter {
    fn on_validity(&mut self, update: &ValidityUpdate) {
        if self.validity != update.validity {
            tracing::debug!(
                "Sketch {} is now {:?} ({})",
                update.session,
                update.validity,
                self.color()
            );
        }
        self.validity = update.validity;
    }

    fn on_rejected(&mut self, _session: SessionId, error: &SketchError) {
        self.last_message = Some(error.to_string());
    }

    fn on_session_started(&mut self, session: SessionId, _kind: GeometryKind) {
        self.session = Some(session);
        self.validity = Validity::Neutral;
        self.last_message = None;
    }

    fn on_session_ended(&mut self, session: SessionId, _outcome: &SessionOutcome) {
        if self.session == Some(session) {
            self.session = None;
            self.validity = Validity::Neutral;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use sketchplan_engine::ValidityTrigger;

    fn update(session: SessionId, validity: Validity) -> ValidityUpdate {
        ValidityUpdate {
            session,
            probe: Some(Vec2::ZERO),
            validity,
            trigger: ValidityTrigger::Cursor,
        }
    }

    #[test]
    fn test_violation_recolors() {
        let mut highlighter = SketchHighlighter::new(FeedbackConfig::default());
        let session = SessionId::new();
        highlighter.on_session_started(session, GeometryKind::Polyline);
        assert_eq!(highlighter.color().to_string(), "#b2b3b2");

        highlighter.on_validity(&update(session, Validity::Violation));
        assert_eq!(highlighter.color().to_string(), "#ff0000");
        assert_eq!(highlighter.symbol().width, 20.0);

        highlighter.on_validity(&update(session, Validity::Valid));
        assert_eq!(highlighter.color().to_string(), "#b2b3b2");
    }

    #[test]
    fn test_rejection_message_and_session_reset() {
        let mut highlighter = SketchHighlighter::new(FeedbackConfig::default());
        let session = SessionId::new();
        highlighter.on_session_started(session, GeometryKind::Polygon);
        highlighter.on_validity(&update(session, Validity::Violation));
        highlighter.on_rejected(
            session,
            &SketchError::DegenerateGeometry {
                kind: GeometryKind::Polygon,
                required: 3,
                actual: 2,
            },
        );
        assert!(highlighter.last_message().is_some_and(|m| m.contains("at least 3")));

        highlighter.on_session_ended(session, &SessionOutcome::Canceled);
        assert_eq!(highlighter.session(), None);
        assert_eq!(highlighter.validity(), Validity::Neutral);
    }
}
