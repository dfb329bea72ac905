//! The demo controller: selection, rendering, staged analysis, comparison and
//! reset, all expressed as operations on a shared `Surface`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{
    domain::{AnalysisOutcome, ShapeName, Strategy},
    error::DemoError,
    protocol::{
        attrs, classes, empty_slot_text, ids, ANALYZE_LABEL, ANALYZING_LABEL, COMPARE_ALL_NOTICE,
        COMPARISON_SLOTS, COMPLETE_LABEL,
    },
};
use tracing::{debug, error, info, warn};

use crate::{
    config::DemoConfig,
    random::{RandomSource, StdRandom},
    render::{draw_placeholder, draw_shape},
    sequences::{network_plan, percent, reveal_timeline, rule_based_plan, SequencePlan},
    session::SessionState,
    surface::{Surface, SurfaceOp, Target},
    timeline::{apply_ops, run_timeline, Scheduler, SharedSurface, Timings, TokioScheduler},
};

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    /// Nothing selected, or a run was already in flight.
    Skipped,
    Completed {
        rule_based: AnalysisOutcome,
        network_style: AnalysisOutcome,
    },
    /// A sequence failed; the error was logged and the run abandoned.
    Failed(String),
}

pub struct DemoController<S: Surface> {
    surface: SharedSurface<S>,
    session: Mutex<SessionState>,
    scheduler: Arc<dyn Scheduler>,
    random: Mutex<Box<dyn RandomSource>>,
    timings: Timings,
}

impl<S: Surface + Send> DemoController<S> {
    pub fn new(
        surface: SharedSurface<S>,
        scheduler: Arc<dyn Scheduler>,
        random: Box<dyn RandomSource>,
        timings: Timings,
    ) -> Self {
        Self {
            surface,
            session: Mutex::new(SessionState::default()),
            scheduler,
            random: Mutex::new(random),
            timings,
        }
    }

    /// Real timers and a seeded-or-entropy random source as configured.
    pub fn from_config(surface: SharedSurface<S>, config: &DemoConfig) -> Self {
        Self::new(
            surface,
            Arc::new(TokioScheduler),
            Box::new(StdRandom::from_seed_option(config.seed)),
            config.timings(),
        )
    }

    pub fn surface(&self) -> &SharedSurface<S> {
        &self.surface
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn session(&self) -> SessionState {
        self.lock_session().clone()
    }

    pub fn is_analyzing(&self) -> bool {
        self.lock_session().is_running()
    }

    fn lock_session(&self) -> MutexGuard<'_, SessionState> {
        // Session updates are single assignments; a poisoned guard still holds a
        // consistent value.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_surface<T>(&self, f: impl FnOnce(&mut S) -> T) -> Result<T, DemoError> {
        let mut guard = self
            .surface
            .lock()
            .map_err(|err| DemoError::SurfaceUnavailable(err.to_string()))?;
        Ok(f(&mut guard))
    }

    fn busy_trigger_ops() -> [SurfaceOp; 2] {
        [
            SurfaceOp::SetDisabled {
                target: Target::id(ids::ANALYZE_BUTTON),
                disabled: true,
            },
            SurfaceOp::set_text(Target::id(ids::ANALYZE_BUTTON), ANALYZING_LABEL),
        ]
    }

    fn hide_results_ops() -> [SurfaceOp; 2] {
        [
            SurfaceOp::set_style(Target::id(ids::ANALYSIS_RESULTS), "opacity", "0.3"),
            SurfaceOp::remove_class(Target::id(ids::RESULTS_COMPARISON), classes::ACTIVE),
        ]
    }

    pub fn init(&self) -> Result<(), DemoError> {
        info!("initializing shape approaches demo");
        self.with_surface(|surface| match surface.canvas_mut(ids::SHAPE_CANVAS) {
            Some(canvas) => draw_placeholder(canvas),
            None => debug!("canvas not found"),
        })?;
        apply_ops(&self.surface, &Self::hide_results_ops())
    }

    /// Returns `Ok(false)` when ignored because an analysis is running.
    ///
    /// The session guard is held until the surface writes finish, so a run
    /// cannot start between the idle check and re-enabling the trigger. Lock
    /// order is always session, then surface.
    pub fn select_shape(&self, shape: ShapeName) -> Result<bool, DemoError> {
        let mut session = self.lock_session();
        if session.is_running() {
            debug!(shape = %shape, "selection ignored while analyzing");
            return Ok(false);
        }
        session.select(shape);
        session.clear_outcomes();

        info!(shape = %shape, "shape selected");
        self.with_surface(|surface| {
            surface.apply(&SurfaceOp::remove_class(
                Target::Class(classes::SHAPE_BUTTON),
                classes::SELECTED,
            ));
            surface.apply(&SurfaceOp::add_class(
                Target::Attr {
                    name: attrs::DATA_SHAPE,
                    value: shape.as_str().to_string(),
                },
                classes::SELECTED,
            ));
            match surface.canvas_mut(ids::SHAPE_CANVAS) {
                Some(canvas) => draw_shape(canvas, shape),
                None => debug!("canvas not found for drawing shape"),
            }
            surface.apply(&SurfaceOp::SetDisabled {
                target: Target::id(ids::ANALYZE_BUTTON),
                disabled: false,
            });
            for op in Self::hide_results_ops() {
                surface.apply(&op);
            }
        })?;
        drop(session);
        Ok(true)
    }

    pub fn select_shape_named(&self, name: &str) -> Result<bool, DemoError> {
        self.select_shape(name.parse()?)
    }

    pub async fn analyze(&self) -> AnalyzeOutcome {
        // Entering Running and disabling the trigger happen under one session
        // guard; it is released before the first wait.
        let shape = {
            let mut session = self.lock_session();
            let Some(shape) = session.begin_run() else {
                info!("cannot analyze: no shape selected or already analyzing");
                return AnalyzeOutcome::Skipped;
            };
            if let Err(err) = apply_ops(&self.surface, &Self::busy_trigger_ops()) {
                session.finish_run();
                error!(error = %err, "error during analysis");
                return AnalyzeOutcome::Failed(err.to_string());
            }
            shape
        };

        info!(shape = %shape, "starting analysis");
        let outcome = match self.run_analysis(shape).await {
            Ok((rule_based, network_style)) => {
                info!(
                    shape = %shape,
                    rule_confidence = rule_based.confidence,
                    network_confidence = network_style.confidence,
                    "analysis complete"
                );
                AnalyzeOutcome::Completed {
                    rule_based,
                    network_style,
                }
            }
            Err(err) => {
                error!(error = %err, "error during analysis");
                AnalyzeOutcome::Failed(err.to_string())
            }
        };

        self.lock_session().finish_run();
        outcome
    }

    async fn run_analysis(
        &self,
        shape: ShapeName,
    ) -> Result<(AnalysisOutcome, AnalysisOutcome), DemoError> {
        let reveal = reveal_timeline(&self.timings);
        let rule_plan = rule_based_plan(shape, &self.timings);
        let network = {
            let mut random = self.random.lock().unwrap_or_else(PoisonError::into_inner);
            network_plan(shape, &self.timings, random.as_mut())
        };

        let (revealed, rule_based, network_style) = futures::join!(
            run_timeline(&reveal, &self.surface, self.scheduler.as_ref()),
            self.run_sequence(rule_plan),
            self.run_sequence(network),
        );
        revealed?;
        let rule_based = rule_based?;
        let network_style = network_style?;

        self.display_comparison()?;
        apply_ops(
            &self.surface,
            &[SurfaceOp::set_text(Target::id(ids::ANALYZE_BUTTON), COMPLETE_LABEL)],
        )?;
        Ok((rule_based, network_style))
    }

    async fn run_sequence(&self, plan: SequencePlan) -> Result<AnalysisOutcome, DemoError> {
        let SequencePlan {
            strategy,
            timeline,
            outcome,
        } = plan;
        debug!(?strategy, duration = ?timeline.total_duration(), "running sequence");

        run_timeline(&timeline, &self.surface, self.scheduler.as_ref())
            .await
            .map_err(|err| DemoError::in_sequence(strategy.label(), err))?;

        self.lock_session().set_outcome(strategy, outcome.clone());
        info!(?strategy, confidence = outcome.confidence, "sequence finished");
        Ok(outcome)
    }

    /// Copies both outcomes into the six comparison slots. Returns `Ok(false)`
    /// without touching the surface while either outcome is missing.
    pub fn display_comparison(&self) -> Result<bool, DemoError> {
        let slots = {
            let session = self.lock_session();
            let Some((rule_based, network_style)) = session.both_outcomes() else {
                info!("analysis results not ready");
                return Ok(false);
            };
            [
                (ids::TD_SHAPE, rule_based.shape.clone()),
                (ids::TD_CONF, percent(rule_based.confidence)),
                (ids::TD_REASON, rule_based.reasoning.clone()),
                (ids::BU_SHAPE, network_style.shape.clone()),
                (ids::BU_CONF, percent(network_style.confidence)),
                (ids::BU_REASON, network_style.reasoning.clone()),
            ]
        };

        let ops: Vec<SurfaceOp> = slots
            .into_iter()
            .map(|(slot, text)| SurfaceOp::set_text(Target::id(slot), text))
            .collect();
        apply_ops(&self.surface, &ops)?;
        Ok(true)
    }

    /// Returns `Ok(false)` and changes nothing while an analysis is running.
    pub fn reset(&self) -> Result<bool, DemoError> {
        let mut session = self.lock_session();
        if session.is_running() {
            warn!("reset rejected while analyzing");
            return Ok(false);
        }
        session.clear();

        info!("resetting demo");
        let mut ops = vec![
            SurfaceOp::remove_class(Target::Class(classes::SHAPE_BUTTON), classes::SELECTED),
            SurfaceOp::SetDisabled {
                target: Target::id(ids::ANALYZE_BUTTON),
                disabled: true,
            },
            SurfaceOp::set_text(Target::id(ids::ANALYZE_BUTTON), ANALYZE_LABEL),
        ];
        ops.extend(Self::hide_results_ops());
        ops.extend([
            SurfaceOp::ClearChildren {
                target: Target::id(ids::RULE_STEPS),
            },
            SurfaceOp::set_style(Target::Class(classes::METER_FILL), "width", "0%"),
            SurfaceOp::set_text(Target::Class(classes::CONFIDENCE_TEXT), "0%"),
            SurfaceOp::RemoveClasses {
                target: Target::Class(classes::NODE),
                classes: vec![classes::ACTIVE, classes::PROCESSING],
            },
            SurfaceOp::remove_class(Target::Class(classes::PROCESSING_INDICATOR), classes::ACTIVE),
            SurfaceOp::remove_class(Target::id(ids::NETWORK_VIZ), classes::ACTIVE),
        ]);
        ops.extend(
            COMPARISON_SLOTS
                .into_iter()
                .map(|slot| SurfaceOp::set_text(Target::id(slot), empty_slot_text(slot))),
        );

        self.with_surface(|surface| {
            match surface.canvas_mut(ids::SHAPE_CANVAS) {
                Some(canvas) => draw_placeholder(canvas),
                None => debug!("canvas not found"),
            }
            for op in &ops {
                surface.apply(op);
            }
        })?;
        drop(session);
        Ok(true)
    }

    /// Placeholder action: surfaces an explanatory notice and compares nothing.
    pub fn compare_all(&self) -> Option<&'static str> {
        if self.is_analyzing() {
            return None;
        }
        info!(notice = COMPARE_ALL_NOTICE, "compare all requested");
        Some(COMPARE_ALL_NOTICE)
    }

    pub fn outcome(&self, strategy: Strategy) -> Option<AnalysisOutcome> {
        self.lock_session().outcome(strategy).cloned()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
