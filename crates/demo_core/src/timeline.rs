//! Staged visual sequences as explicit step plans.
//!
//! A `Timeline` is an ordered list of surface operations and waits. Plans are
//! built up front and executed by `run_timeline` against a shared surface,
//! with waits delegated to a `Scheduler` so tests can substitute a virtual
//! clock for wall-clock time.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::error::DemoError;
use tracing::debug;

use crate::surface::{Surface, SurfaceOp};

pub type SharedSurface<S> = Arc<Mutex<S>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Apply(SurfaceOp),
    Wait(Duration),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    steps: Vec<Step>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, op: SurfaceOp) -> &mut Self {
        self.steps.push(Step::Apply(op));
        self
    }

    pub fn wait(&mut self, duration: Duration) -> &mut Self {
        if !duration.is_zero() {
            self.steps.push(Step::Wait(duration));
        }
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn ops(&self) -> impl Iterator<Item = &SurfaceOp> {
        self.steps.iter().filter_map(|step| match step {
            Step::Apply(op) => Some(op),
            Step::Wait(_) => None,
        })
    }

    pub fn total_duration(&self) -> Duration {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Wait(duration) => *duration,
                Step::Apply(_) => Duration::ZERO,
            })
            .sum()
    }
}

#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Real timers on the ambient tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Never sleeps; accumulates requested pause time and yields to other tasks.
///
/// Concurrent timelines add into the same counter, so `elapsed` is the sum of
/// all pauses, not the longest branch.
#[derive(Debug, Default)]
pub struct VirtualClock {
    elapsed_micros: AtomicU64,
    pauses: AtomicU64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_micros.load(Ordering::SeqCst))
    }

    pub fn pause_count(&self) -> u64 {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Scheduler for VirtualClock {
    async fn pause(&self, duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        self.elapsed_micros.fetch_add(micros, Ordering::SeqCst);
        self.pauses.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }
}

/// Applies one operation under the surface lock. The guard never outlives
/// this call, so no lock is held across a wait.
pub fn apply_op<S: Surface>(surface: &SharedSurface<S>, op: &SurfaceOp) -> Result<usize, DemoError> {
    let mut guard = surface
        .lock()
        .map_err(|err| DemoError::SurfaceUnavailable(err.to_string()))?;
    Ok(guard.apply(op))
}

pub fn apply_ops<S: Surface>(surface: &SharedSurface<S>, ops: &[SurfaceOp]) -> Result<(), DemoError> {
    let mut guard = surface
        .lock()
        .map_err(|err| DemoError::SurfaceUnavailable(err.to_string()))?;
    for op in ops {
        guard.apply(op);
    }
    Ok(())
}

pub async fn run_timeline<S: Surface + Send>(
    timeline: &Timeline,
    surface: &SharedSurface<S>,
    scheduler: &dyn Scheduler,
) -> Result<(), DemoError> {
    for step in timeline.steps() {
        match step {
            Step::Apply(op) => {
                let matched = apply_op(surface, op)?;
                debug!(matched, op = ?op, "applied timeline step");
            }
            Step::Wait(duration) => scheduler.pause(*duration).await,
        }
    }
    Ok(())
}

/// Named delays of every staged sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timings {
    pub reveal_comparison: Duration,
    pub rule_warmup: Duration,
    pub rule_check: Duration,
    pub rule_settle: Duration,
    pub rule_meter: Duration,
    pub network_warmup: Duration,
    pub network_build: Duration,
    pub network_reset: Duration,
    pub input_step: Duration,
    pub input_settle: Duration,
    pub hidden_step: Duration,
    pub hidden_settle: Duration,
    pub output_step: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        let ms = Duration::from_millis;
        Self {
            reveal_comparison: ms(2000),
            rule_warmup: ms(800),
            rule_check: ms(1000),
            rule_settle: ms(400),
            rule_meter: ms(300),
            network_warmup: ms(600),
            network_build: ms(800),
            network_reset: ms(300),
            input_step: ms(150),
            input_settle: ms(600),
            hidden_step: ms(200),
            hidden_settle: ms(700),
            output_step: ms(180),
        }
    }
}

/// Slowest accepted time scale.
pub const MIN_SPEED: f64 = 0.01;
/// Fastest accepted time scale.
pub const MAX_SPEED: f64 = 100.0;

impl Timings {
    /// Default timings sped up by `speed` (2.0 halves every delay).
    /// Non-positive or non-finite factors leave the defaults untouched; other
    /// factors are clamped to `MIN_SPEED..=MAX_SPEED`.
    pub fn scaled(speed: f64) -> Self {
        let base = Self::default();
        if !speed.is_finite() || speed <= 0.0 {
            return base;
        }
        let speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        let scale = |d: Duration| Duration::from_secs_f64(d.as_secs_f64() / speed);
        Self {
            reveal_comparison: scale(base.reveal_comparison),
            rule_warmup: scale(base.rule_warmup),
            rule_check: scale(base.rule_check),
            rule_settle: scale(base.rule_settle),
            rule_meter: scale(base.rule_meter),
            network_warmup: scale(base.network_warmup),
            network_build: scale(base.network_build),
            network_reset: scale(base.network_reset),
            input_step: scale(base.input_step),
            input_settle: scale(base.input_settle),
            hidden_step: scale(base.hidden_step),
            hidden_settle: scale(base.hidden_settle),
            output_step: scale(base.output_step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Document, ElementSpec, Target};

    fn shared_doc() -> SharedSurface<Document> {
        let mut doc = Document::new();
        doc.insert_root(&ElementSpec::new("indicator").with_id("spinner"));
        Arc::new(Mutex::new(doc))
    }

    #[test]
    fn zero_waits_are_dropped() {
        let mut timeline = Timeline::new();
        timeline.wait(Duration::ZERO).wait(Duration::from_millis(5));
        assert_eq!(timeline.steps().len(), 1);
        assert_eq!(timeline.total_duration(), Duration::from_millis(5));
    }

    #[test]
    fn scaling_divides_delays() {
        let fast = Timings::scaled(2.0);
        assert_eq!(fast.rule_check, Duration::from_millis(500));
        assert_eq!(Timings::scaled(0.0), Timings::default());
        assert_eq!(Timings::scaled(f64::NAN), Timings::default());
    }

    #[test]
    fn extreme_speeds_are_clamped() {
        assert_eq!(Timings::scaled(1e-20), Timings::scaled(MIN_SPEED));
        assert_eq!(Timings::scaled(1e20), Timings::scaled(MAX_SPEED));
        assert!(Timings::scaled(MIN_SPEED).rule_check >= Duration::from_secs(99));
    }

    #[tokio::test]
    async fn virtual_clock_accumulates_without_sleeping() {
        let surface = shared_doc();
        let mut timeline = Timeline::new();
        timeline
            .apply(SurfaceOp::add_class(Target::id("spinner"), "active"))
            .wait(Duration::from_secs(3600))
            .apply(SurfaceOp::remove_class(Target::id("spinner"), "active"));

        let clock = VirtualClock::new();
        run_timeline(&timeline, &surface, &clock).await.unwrap();

        assert_eq!(clock.elapsed(), Duration::from_secs(3600));
        assert_eq!(clock.pause_count(), 1);
        assert!(!surface.lock().unwrap().has_class("spinner", "active"));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_follows_paused_clock() {
        let surface = shared_doc();
        let mut timeline = Timeline::new();
        timeline
            .wait(Duration::from_millis(800))
            .apply(SurfaceOp::set_text(Target::id("spinner"), "done"));

        let started = tokio::time::Instant::now();
        run_timeline(&timeline, &surface, &TokioScheduler).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(800));
        assert_eq!(surface.lock().unwrap().text("spinner"), Some("done"));
    }

    #[tokio::test]
    async fn poisoned_surface_fails_the_timeline() {
        let surface = shared_doc();
        let poisoner = Arc::clone(&surface);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the surface lock");
        })
        .join();

        let mut timeline = Timeline::new();
        timeline.apply(SurfaceOp::set_text(Target::id("spinner"), "x"));
        let err = run_timeline(&timeline, &surface, &VirtualClock::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DemoError::SurfaceUnavailable(_)));
    }
}
