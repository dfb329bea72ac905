//! Core of the shape approaches demo: the element surface, canvas glyphs,
//! staged sequences and the controller that drives them.

pub mod canvas;
pub mod config;
pub mod controller;
pub mod markup;
pub mod random;
pub mod render;
pub mod sequences;
pub mod session;
pub mod surface;
pub mod timeline;

pub use config::{load_config, ConfigError, DemoConfig};
pub use controller::{AnalyzeOutcome, DemoController};
pub use session::{AnalysisState, SessionState};
pub use surface::{Document, Surface};
pub use timeline::{Scheduler, SharedSurface, Timings, TokioScheduler, VirtualClock};
