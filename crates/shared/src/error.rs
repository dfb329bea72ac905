use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("unknown shape '{0}'; expected one of circle, square, triangle, rectangle")]
    UnknownShape(String),
    #[error("visual surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("{strategy} sequence failed: {source}")]
    Sequence {
        strategy: &'static str,
        #[source]
        source: Box<DemoError>,
    },
}

impl DemoError {
    pub fn in_sequence(strategy: &'static str, source: DemoError) -> Self {
        Self::Sequence {
            strategy,
            source: Box::new(source),
        }
    }
}
