use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A WebGL surface could not acquire its GPU context.
    ///
    /// The host decides the fallback, typically rebuilding the chart with the
    /// series moved to a canvas surface.
    #[error("gpu context unavailable for series `{series}`")]
    GpuContextUnavailable { series: String },

    #[error("surface {surface} failed: {message}")]
    Surface { surface: usize, message: String },
}
