use thiserror::Error;

/// Configuration errors, rejected before a world is created.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid scale factor: {0} (must be finite and > 0)")]
    InvalidScale(f32),

    #[error("invalid time step: {0} (must be finite and > 0)")]
    InvalidTimeStep(f32),

    #[error("solver iterations must be >= 1 (velocity={velocity}, position={position})")]
    InvalidIterations { velocity: u32, position: u32 },

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("invalid range for {field}: {min}..{max}")]
    InvalidRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("spawn mix for {0} has no positive weight")]
    EmptyMix(&'static str),

    #[error("config parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Top-level error type for building a demo.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DemoError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown demo kind: {0}")]
    UnknownDemo(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_error_from_config_error() {
        let err: DemoError = ConfigError::InvalidScale(-1.0).into();
        assert!(matches!(err, DemoError::Config(_)));
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn parse_error_keeps_serde_message() {
        let err: ConfigError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ConfigError::Parse(ref m) if !m.is_empty()));
    }
}
