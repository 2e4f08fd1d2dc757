use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid engine config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Move ordering
    pub score_hash_move: i32,
    pub score_capture_base: i32,
    pub score_capture_multiplier: i32,
    pub score_promotion: i32,
    pub score_killer_move: i32,
    pub score_history_max: i32,
    pub history_divisor: i32,

    // Resources
    pub tt_size_mb: usize,
    /// Nodes between clock polls inside the recursion.
    pub time_check_interval: u64,
    /// Share of the time budget after which no new iteration is started.
    pub soft_time_ratio: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            score_hash_move: 2_000_000,
            score_capture_base: 1_000_000,
            score_capture_multiplier: 10,
            score_promotion: 800_000,
            score_killer_move: 600_000,
            score_history_max: 400_000,
            history_divisor: 4,

            tt_size_mb: 16,
            time_check_interval: 1024,
            soft_time_ratio: 0.6,
        }
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    score_hash_move: Option<f32>,
    score_capture_base: Option<f32>,
    score_capture_multiplier: Option<f32>,
    score_promotion: Option<f32>,
    score_killer_move: Option<f32>,
    score_history_max: Option<f32>,
    history_divisor: Option<i32>,

    tt_size_mb: Option<usize>,
    time_check_interval: Option<u64>,
    soft_time_ratio: Option<f32>,
}

impl EngineConfig {
    /// Loads a config where ordering weights are multipliers of the defaults
    /// and resource settings are absolute.
    pub fn load_from_json(json_str: &str) -> Result<Self, ConfigError> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        let config = Self {
            score_hash_move: apply_scale(default.score_hash_move, json_config.score_hash_move),
            score_capture_base: apply_scale(
                default.score_capture_base,
                json_config.score_capture_base,
            ),
            score_capture_multiplier: apply_scale(
                default.score_capture_multiplier,
                json_config.score_capture_multiplier,
            ),
            score_promotion: apply_scale(default.score_promotion, json_config.score_promotion),
            score_killer_move: apply_scale(
                default.score_killer_move,
                json_config.score_killer_move,
            ),
            score_history_max: apply_scale(
                default.score_history_max,
                json_config.score_history_max,
            ),
            history_divisor: json_config
                .history_divisor
                .unwrap_or(default.history_divisor),

            tt_size_mb: json_config.tt_size_mb.unwrap_or(default.tt_size_mb),
            time_check_interval: json_config
                .time_check_interval
                .unwrap_or(default.time_check_interval),
            soft_time_ratio: json_config
                .soft_time_ratio
                .unwrap_or(default.soft_time_ratio),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_divisor <= 0 {
            return Err(ConfigError::Invalid {
                field: "history_divisor",
                reason: "must be positive",
            });
        }
        if self.time_check_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "time_check_interval",
                reason: "must be positive",
            });
        }
        if !(0.0..=1.0).contains(&self.soft_time_ratio) {
            return Err(ConfigError::Invalid {
                field: "soft_time_ratio",
                reason: "must be within 0.0..=1.0",
            });
        }
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_default() {
        let config = EngineConfig::load_from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_config_scaled() {
        let json = r#"{
            "score_hash_move": 0.5,
            "score_killer_move": 2.0
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config.score_hash_move, 1_000_000);
        assert_eq!(config.score_killer_move, 1_200_000);
        assert_eq!(config.score_promotion, 800_000);
    }

    #[test]
    fn test_load_config_absolute_resources() {
        let json = r#"{ "tt_size_mb": 4, "time_check_interval": 256 }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config.tt_size_mb, 4);
        assert_eq!(config.time_check_interval, 256);
    }

    #[test]
    fn test_load_config_invalid_json() {
        let result = EngineConfig::load_from_json("{ invalid json }");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_load_config_rejects_zero_interval() {
        let result = EngineConfig::load_from_json(r#"{ "time_check_interval": 0 }"#);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "time_check_interval",
                ..
            })
        ));
    }

    #[test]
    fn test_deserialize_absolute_config() {
        let json = r#"{ "score_hash_move": 123 }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.score_hash_move, 123);
        assert_eq!(config.score_killer_move, 600_000);
    }
}
