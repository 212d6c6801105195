//! Job submission payload

use serde::{Deserialize, Serialize};

use super::datasource::DataSourceConfig;
use super::stage::StageConfig;
use crate::validation::Validatable;

/// Everything needed to start one stage: where to send traffic and how much
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageSubmission {
    #[serde(alias = "db_config")]
    pub data_source: DataSourceConfig,

    #[serde(alias = "stage_config")]
    pub stage: StageConfig,
}

impl StageSubmission {
    pub fn new(data_source: DataSourceConfig, stage: StageConfig) -> Self {
        Self { data_source, stage }
    }

    pub fn sample() -> Self {
        Self::new(DataSourceConfig::sample(), StageConfig::sample())
    }
}

impl Validatable for StageSubmission {
    fn violations(&self) -> Vec<String> {
        let mut violations = self.data_source.violations();
        violations.extend(self.stage.violations());
        violations
    }

    fn domain_name(&self) -> &'static str {
        "submission"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violations_span_both_groups() {
        let submission = StageSubmission {
            data_source: DataSourceConfig {
                max_pool_size: 0,
                ..DataSourceConfig::sample()
            },
            stage: StageConfig {
                msg_per_sec: 0,
                ..StageConfig::sample()
            },
        };

        assert_eq!(
            submission.violations(),
            ["max_pool_size is required", "msg_per_sec is required"]
        );
    }

    #[test]
    fn legacy_group_names_are_accepted() {
        let json = r#"{
            "db_config": {"kind": "memory", "collection_name": "stores", "max_pool_size": 1, "socket_timeout": 1},
            "stage_config": {"workers_count": 1}
        }"#;

        let submission: StageSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.data_source.collection_name, "stores");
        assert_eq!(submission.data_source.socket_timeout_secs, 1);
        assert_eq!(submission.stage.worker_count, 1);
    }

    #[test]
    fn sample_submission_is_valid() {
        assert!(StageSubmission::sample().validate().is_ok());
    }
}
