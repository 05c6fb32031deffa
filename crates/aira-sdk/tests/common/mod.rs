//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use aira_sdk::{AssessmentEngine, AssessmentEngineBuilder, MemorySource};
use std::sync::Arc;

pub const AUTONOMY_QUESTIONS: &str = r#"autonomy_questions:
  autonomy:
    title: How independently does the system act?
    options:
      tool: { title: Tool }
      assistant: { title: Assistant }
      agent: { title: Agent }
      autonomous: { title: Autonomous }
  autonomy_scope:
    title: How broad is its remit?
    options: [narrow, broad]
"#;

pub const IMPACT_QUESTIONS: &str = r#"impact_questions:
  impact:
    options: [internal, external]
"#;

pub const RECOMMENDATIONS: &str = r#"by_risk_level:
  low: [Monitor quarterly]
  medium: [Add human checkpoints]
  high: [Run an impact review]
conditional:
  - condition:
      impact: [external]
      autonomy: [agent, autonomous]
    recommendation: Publish an incident response plan
"#;

/// Scoring document with a configurable `autonomy_scope` weight
pub fn scoring(scope_weight: f64) -> String {
    format!(
        r#"dimensions:
  autonomy:
    aggregation: weighted_average
    questions:
      autonomy:
        weight: 1.0
        scoring: {{ tool: 1, assistant: 2, agent: 3, autonomous: 4 }}
      autonomy_scope:
        weight: {scope_weight}
        scoring: {{ narrow: 1, broad: 4 }}
  impact:
    aggregation: max
    questions:
      impact:
        scoring: {{ internal: 1, external: 4 }}
risk_thresholds:
  low: {{ min: 0, max: 3, level: low }}
  medium: {{ min: 4, max: 6, level: medium }}
  high: {{ min: 7, max: 8, level: high }}
"#
    )
}

/// Memory source populated with the fixtures above
pub fn memory_source() -> Arc<MemorySource> {
    let source = MemorySource::new(scoring(0.5));
    source.set_questions("autonomy", AUTONOMY_QUESTIONS);
    source.set_questions("impact", IMPACT_QUESTIONS);
    source.set_recommendations(RECOMMENDATIONS);
    Arc::new(source)
}

/// Engine over `source`
pub async fn engine(source: Arc<MemorySource>) -> AssessmentEngine {
    AssessmentEngineBuilder::new()
        .with_source(source)
        .build()
        .await
        .expect("engine should build from fixtures")
}
