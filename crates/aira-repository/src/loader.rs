//! Definition loader
//!
//! Turns [`SourceDocuments`] into typed [`ConfigDefinitions`]. Documents are
//! walked as `serde_yaml::Value` so key order from the files is preserved and
//! every shape error names the document and field it came from.

use aira_core::{
    AggregationStrategy, AnswerOption, Category, ConditionClause, ConditionalRule,
    ConfigDefinitions, ConfigError, ConfigIssue, DefaultScale, LevelStyle, QuestionConfig,
    QuestionMetadata, RecommendationRules, ScaleSet, ThresholdRange, ThresholdTable,
};
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, HashMap};

use crate::validation;
use crate::SourceDocuments;

type Result<T> = std::result::Result<T, ConfigError>;

const SCORING_DOC: &str = "scoring";
const RECOMMENDATIONS_DOC: &str = "recommendations";

/// Parsed definitions together with the issues found in them
#[derive(Debug, Clone)]
pub struct LoadedDefinitions {
    pub definitions: ConfigDefinitions,
    pub issues: Vec<ConfigIssue>,
}

impl LoadedDefinitions {
    /// First issue that prevents the definitions from being served
    pub fn fatal_error(&self) -> Option<ConfigError> {
        self.issues.iter().find_map(|issue| match issue {
            ConfigIssue::MissingScore {
                category,
                question,
                key,
            } => Some(ConfigError::MissingScore {
                category: category.clone(),
                question: question.clone(),
                key: key.clone(),
            }),
            _ => None,
        })
    }
}

/// Parses source documents into definitions
///
/// # Example
///
/// ```rust
/// use aira_repository::{DefinitionLoader, SourceDocuments};
///
/// let scoring = r#"
/// dimensions:
///   autonomy:
///     aggregation: max
///     questions:
///       autonomy:
///         scoring: { tool: 1, agent: 3 }
/// risk_thresholds:
///   low: { min: 0, max: 10, level: low }
/// "#;
///
/// let loader = DefinitionLoader::new();
/// let loaded = loader.load(&SourceDocuments::new(scoring)).unwrap();
/// assert_eq!(loaded.definitions.categories[0].id, "autonomy");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefinitionLoader {
    scale_priority: Vec<String>,
}

/// Question definitions of one category, in file order
struct DefinedQuestions {
    category: String,
    questions: Vec<(String, QuestionMetadata)>,
}

impl DefinitionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale names to try before the remaining scales, in order
    pub fn with_scale_priority(mut self, priority: Vec<String>) -> Self {
        self.scale_priority = priority;
        self
    }

    /// Parse and validate, failing when any exposed answer key cannot be scored
    pub fn load(&self, documents: &SourceDocuments) -> Result<LoadedDefinitions> {
        let loaded = self.parse(documents)?;
        if let Some(err) = loaded.fatal_error() {
            return Err(err);
        }
        Ok(loaded)
    }

    /// Parse and collect every issue without failing on missing scores
    pub fn parse(&self, documents: &SourceDocuments) -> Result<LoadedDefinitions> {
        let defined = documents
            .questions
            .iter()
            .map(|(category, content)| parse_questions(category, content))
            .collect::<Result<Vec<_>>>()?;

        let scoring = parse_document(SCORING_DOC, &documents.scoring)?;
        let recommendations = match &documents.recommendations {
            Some(content) => {
                parse_recommendations(&parse_document(RECOMMENDATIONS_DOC, content)?)?
            }
            None => RecommendationRules::default(),
        };

        let mut issues = Vec::new();
        let categories = self.merge_categories(&scoring, defined, &mut issues)?;
        let thresholds = parse_thresholds(&scoring)?;
        let styling = parse_styling(&scoring)?;
        let scales = ScaleSet::new(parse_scales(&scoring)?, &self.scale_priority);

        let definitions = ConfigDefinitions::new(categories, thresholds)
            .with_scales(scales)
            .with_recommendations(recommendations)
            .with_styling(styling);

        issues.extend(validation::collect_issues(&definitions));

        Ok(LoadedDefinitions {
            definitions,
            issues,
        })
    }

    /// Build categories from the scoring dimensions, attaching question definitions
    fn merge_categories(
        &self,
        scoring: &Value,
        defined: Vec<DefinedQuestions>,
        issues: &mut Vec<ConfigIssue>,
    ) -> Result<Vec<Category>> {
        let dimensions = scoring
            .get("dimensions")
            .ok_or_else(|| ConfigError::malformed(SCORING_DOC, "missing 'dimensions'"))?;
        let dimensions = as_mapping(SCORING_DOC, "dimensions", dimensions)?;

        let mut defined: HashMap<String, Vec<(String, QuestionMetadata)>> = defined
            .into_iter()
            .map(|d| (d.category, d.questions))
            .collect();

        let mut categories = Vec::with_capacity(dimensions.len());
        // question id → owning category
        let mut owners: HashMap<String, String> = HashMap::new();

        for (key, dimension) in dimensions {
            let id = key_string(SCORING_DOC, "dimensions", key)?;
            let field = format!("dimensions.{}", id);
            let strategy = parse_strategy(&field, dimension)?;
            let mut scored = parse_scored_questions(&id, &field, dimension)?;

            let mut category = Category::new(id.clone(), strategy);

            for (question_id, metadata) in defined.remove(&id).unwrap_or_default() {
                let question = match scored.iter().position(|q| q.id == question_id) {
                    Some(pos) => scored.remove(pos),
                    None => QuestionConfig::new(question_id, id.clone()),
                };
                category.questions.push(question.with_metadata(metadata));
            }
            // Scoring entries without a definition keep their scoring order
            category.questions.extend(scored);

            for question in &category.questions {
                if let Some(previous) = owners.insert(question.id.clone(), id.clone()) {
                    return Err(ConfigError::malformed(
                        SCORING_DOC,
                        format!(
                            "question '{}' appears in both '{}' and '{}'",
                            question.id, previous, id
                        ),
                    ));
                }
            }

            categories.push(category);
        }

        let mut undeclared: Vec<String> = defined.into_keys().collect();
        undeclared.sort();
        issues.extend(
            undeclared
                .into_iter()
                .map(|category| ConfigIssue::UndeclaredCategory { category }),
        );

        Ok(categories)
    }
}

fn parse_document(document: &str, content: &str) -> Result<Value> {
    let value: Value = serde_yaml::from_str(content)
        .map_err(|e| ConfigError::malformed(document, format!("invalid YAML: {}", e)))?;
    // An empty document parses as null
    Ok(match value {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    })
}

fn as_mapping<'a>(document: &str, field: &str, value: &'a Value) -> Result<&'a Mapping> {
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(ConfigError::malformed(
            document,
            format!("'{}' must be a mapping", field),
        )),
    }
}

/// Mapping at `field`, or an empty one when the field is absent or null
fn optional_mapping<'a>(document: &str, field: &str, value: Option<&'a Value>) -> Result<Option<&'a Mapping>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_mapping(document, field, value).map(Some),
    }
}

/// Scalar rendered as a string, for map keys and answer values
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn key_string(document: &str, field: &str, key: &Value) -> Result<String> {
    scalar_string(key).ok_or_else(|| {
        ConfigError::malformed(document, format!("'{}' has a non-scalar key", field))
    })
}

fn number(document: &str, field: &str, value: &Value) -> Result<f64> {
    match value.as_f64() {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ConfigError::malformed(
            document,
            format!("'{}' must be a finite number", field),
        )),
    }
}

fn parse_questions(category: &str, content: &str) -> Result<DefinedQuestions> {
    let document = format!("questions/{}", category);
    let root = parse_document(&document, content)?;
    let top_key = format!("{}_questions", category);

    let mut questions = Vec::new();
    let root = as_mapping(&document, "<root>", &root)?;
    if root.is_empty() {
        return Ok(DefinedQuestions {
            category: category.to_string(),
            questions,
        });
    }

    let entries = root
        .get(top_key.as_str())
        .ok_or_else(|| ConfigError::malformed(&document, format!("missing '{}'", top_key)))?;

    if let Some(entries) = optional_mapping(&document, &top_key, Some(entries))? {
        for (key, entry) in entries {
            let id = key_string(&document, &top_key, key)?;
            let field = format!("{}.{}", top_key, id);
            questions.push((id, parse_metadata(&document, &field, entry)?));
        }
    }

    Ok(DefinedQuestions {
        category: category.to_string(),
        questions,
    })
}

fn parse_metadata(document: &str, field: &str, entry: &Value) -> Result<QuestionMetadata> {
    let title = entry.get("title").and_then(|v| v.as_str()).map(String::from);
    let required = entry
        .get("required")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let mut options = Vec::new();
    match entry.get("options") {
        None | Some(Value::Null) => {}
        Some(Value::Mapping(mapping)) => {
            for (key, option) in mapping {
                let key = key_string(document, &format!("{}.options", field), key)?;
                let label = option
                    .get("title")
                    .or_else(|| option.get("label"))
                    .and_then(|v| v.as_str())
                    .map(String::from);
                let description = option
                    .get("description")
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .map(String::from);
                options.push(AnswerOption {
                    key,
                    label,
                    description,
                });
            }
        }
        Some(Value::Sequence(keys)) => {
            for key in keys {
                let key = key_string(document, &format!("{}.options", field), key)?;
                options.push(AnswerOption {
                    key,
                    label: None,
                    description: None,
                });
            }
        }
        Some(_) => {
            return Err(ConfigError::malformed(
                document,
                format!("'{}.options' must be a mapping or a list", field),
            ))
        }
    }

    Ok(QuestionMetadata {
        title,
        required,
        options,
    })
}

fn parse_strategy(field: &str, dimension: &Value) -> Result<AggregationStrategy> {
    match dimension.get("aggregation") {
        None | Some(Value::Null) => Ok(AggregationStrategy::default()),
        Some(value) => {
            let name = value.as_str().ok_or_else(|| {
                ConfigError::malformed(SCORING_DOC, format!("'{}.aggregation' must be a string", field))
            })?;
            name.parse::<AggregationStrategy>().map_err(|e| {
                ConfigError::malformed(SCORING_DOC, format!("'{}.aggregation': {}", field, e))
            })
        }
    }
}

fn parse_scored_questions(
    category: &str,
    field: &str,
    dimension: &Value,
) -> Result<Vec<QuestionConfig>> {
    let questions_field = format!("{}.questions", field);
    let Some(entries) = optional_mapping(SCORING_DOC, &questions_field, dimension.get("questions"))?
    else {
        return Ok(Vec::new());
    };

    let mut questions = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        let id = key_string(SCORING_DOC, &questions_field, key)?;
        let field = format!("{}.{}", questions_field, id);
        let mut question = QuestionConfig::new(id, category);

        if let Some(weight) = entry.get("weight") {
            let weight = number(SCORING_DOC, &format!("{}.weight", field), weight)?;
            if weight < 0.0 {
                return Err(ConfigError::malformed(
                    SCORING_DOC,
                    format!("'{}.weight' must not be negative", field),
                ));
            }
            question.weight = weight;
        }

        let scoring_field = format!("{}.scoring", field);
        if let Some(scores) = optional_mapping(SCORING_DOC, &scoring_field, entry.get("scoring"))? {
            for (answer, score) in scores {
                let answer = key_string(SCORING_DOC, &scoring_field, answer)?;
                let score = number(SCORING_DOC, &format!("{}.{}", scoring_field, answer), score)?;
                question.scoring.insert(answer, score);
            }
        }

        if let Some(scale) = entry.get("default_scale").and_then(|v| v.as_str()) {
            question.default_scale = Some(scale.to_string());
        }

        questions.push(question);
    }

    Ok(questions)
}

fn parse_thresholds(scoring: &Value) -> Result<ThresholdTable> {
    let Some(entries) = optional_mapping(SCORING_DOC, "risk_thresholds", scoring.get("risk_thresholds"))?
    else {
        return Err(ConfigError::NoThresholds);
    };

    let mut ranges = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        let key = key_string(SCORING_DOC, "risk_thresholds", key)?;
        let field = format!("risk_thresholds.{}", key);

        let bound = |name: &str| -> Result<f64> {
            let value = entry.get(name).ok_or_else(|| {
                ConfigError::malformed(SCORING_DOC, format!("'{}.{}' is missing", field, name))
            })?;
            number(SCORING_DOC, &format!("{}.{}", field, name), value)
        };
        let min = bound("min")?;
        let max = bound("max")?;

        let level = entry
            .get("level")
            .and_then(scalar_string)
            .filter(|level| !level.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::malformed(SCORING_DOC, format!("'{}.level' is missing", field))
            })?;

        ranges.push(ThresholdRange::new(key, min, max, level));
    }

    ThresholdTable::new(ranges)
}

fn parse_styling(scoring: &Value) -> Result<BTreeMap<String, LevelStyle>> {
    let mut styling = BTreeMap::new();
    let Some(entries) = optional_mapping(SCORING_DOC, "risk_styling", scoring.get("risk_styling"))?
    else {
        return Ok(styling);
    };

    for (key, entry) in entries {
        let level = key_string(SCORING_DOC, "risk_styling", key)?;
        let field = format!("risk_styling.{}", level);
        let mut style = LevelStyle::default();
        if let Some(attributes) = optional_mapping(SCORING_DOC, &field, Some(entry))? {
            for (name, value) in attributes {
                let name = key_string(SCORING_DOC, &field, name)?;
                if let Some(value) = scalar_string(value) {
                    style.attributes.insert(name, value);
                }
            }
        }
        styling.insert(level, style);
    }

    Ok(styling)
}

fn parse_scales(scoring: &Value) -> Result<Vec<DefaultScale>> {
    let Some(entries) = optional_mapping(SCORING_DOC, "default_scoring", scoring.get("default_scoring"))?
    else {
        return Ok(Vec::new());
    };

    let mut scales = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        let name = key_string(SCORING_DOC, "default_scoring", key)?;
        let field = format!("default_scoring.{}", name);
        let mut scale = DefaultScale::new(name);
        if let Some(scores) = optional_mapping(SCORING_DOC, &field, Some(entry))? {
            for (answer, score) in scores {
                let answer = key_string(SCORING_DOC, &field, answer)?;
                let score = number(SCORING_DOC, &format!("{}.{}", field, answer), score)?;
                scale.scores.insert(answer, score);
            }
        }
        scales.push(scale);
    }

    Ok(scales)
}

fn parse_recommendations(root: &Value) -> Result<RecommendationRules> {
    let mut rules = RecommendationRules::new();

    if let Some(levels) = optional_mapping(RECOMMENDATIONS_DOC, "by_risk_level", root.get("by_risk_level"))? {
        for (key, items) in levels {
            let level = key_string(RECOMMENDATIONS_DOC, "by_risk_level", key)?;
            let field = format!("by_risk_level.{}", level);
            let items = match items {
                Value::Null => Vec::new(),
                Value::Sequence(items) => items
                    .iter()
                    .map(|item| recommendation_text(&field, item))
                    .collect::<Result<Vec<_>>>()?,
                _ => {
                    return Err(ConfigError::malformed(
                        RECOMMENDATIONS_DOC,
                        format!("'{}' must be a list", field),
                    ))
                }
            };
            rules.baseline.insert(level, items);
        }
    }

    match root.get("conditional") {
        None | Some(Value::Null) => {}
        Some(Value::Sequence(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                rules.conditional.push(parse_rule(index, entry)?);
            }
        }
        Some(_) => {
            return Err(ConfigError::malformed(
                RECOMMENDATIONS_DOC,
                "'conditional' must be a list",
            ))
        }
    }

    Ok(rules)
}

fn recommendation_text(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
        .ok_or_else(|| {
            ConfigError::malformed(
                RECOMMENDATIONS_DOC,
                format!("'{}' contains an empty recommendation", field),
            )
        })
}

fn parse_rule(index: usize, entry: &Value) -> Result<ConditionalRule> {
    let field = format!("conditional[{}]", index);
    let recommendation = entry
        .get("recommendation")
        .ok_or_else(|| {
            ConfigError::malformed(
                RECOMMENDATIONS_DOC,
                format!("'{}.recommendation' is missing", field),
            )
        })
        .and_then(|value| recommendation_text(&format!("{}.recommendation", field), value))?;

    let mut rule = ConditionalRule::new(recommendation);
    let condition_field = format!("{}.condition", field);
    if let Some(condition) = optional_mapping(RECOMMENDATIONS_DOC, &condition_field, entry.get("condition"))? {
        for (key, allowed) in condition {
            let name = key_string(RECOMMENDATIONS_DOC, &condition_field, key)?;
            // A scalar is a one-element set
            let values: Vec<String> = match allowed {
                Value::Sequence(values) => values.iter().filter_map(scalar_string).collect(),
                other => scalar_string(other).into_iter().collect(),
            };
            rule.condition.push(ConditionClause::new(name, values));
        }
    }

    Ok(rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCORING: &str = r##"
dimensions:
  autonomy:
    aggregation: weighted_average
    questions:
      autonomy:
        weight: 1.0
        scoring: { tool: 1, assistant: 2, agent: 3, autonomous: 4 }
      autonomy_scope:
        weight: 0.5
        scoring: { narrow: 1, broad: 4 }
  oversight:
    questions:
      oversight:
        default_scale: frequency
        scoring: { full: 1 }
risk_thresholds:
  low: { min: 0, max: 4, level: low }
  high: { min: 5, max: 10, level: high }
risk_styling:
  low: { color: "#2e7d32", background: "#e8f5e9" }
default_scoring:
  frequency: { rarely: 2, never: 4 }
"##;

    const AUTONOMY_QUESTIONS: &str = r#"
autonomy_questions:
  autonomy:
    title: How autonomous is the system?
    required: true
    options:
      tool: { title: Tool, description: Runs on request }
      assistant: { title: Assistant }
      agent: { title: Agent }
      autonomous: { title: Autonomous }
  autonomy_scope:
    title: Scope
    options: [narrow, broad]
"#;

    fn documents() -> SourceDocuments {
        let mut documents = SourceDocuments::new(SCORING);
        documents.add_questions("autonomy", AUTONOMY_QUESTIONS);
        documents
    }

    #[test]
    fn test_parse_categories_in_declaration_order() {
        let loaded = DefinitionLoader::new().load(&documents()).unwrap();
        let categories = &loaded.definitions.categories;

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].id, "autonomy");
        assert_eq!(categories[0].strategy, AggregationStrategy::WeightedAverage);
        assert_eq!(categories[1].strategy, AggregationStrategy::Max);

        let scope = categories[0].question("autonomy_scope").unwrap();
        assert_eq!(scope.weight, 0.5);
        assert_eq!(scope.scoring.get("broad"), Some(&4.0));
        assert_eq!(scope.exposed_keys().collect::<Vec<_>>(), vec!["narrow", "broad"]);

        let autonomy = categories[0].question("autonomy").unwrap();
        let metadata = autonomy.metadata.as_ref().unwrap();
        assert!(metadata.required);
        assert_eq!(metadata.options[0].label.as_deref(), Some("Tool"));
        assert_eq!(metadata.options[0].description.as_deref(), Some("Runs on request"));
    }

    #[test]
    fn test_styling_and_scales() {
        let loaded = DefinitionLoader::new().load(&documents()).unwrap();
        let definitions = &loaded.definitions;

        assert_eq!(definitions.styling["low"].get("color"), Some("#2e7d32"));
        assert_eq!(definitions.scales.len(), 1);
        assert_eq!(definitions.thresholds.ranges().len(), 2);
    }

    #[test]
    fn test_missing_score_is_fatal() {
        let mut documents = documents();
        documents.add_questions(
            "oversight",
            "oversight_questions:\n  oversight:\n    options: [full, sometimes]\n",
        );

        let err = DefinitionLoader::new().load(&documents).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingScore {
                category: "oversight".to_string(),
                question: "oversight".to_string(),
                key: "sometimes".to_string(),
            }
        );

        // parse() still reports it as an issue
        let loaded = DefinitionLoader::new().parse(&documents).unwrap();
        assert!(loaded.issues.iter().any(ConfigIssue::is_error));
    }

    #[test]
    fn test_default_scale_covers_missing_key() {
        let mut documents = documents();
        documents.add_questions(
            "oversight",
            "oversight_questions:\n  oversight:\n    options: [full, rarely, never]\n",
        );

        assert!(DefinitionLoader::new().load(&documents).is_ok());
    }

    #[test]
    fn test_unknown_aggregation_is_malformed() {
        let scoring = SCORING.replace("weighted_average", "median");
        let err = DefinitionLoader::new()
            .load(&SourceDocuments::new(scoring))
            .unwrap_err();

        match err {
            ConfigError::Malformed { document, message } => {
                assert_eq!(document, "scoring");
                assert!(message.contains("dimensions.autonomy.aggregation"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_score_is_malformed() {
        let scoring = SCORING.replace("narrow: 1", "narrow: low");
        let err = DefinitionLoader::new()
            .load(&SourceDocuments::new(scoring))
            .unwrap_err();
        assert!(err.to_string().contains("dimensions.autonomy.questions.autonomy_scope.scoring.narrow"));
    }

    #[test]
    fn test_negative_weight_is_malformed() {
        let scoring = SCORING.replace("weight: 0.5", "weight: -0.5");
        let err = DefinitionLoader::new()
            .load(&SourceDocuments::new(scoring))
            .unwrap_err();
        assert!(err.to_string().contains("must not be negative"));
    }

    #[test]
    fn test_missing_thresholds() {
        let scoring = "dimensions:\n  autonomy: {}\n";
        let err = DefinitionLoader::new()
            .load(&SourceDocuments::new(scoring))
            .unwrap_err();
        assert_eq!(err, ConfigError::NoThresholds);
    }

    #[test]
    fn test_threshold_without_level() {
        let scoring = "dimensions: {}\nrisk_thresholds:\n  low: { min: 0, max: 3 }\n";
        let err = DefinitionLoader::new()
            .load(&SourceDocuments::new(scoring))
            .unwrap_err();
        assert!(err.to_string().contains("risk_thresholds.low.level"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = DefinitionLoader::new()
            .load(&SourceDocuments::new("dimensions: [unclosed"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { ref document, .. } if document == "scoring"));
    }

    #[test]
    fn test_recommendations() {
        let recommendations = r#"
by_risk_level:
  low:
    - Keep a record of the assessment
  high:
    - Run a full impact review
    - Add human checkpoints
conditional:
  - condition:
      impact: [external]
      oversight: minimal
    recommendation: Notify affected parties
"#;
        let documents = documents().with_recommendations(recommendations);
        let loaded = DefinitionLoader::new().load(&documents).unwrap();
        let rules = &loaded.definitions.recommendations;

        assert_eq!(rules.baseline["high"].len(), 2);
        let rule = &rules.conditional[0];
        assert_eq!(rule.condition.len(), 2);
        assert_eq!(rule.condition[0].field, "impact");
        assert!(rule.condition[1].allowed.contains("minimal"));

        // oversight is scored, impact is not configured anywhere
        let unknown: Vec<&ConfigIssue> = loaded
            .issues
            .iter()
            .filter(|issue| matches!(issue, ConfigIssue::UnknownConditionField { .. }))
            .collect();
        assert_eq!(
            unknown,
            vec![&ConfigIssue::UnknownConditionField {
                rule: 0,
                field: "impact".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_recommendation_is_malformed() {
        let documents = documents().with_recommendations("by_risk_level:\n  low: ['  ']\n");
        let err = DefinitionLoader::new().load(&documents).unwrap_err();
        assert!(err.to_string().contains("empty recommendation"));
    }

    #[test]
    fn test_undeclared_category_and_orphans() {
        let mut documents = documents();
        documents.add_questions("governance", "governance_questions:\n  governance:\n    options: [yes]\n");

        let loaded = DefinitionLoader::new().load(&documents).unwrap();
        assert!(loaded.issues.contains(&ConfigIssue::UndeclaredCategory {
            category: "governance".to_string()
        }));
        // oversight is scored but never defined
        assert!(loaded.issues.contains(&ConfigIssue::OrphanedScoring {
            category: "oversight".to_string(),
            question: "oversight".to_string(),
        }));
    }

    #[test]
    fn test_duplicate_question_across_categories() {
        let scoring = SCORING.replace("      oversight:\n        default_scale", "      autonomy:\n        default_scale");
        let err = DefinitionLoader::new()
            .load(&SourceDocuments::new(scoring))
            .unwrap_err();
        assert!(err.to_string().contains("appears in both"));
    }

    #[test]
    fn test_scale_priority() {
        let scoring = format!("{}  likert: {{ rarely: 1 }}\n", SCORING);
        let loader = DefinitionLoader::new().with_scale_priority(vec!["likert".to_string()]);
        let loaded = loader.load(&SourceDocuments::new(scoring)).unwrap();

        let names: Vec<&str> = loaded
            .definitions
            .scales
            .iter()
            .map(|scale| scale.name.as_str())
            .collect();
        assert_eq!(names, vec!["likert", "frequency"]);
    }
}
