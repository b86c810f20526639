//! Scenario validation.
//!
//! Every check runs at construction so a session can never meet a malformed
//! scenario mid-run. Deserialized scenarios pass through the same path.

use std::collections::HashSet;

use tracing::debug;

use crate::dimension::{validate_identifier, Dimension};
use crate::error::ValidationError;

use super::definition::{Decision, RawScenario, ShockEvent, Step};

/// Default upper bound for free-form text fields.
pub const MAX_TEXT_LEN: usize = 16 * 1024;

fn validate_non_empty(field: &str, value: &str, max_len: usize) -> Result<(), ValidationError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        });
    }
    validate_len(field, value, max_len)
}

fn validate_len(field: &str, value: &str, max_len: usize) -> Result<(), ValidationError> {
    if value.len() > max_len {
        return Err(ValidationError::FieldTooLong {
            field: field.to_string(),
            max_length: max_len,
        });
    }
    Ok(())
}

fn validate_dimensions(dimensions: &[Dimension]) -> Result<HashSet<&Dimension>, ValidationError> {
    if dimensions.is_empty() {
        return Err(ValidationError::NoDimensions);
    }
    let mut declared = HashSet::with_capacity(dimensions.len());
    for d in dimensions {
        validate_identifier("dimension", d.as_str())?;
        if !declared.insert(d) {
            return Err(ValidationError::DuplicateDimension {
                name: d.as_str().to_string(),
            });
        }
    }
    Ok(declared)
}

fn validate_decision(
    decision: &Decision,
    declared: &HashSet<&Dimension>,
    max_len: usize,
) -> Result<(), ValidationError> {
    validate_identifier("decision.id", &decision.id)?;
    validate_non_empty("decision.prompt", &decision.prompt, max_len)?;

    if decision.options.is_empty() {
        return Err(ValidationError::DecisionWithoutOptions {
            decision_id: decision.id.clone(),
        });
    }

    let mut labels = HashSet::with_capacity(decision.options.len());
    for option in &decision.options {
        validate_non_empty("option.label", &option.label, max_len)?;
        validate_len("option.feedback", &option.feedback, max_len)?;
        if !labels.insert(option.label.as_str()) {
            return Err(ValidationError::DuplicateOptionLabel {
                decision_id: decision.id.clone(),
                label: option.label.clone(),
            });
        }
        if let Some(unknown) = option.impact.dimensions().find(|d| !declared.contains(d)) {
            return Err(ValidationError::UnknownDimension {
                decision_id: decision.id.clone(),
                option_label: option.label.clone(),
                dimension: unknown.as_str().to_string(),
            });
        }
    }
    Ok(())
}

fn validate_shock(shock: &ShockEvent, max_len: usize) -> Result<(), ValidationError> {
    validate_identifier("shock.id", &shock.id)?;
    validate_non_empty("shock.message", &shock.message, max_len)?;
    if let Some(title) = &shock.title {
        validate_non_empty("shock.title", title, max_len)?;
    }
    Ok(())
}

/// Validates a whole scenario.
pub(crate) fn validate_scenario(raw: &RawScenario, max_len: usize) -> Result<(), ValidationError> {
    let declared = validate_dimensions(&raw.dimensions)?;

    if let Some(title) = &raw.title {
        validate_non_empty("title", title, max_len)?;
    }
    if let Some(intro) = &raw.intro {
        validate_len("intro", intro, max_len)?;
    }

    let mut decision_ids: HashSet<&str> = HashSet::new();
    let mut shock_ids: HashSet<&str> = HashSet::new();

    for step in &raw.steps {
        match step {
            Step::Decision(decision) => {
                validate_decision(decision, &declared, max_len)?;
                if shock_ids.contains(decision.id.as_str()) {
                    return Err(ValidationError::DuplicateShockId {
                        id: decision.id.clone(),
                    });
                }
                if !decision_ids.insert(decision.id.as_str()) {
                    return Err(ValidationError::DuplicateDecisionId {
                        id: decision.id.clone(),
                    });
                }
            }
            Step::Shock(shock) => {
                validate_shock(shock, max_len)?;
                if decision_ids.contains(shock.id.as_str()) || !shock_ids.insert(shock.id.as_str()) {
                    return Err(ValidationError::DuplicateShockId {
                        id: shock.id.clone(),
                    });
                }
            }
        }
    }

    if decision_ids.is_empty() {
        return Err(ValidationError::EmptyScenario);
    }

    debug!(
        target: "tradeoff::scenario",
        dimensions = raw.dimensions.len(),
        decisions = decision_ids.len(),
        shocks = shock_ids.len(),
        "scenario validated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impact::ImpactVector;
    use crate::scenario::definition::{DecisionOption, ScenarioDefinition};

    fn dim(name: &str) -> Dimension {
        Dimension::new(name).unwrap()
    }

    fn decision(id: &str) -> Decision {
        Decision::builder(id, "prompt")
            .option("a", ImpactVector::new().with(dim("env"), 1), "fb")
            .build()
    }

    #[test]
    fn rejects_unknown_dimension() {
        let d = Decision::builder("d1", "p")
            .option("a", ImpactVector::new().with(dim("water"), 1), "")
            .build();
        let err = ScenarioDefinition::new(vec![dim("env")], vec![Step::Decision(d)]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownDimension {
                decision_id: "d1".to_string(),
                option_label: "a".to_string(),
                dimension: "water".to_string(),
            }
        );
    }

    #[test]
    fn rejects_duplicate_decision_id() {
        let err = ScenarioDefinition::new(
            vec![dim("env")],
            vec![Step::Decision(decision("d1")), Step::Decision(decision("d1"))],
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::DuplicateDecisionId { id: "d1".to_string() });
    }

    #[test]
    fn rejects_scenario_without_decisions() {
        let err = ScenarioDefinition::new(vec![dim("env")], Vec::new()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyScenario);

        let err = ScenarioDefinition::new(
            vec![dim("env")],
            vec![Step::Shock(ShockEvent::new("s1", "only a shock"))],
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::EmptyScenario);
    }

    #[test]
    fn rejects_dimension_problems() {
        assert_eq!(
            ScenarioDefinition::new(Vec::new(), vec![Step::Decision(decision("d1"))]).unwrap_err(),
            ValidationError::NoDimensions
        );
        assert_eq!(
            ScenarioDefinition::new(vec![dim("env"), dim("env")], vec![Step::Decision(decision("d1"))])
                .unwrap_err(),
            ValidationError::DuplicateDimension { name: "env".to_string() }
        );
    }

    #[test]
    fn rejects_option_problems() {
        let dup = Decision::new(
            "d1",
            "p",
            vec![
                DecisionOption::new("a", ImpactVector::new(), ""),
                DecisionOption::new("a", ImpactVector::new(), ""),
            ],
        );
        assert!(matches!(
            ScenarioDefinition::new(vec![dim("env")], vec![Step::Decision(dup)]),
            Err(ValidationError::DuplicateOptionLabel { .. })
        ));

        let empty = Decision::new("d1", "p", Vec::new());
        assert!(matches!(
            ScenarioDefinition::new(vec![dim("env")], vec![Step::Decision(empty)]),
            Err(ValidationError::DecisionWithoutOptions { .. })
        ));

        let blank = Decision::new("d1", "p", vec![DecisionOption::new("  ", ImpactVector::new(), "")]);
        assert!(matches!(
            ScenarioDefinition::new(vec![dim("env")], vec![Step::Decision(blank)]),
            Err(ValidationError::MissingField { .. })
        ));
    }

    #[test]
    fn rejects_shock_id_collision() {
        let err = ScenarioDefinition::new(
            vec![dim("env")],
            vec![
                Step::Decision(decision("d1")),
                Step::Shock(ShockEvent::new("d1", "clash")),
            ],
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::DuplicateShockId { id: "d1".to_string() });
    }

    #[test]
    fn text_limit_applies_to_prompts() {
        let scenario =
            ScenarioDefinition::new(vec![dim("env")], vec![Step::Decision(decision("d1"))]).unwrap();
        assert!(scenario.check_text_limit(3).is_err());
        assert!(scenario.check_text_limit(MAX_TEXT_LEN).is_ok());
    }
}
