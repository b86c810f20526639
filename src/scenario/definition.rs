//! Scenario data model: decisions, options, shock events.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::error::ValidationError;
use crate::impact::ImpactVector;

use super::validation::{validate_scenario, MAX_TEXT_LEN};

/// One selectable answer of a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOption {
    /// Label, unique within its decision. Matched exactly on selection.
    pub label: String,

    /// Effect on the profile when this option is chosen.
    #[serde(default)]
    pub impact: ImpactVector,

    /// Message shown after selection. Opaque to the engine.
    #[serde(default)]
    pub feedback: String,
}

impl DecisionOption {
    /// Creates an option.
    pub fn new(label: impl Into<String>, impact: ImpactVector, feedback: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            impact,
            feedback: feedback.into(),
        }
    }
}

/// A decision node: a prompt with an ordered set of options.
///
/// Option order matters for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Unique decision id.
    pub id: String,
    /// Prompt shown to the participant.
    pub prompt: String,
    /// Options in display order.
    pub options: Vec<DecisionOption>,
}

impl Decision {
    /// Creates a decision.
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, options: Vec<DecisionOption>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options,
        }
    }

    /// Starts a fluent decision builder.
    pub fn builder(id: impl Into<String>, prompt: impl Into<String>) -> DecisionBuilder {
        DecisionBuilder {
            decision: Self::new(id, prompt, Vec::new()),
        }
    }

    /// Exact-match lookup of an option by label.
    #[must_use]
    pub fn option(&self, label: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|o| o.label == label)
    }

    /// Option labels in display order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.label.as_str())
    }
}

/// Fluent builder for a [`Decision`].
#[derive(Debug, Clone)]
pub struct DecisionBuilder {
    decision: Decision,
}

impl DecisionBuilder {
    /// Appends an option.
    #[must_use]
    pub fn option(mut self, label: impl Into<String>, impact: ImpactVector, feedback: impl Into<String>) -> Self {
        self.decision.options.push(DecisionOption::new(label, impact, feedback));
        self
    }

    /// Finishes the decision. Validation happens when the scenario is built.
    #[must_use]
    pub fn build(self) -> Decision {
        self.decision
    }
}

/// One-time notice inserted between decisions.
///
/// Occupies a step and must be acknowledged; carries no options and no impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShockEvent {
    /// Unique step id.
    pub id: String,
    /// Optional headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Notice text.
    pub message: String,
}

impl ShockEvent {
    /// Creates a shock event without a title.
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            message: message.into(),
        }
    }

    /// Sets the headline.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A position in the scenario sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// A decision with options.
    Decision(Decision),
    /// A shock notice.
    Shock(ShockEvent),
}

impl Step {
    /// Id of the decision or shock at this step.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Decision(d) => &d.id,
            Self::Shock(s) => &s.id,
        }
    }

    /// Returns the decision if this step is one.
    #[must_use]
    pub const fn as_decision(&self) -> Option<&Decision> {
        match self {
            Self::Decision(d) => Some(d),
            Self::Shock(_) => None,
        }
    }

    /// Returns the shock if this step is one.
    #[must_use]
    pub const fn as_shock(&self) -> Option<&ShockEvent> {
        match self {
            Self::Shock(s) => Some(s),
            Self::Decision(_) => None,
        }
    }
}

/// Stable content hash of a validated scenario.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioFingerprint(String);

impl ScenarioFingerprint {
    /// Hex form of the hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScenarioFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialized form of a scenario. Always passes through validation on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawScenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) intro: Option<String>,
    pub(crate) dimensions: Vec<Dimension>,
    pub(crate) steps: Vec<Step>,
}

/// Immutable, validated description of a simulation run.
///
/// Constructed once; read-only for the lifetime of any engine using it.
///
/// # Examples
///
/// ```
/// use tradeoff::{Decision, Dimension, ImpactVector, ScenarioDefinition, Step};
///
/// let env = Dimension::new("env").unwrap();
/// let d1 = Decision::builder("d1", "Pick a provider")
///     .option("green", ImpactVector::new().with(env.clone(), 2), "Cleaner, pricier.")
///     .option("cheap", ImpactVector::new().with(env.clone(), -1), "Cheaper, dirtier.")
///     .build();
/// let scenario = ScenarioDefinition::new(vec![env], vec![Step::Decision(d1)]).unwrap();
/// assert_eq!(scenario.decision_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScenario", into = "RawScenario")]
pub struct ScenarioDefinition {
    title: Option<String>,
    intro: Option<String>,
    dimensions: Vec<Dimension>,
    steps: Vec<Step>,
    fingerprint: ScenarioFingerprint,
}

impl ScenarioDefinition {
    /// Builds and validates a scenario from dimensions and an ordered step list.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDimension`, `DuplicateDecisionId` or `EmptyScenario`
    /// (among other schema errors) if the definition is invalid.
    pub fn new(dimensions: Vec<Dimension>, steps: Vec<Step>) -> Result<Self, ValidationError> {
        Self::from_raw(RawScenario {
            title: None,
            intro: None,
            dimensions,
            steps,
        })
    }

    pub(crate) fn from_raw(raw: RawScenario) -> Result<Self, ValidationError> {
        validate_scenario(&raw, MAX_TEXT_LEN)?;
        let fingerprint = fingerprint(&raw);
        Ok(Self {
            title: raw.title,
            intro: raw.intro,
            dimensions: raw.dimensions,
            steps: raw.steps,
            fingerprint,
        })
    }

    /// Re-checks text fields against a tighter length bound.
    pub(crate) fn check_text_limit(&self, max_text_len: usize) -> Result<(), ValidationError> {
        validate_scenario(&self.to_raw(), max_text_len)
    }

    fn to_raw(&self) -> RawScenario {
        RawScenario {
            title: self.title.clone(),
            intro: self.intro.clone(),
            dimensions: self.dimensions.clone(),
            steps: self.steps.clone(),
        }
    }

    /// Scenario headline, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Intro text, if any.
    #[must_use]
    pub fn intro(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    /// Declared dimensions in declaration order.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// All steps in sequence order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Step at `index`.
    #[must_use]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Number of steps (decisions and shocks).
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a validated scenario; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of decisions.
    #[must_use]
    pub fn decision_count(&self) -> usize {
        self.steps.iter().filter(|s| s.as_decision().is_some()).count()
    }

    /// Number of shock events.
    #[must_use]
    pub fn shock_count(&self) -> usize {
        self.steps.iter().filter(|s| s.as_shock().is_some()).count()
    }

    /// Looks a decision up by id.
    #[must_use]
    pub fn decision(&self, id: &str) -> Option<&Decision> {
        self.steps
            .iter()
            .filter_map(Step::as_decision)
            .find(|d| d.id == id)
    }

    /// Stable content hash.
    #[must_use]
    pub const fn fingerprint(&self) -> &ScenarioFingerprint {
        &self.fingerprint
    }
}

impl TryFrom<RawScenario> for ScenarioDefinition {
    type Error = ValidationError;

    fn try_from(raw: RawScenario) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl From<ScenarioDefinition> for RawScenario {
    fn from(scenario: ScenarioDefinition) -> Self {
        Self {
            title: scenario.title,
            intro: scenario.intro,
            dimensions: scenario.dimensions,
            steps: scenario.steps,
        }
    }
}

fn hash_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn hash_opt(hasher: &mut blake3::Hasher, value: Option<&str>) {
    match value {
        None => {
            hasher.update(&[0]);
        }
        Some(v) => {
            hasher.update(&[1]);
            hash_str(hasher, v);
        }
    }
}

// Length-prefixed so adjacent fields cannot alias each other.
fn fingerprint(raw: &RawScenario) -> ScenarioFingerprint {
    let mut hasher = blake3::Hasher::new();
    hash_opt(&mut hasher, raw.title.as_deref());
    hash_opt(&mut hasher, raw.intro.as_deref());
    hasher.update(&(raw.dimensions.len() as u64).to_le_bytes());
    for d in &raw.dimensions {
        hash_str(&mut hasher, d.as_str());
    }
    hasher.update(&(raw.steps.len() as u64).to_le_bytes());
    for step in &raw.steps {
        match step {
            Step::Decision(decision) => {
                hasher.update(b"D");
                hash_str(&mut hasher, &decision.id);
                hash_str(&mut hasher, &decision.prompt);
                hasher.update(&(decision.options.len() as u64).to_le_bytes());
                for option in &decision.options {
                    hash_str(&mut hasher, &option.label);
                    hash_str(&mut hasher, &option.feedback);
                    hasher.update(&(option.impact.len() as u64).to_le_bytes());
                    for (dimension, delta) in option.impact.iter() {
                        hash_str(&mut hasher, dimension.as_str());
                        hasher.update(&delta.to_le_bytes());
                    }
                }
            }
            Step::Shock(shock) => {
                hasher.update(b"S");
                hash_str(&mut hasher, &shock.id);
                hash_opt(&mut hasher, shock.title.as_deref());
                hash_str(&mut hasher, &shock.message);
            }
        }
    }
    ScenarioFingerprint(hasher.finalize().to_hex().to_string())
}
