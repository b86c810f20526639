//! Fluent scenario construction.

use crate::dimension::Dimension;
use crate::error::ValidationError;

use super::definition::{Decision, RawScenario, ScenarioDefinition, ShockEvent, Step};

/// Builder for a [`ScenarioDefinition`].
///
/// Steps are sequenced in call order, so a `shock` call lands between the
/// decisions added before and after it.
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuilder {
    title: Option<String>,
    intro: Option<String>,
    dimensions: Vec<String>,
    steps: Vec<Step>,
}

impl ScenarioBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scenario headline.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the intro text shown before the first step.
    #[must_use]
    pub fn intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    /// Declare one outcome dimension.
    #[must_use]
    pub fn dimension(mut self, name: impl Into<String>) -> Self {
        self.dimensions.push(name.into());
        self
    }

    /// Declare several outcome dimensions.
    #[must_use]
    pub fn dimensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append a decision.
    #[must_use]
    pub fn decision(mut self, decision: Decision) -> Self {
        self.steps.push(Step::Decision(decision));
        self
    }

    /// Append a shock event after the steps added so far.
    #[must_use]
    pub fn shock(mut self, shock: ShockEvent) -> Self {
        self.steps.push(Step::Shock(shock));
        self
    }

    /// Validate and build the scenario.
    pub fn build(self) -> Result<ScenarioDefinition, ValidationError> {
        let dimensions = self
            .dimensions
            .into_iter()
            .map(Dimension::new)
            .collect::<Result<Vec<_>, _>>()?;

        ScenarioDefinition::from_raw(RawScenario {
            title: self.title,
            intro: self.intro,
            dimensions,
            steps: self.steps,
        })
    }
}
