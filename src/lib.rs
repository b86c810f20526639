//! # Tradeoff - Branching Decision Simulation Engine
//!
//! Tradeoff steps a participant through a sequence of scenario decisions.
//! Every choice shifts a multi-axis outcome profile, one-shot shock events can
//! interrupt the sequence, and the run ends with a per-dimension qualitative
//! summary and a free-text reflection.
//!
//! ## Core Concepts
//!
//! - **ScenarioDefinition**: Validated, immutable list of decisions and shock events
//! - **Profile**: Running per-dimension score with a single-level rollback target
//! - **EventLog**: Append-only, timestamped record of stage transitions
//! - **SimulationEngine**: Table-driven state machine over caller-owned sessions
//! - **QualitativeLabel**: Three-tier interpretation of a final score
//!
//! The engine never renders anything and never writes to storage: a UI layer
//! reads [`PublicState`] and calls back with commands, and a host serializes
//! the exported records wherever it likes.
//!
//! ## Usage
//!
//! ```rust
//! use tradeoff::{Decision, Dimension, ImpactVector, ScenarioBuilder, SimulationEngine, SimulationState};
//!
//! let env = Dimension::new("env").unwrap();
//! let scenario = ScenarioBuilder::new()
//!     .dimension("env")
//!     .decision(
//!         Decision::builder("d1", "Which provider?")
//!             .option("green", ImpactVector::new().with(env.clone(), 2), "Cleaner but pricier.")
//!             .option("cheap", ImpactVector::new().with(env, -1), "Cheaper but dirtier.")
//!             .build(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let engine = SimulationEngine::new(scenario).unwrap();
//! let mut session = engine.new_session();
//! engine.start(&mut session).unwrap();
//! engine.choose_option(&mut session, "d1", "green").unwrap();
//! let view = engine.continue_to_next(&mut session).unwrap();
//! assert_eq!(view.state, SimulationState::Final);
//! assert_eq!(view.profile.score("env"), Some(2));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Data model
pub mod dimension;
pub mod error;
pub mod impact;
pub mod scenario;

// Accumulation, logging, interpretation
pub mod analytics;
pub mod outcome;
pub mod profile;

// State machine
pub mod engine;

// Re-export primary types at crate root for convenience
pub use analytics::{AnalyticsEvent, AnalyticsStream, Clock, EventLog, ManualClock, SystemClock};
pub use dimension::Dimension;
pub use engine::{
    Command, CurrentNode, EngineConfig, PublicState, ResponseRecord, SessionId, SessionReport,
    SimulationEngine, SimulationSession, SimulationState,
};
pub use error::{ExecutionError, TradeoffError, TradeoffResult, ValidationError};
pub use impact::ImpactVector;
pub use outcome::{label, DimensionOutcome, FinalOutcome, QualitativeLabel};
pub use profile::{Profile, ProfileSnapshot};
pub use scenario::{
    Decision, DecisionBuilder, DecisionOption, ScenarioBuilder, ScenarioDefinition,
    ScenarioFingerprint, ShockEvent, Step,
};
