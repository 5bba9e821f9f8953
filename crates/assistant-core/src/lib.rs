//! assistant-core: the Atom turn loop. Classifies each utterance, routes it
//! to a domain handler and keeps talking until the user goes quiet or says
//! goodbye.

mod error;
pub use error::{Result, TurnError};

pub mod config;
pub use config::{AssistantConfig, Secrets};

pub mod metrics;
pub use metrics::MetricsHub;

pub mod phrases;

mod assistant;
pub use assistant::{Assistant, Pipeline, Services, Settings};

mod handlers;

mod router;
pub use router::{Intent, RouteOutcome};

mod research;

mod session;
pub use session::{SessionSummary, TurnOutcome};

mod bootstrap;
pub use bootstrap::{build_pipeline, build_services, start_assistant, ServiceMode};

#[cfg(test)]
mod testing;
