//! Brief generation pipeline: static desk registry, context assembly, and
//! the orchestrator that drives the completion client and cache writes.

pub mod config;
pub mod desks;
pub mod gather;
pub mod orchestrator;
pub mod trends;

pub use config::BriefConfig;
pub use desks::{desk, DeskSpec, SURGE_PERSONA, SYNTHESIS_PERSONA};
pub use gather::gather;
pub use orchestrator::{AllBriefsReport, BriefOrchestrator};
pub use trends::trends_context;
