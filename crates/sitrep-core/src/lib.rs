pub mod brief;
pub mod cache;
pub mod client;
pub mod confidence;
pub mod error;
pub mod router;
pub mod sanitize;
pub mod types;

pub use brief::{AllBriefsReport, BriefConfig, BriefOrchestrator};
pub use cache::{BackingStore, MemoryBackingStore, SignalCache};
pub use client::{Completion, CompletionClient, CompletionOptions};
pub use error::{Result, SitrepError};
pub use router::RegionalRouter;
pub use sanitize::sanitize;
pub use types::*;
