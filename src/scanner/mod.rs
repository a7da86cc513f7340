//! Probe scheduling and classification engine

pub mod classifier;
pub mod dispatcher;
pub mod origin;
pub mod progress;
pub mod severity;
pub mod sink;

pub use dispatcher::{ScanEngine, ScanState};
pub use origin::{OriginCandidate, OriginStrategy};
pub use severity::{analyze, analyze_with, ReflectionRule, RiskFlag};
pub use sink::{MemorySink, ResultSink};
