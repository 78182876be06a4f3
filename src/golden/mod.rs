//! Golden-case registry and run/verify/regenerate workflow
//!
//! Per case: LOADED → RUNNING → {MATCH, MISMATCH, TOOL_ERROR}. Verification
//! only reads golden files; regeneration is the one path that writes them.

mod artifact;
mod case;
mod registry;

pub use artifact::{Artifact, CountDiff, ListingDiff, Mismatch, Verdict};
pub use case::GoldenCase;
pub use registry::GoldenCaseRegistry;
