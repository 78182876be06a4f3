//! Per-function instruction attribution from call-graph profiles
//!
//! Parses callgrind-style annotated output into a name → instruction count
//! mapping under one of two attribution modes:
//!
//! - **SELF**: a function's own instructions. After every `cfn=` callee
//!   header exactly one cost line is skipped, since it re-reports the
//!   call-site cost that is already charged inside the callee's block.
//!   Zero-valued entries are dropped.
//! - **TOTAL**: every cost line seen while a context is open, call sites
//!   included. All entries are kept.
//!
//! # Example
//! ```
//! use perfgold::profile::{attribute, AttributionMode};
//!
//! let lines = ["fn=(1) foo", "0 10", "cfn=(2) bar", "0 100", "1 7"];
//! let result = attribute(lines, AttributionMode::SelfCost);
//! assert_eq!(result.get("foo"), Some(17));
//! assert_eq!(result.get("bar"), None);
//! ```

mod attribution;
mod line;
mod summary;

pub use attribution::{attribute, attribute_text, AttributionMode, ProfileResult, TOTAL_KEY};
pub use line::{classify, FunctionId, Header, ProfileLine};
pub use summary::ProfileSummary;
