use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::line::{classify, FunctionId, Header, ProfileLine};

/// Key of the derived pseudo-entry holding the sum of all SELF counts.
///
/// The leading space sorts it ahead of every real symbol.
pub const TOTAL_KEY: &str = " total";

/// How cost lines are attributed to functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributionMode {
    /// A function's own instructions; the call-site cost line after each
    /// callee header is skipped
    #[default]
    #[serde(rename = "self")]
    SelfCost,
    /// Every cost line in an open context, call-site costs included
    Total,
}

impl AttributionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributionMode::SelfCost => "self",
            AttributionMode::Total => "total",
        }
    }
}

/// Per-function instruction counts, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileResult {
    counts: BTreeMap<String, u64>,
}

impl ProfileResult {
    pub fn get(&self, name: &str) -> Option<u64> {
        self.counts.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all per-function counts, excluding any existing total entry
    pub fn total(&self) -> u64 {
        self.counts
            .iter()
            .filter(|(name, _)| name.as_str() != TOTAL_KEY)
            .fold(0u64, |acc, (_, count)| acc.saturating_add(*count))
    }

    /// Add the [`TOTAL_KEY`] pseudo-entry summing every function
    pub fn with_total_entry(mut self) -> Self {
        let total = self.total();
        self.counts.insert(TOTAL_KEY.to_string(), total);
        self
    }

    pub fn into_map(self) -> BTreeMap<String, u64> {
        self.counts
    }
}

impl From<BTreeMap<String, u64>> for ProfileResult {
    fn from(counts: BTreeMap<String, u64>) -> Self {
        Self { counts }
    }
}

/// Id → name table for one parse; the first name seen for an id sticks
#[derive(Debug, Default)]
struct FunctionTable {
    names: HashMap<FunctionId, String>,
}

impl FunctionTable {
    fn register(&mut self, header: Header<'_>) {
        if let Some(existing) = self.names.get(&header.id) {
            if header.name.is_some_and(|name| name != existing) {
                tracing::trace!(
                    "keeping {} for id {}, ignoring {:?}",
                    existing,
                    header.id,
                    header.name
                );
            }
            return;
        }
        let name = match header.name {
            Some(name) => name.to_string(),
            None => header.id.to_string(),
        };
        self.names.insert(header.id, name);
    }

    fn name(&self, id: FunctionId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }
}

/// Single-pass attribution state machine
#[derive(Debug)]
struct Attributor {
    mode: AttributionMode,
    table: FunctionTable,
    costs: HashMap<FunctionId, u64>,
    current: Option<FunctionId>,
    inside_callee_header: bool,
}

impl Attributor {
    fn new(mode: AttributionMode) -> Self {
        Self {
            mode,
            table: FunctionTable::default(),
            costs: HashMap::new(),
            current: None,
            inside_callee_header: false,
        }
    }

    fn feed(&mut self, line: ProfileLine<'_>) {
        match line {
            ProfileLine::FunctionHeader(header) => {
                self.table.register(header);
                self.costs.entry(header.id).or_insert(0);
                self.current = Some(header.id);
                self.inside_callee_header = false;
            }
            ProfileLine::CalleeHeader(header) => {
                self.table.register(header);
                self.costs.entry(header.id).or_insert(0);
                if self.mode == AttributionMode::SelfCost {
                    self.inside_callee_header = true;
                }
            }
            ProfileLine::Cost(count) => {
                let Some(current) = self.current else {
                    return;
                };
                if self.inside_callee_header {
                    // call-site cost, already charged inside the callee's own block
                    self.inside_callee_header = false;
                    return;
                }
                let entry = self.costs.entry(current).or_insert(0);
                *entry = entry.saturating_add(count);
            }
            ProfileLine::Other => {}
        }
    }

    fn finish(self) -> ProfileResult {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for (id, cost) in self.costs {
            let Some(name) = self.table.name(id) else {
                continue;
            };
            let entry = counts.entry(name.to_string()).or_insert(0);
            *entry = entry.saturating_add(cost);
        }

        if self.mode == AttributionMode::SelfCost {
            counts.retain(|_, count| *count > 0);
        }

        ProfileResult { counts }
    }
}

/// Attribute annotated profiler output to functions
///
/// Malformed lines are ignored. The id table lives only for this call.
pub fn attribute<'a, I>(lines: I, mode: AttributionMode) -> ProfileResult
where
    I: IntoIterator<Item = &'a str>,
{
    let mut attributor = Attributor::new(mode);
    for line in lines {
        attributor.feed(classify(line));
    }
    attributor.finish()
}

/// [`attribute`] over a whole profile held in memory
pub fn attribute_text(text: &str, mode: AttributionMode) -> ProfileResult {
    attribute(text.lines(), mode)
}
