/// Header and trailer counters of a profile file (`events:`, `summary:`,
/// `totals:`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSummary {
    pub events: Vec<String>,
    /// First event of the `summary:` line
    pub summary: Option<u64>,
    /// First event of the `totals:` line
    pub totals: Option<u64>,
}

impl ProfileSummary {
    pub fn parse(text: &str) -> Self {
        let mut summary = ProfileSummary::default();

        for line in text.lines() {
            if let Some(rest) = line.strip_prefix("events:") {
                summary.events = rest.split_ascii_whitespace().map(str::to_string).collect();
            } else if let Some(rest) = line.strip_prefix("summary:") {
                summary.summary = first_count(rest);
            } else if let Some(rest) = line.strip_prefix("totals:") {
                summary.totals = first_count(rest);
            }
        }

        summary
    }

    /// The profiler's own instruction total, if it reported one
    pub fn instructions(&self) -> Option<u64> {
        self.summary.or(self.totals)
    }
}

fn first_count(rest: &str) -> Option<u64> {
    rest.split_ascii_whitespace().next()?.parse().ok()
}
