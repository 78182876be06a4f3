use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::config::CaseKind;
use crate::disasm::NormalizedListing;
use crate::error::{HarnessError, Result};
use crate::profile::ProfileResult;

/// Canonical output of one case, as produced fresh or read from its golden file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Profile(ProfileResult),
    Listing(NormalizedListing),
}

impl Artifact {
    pub fn kind(&self) -> CaseKind {
        match self {
            Artifact::Profile(_) => CaseKind::Profile,
            Artifact::Listing(_) => CaseKind::Disassembly,
        }
    }

    /// Golden-file text: pretty JSON map for profiles, one line per
    /// instruction for listings. Always newline terminated.
    pub fn render(&self) -> Result<String> {
        match self {
            Artifact::Profile(profile) => {
                let mut text = serde_json::to_string_pretty(profile)
                    .map_err(|e| HarnessError::Format(e.to_string()))?;
                text.push('\n');
                Ok(text)
            }
            Artifact::Listing(listing) => Ok(listing.to_text()),
        }
    }

    /// Parse golden-file text of the given kind; `path` is only used in errors
    pub fn parse(kind: CaseKind, text: &str, path: &Path) -> Result<Self> {
        match kind {
            CaseKind::Profile => serde_json::from_str(text)
                .map(Artifact::Profile)
                .map_err(|e| HarnessError::Golden {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }),
            CaseKind::Disassembly => Ok(Artifact::Listing(NormalizedListing::from_text(text))),
        }
    }

    /// Compare a fresh artifact (`actual`) against this golden one
    pub fn compare(&self, actual: &Artifact) -> Verdict {
        let mismatch = match (self, actual) {
            (Artifact::Profile(expected), Artifact::Profile(actual)) => {
                let diffs = diff_profiles(expected, actual);
                if diffs.is_empty() {
                    return Verdict::Match;
                }
                Mismatch::Counts { diffs }
            }
            (Artifact::Listing(expected), Artifact::Listing(actual)) => {
                match diff_listings(expected, actual) {
                    Some(diff) => Mismatch::Listing(diff),
                    None => return Verdict::Match,
                }
            }
            _ => Mismatch::Kind {
                expected: self.kind(),
                actual: actual.kind(),
            },
        };
        Verdict::Mismatch(mismatch)
    }
}

/// Outcome of comparing one case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Match,
    Mismatch(Mismatch),
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match)
    }
}

/// How a fresh artifact differs from its golden file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mismatch {
    /// Every function whose count differs, or that exists on one side only
    Counts { diffs: Vec<CountDiff> },
    Listing(ListingDiff),
    Kind { expected: CaseKind, actual: CaseKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountDiff {
    pub name: String,
    pub expected: Option<u64>,
    pub actual: Option<u64>,
}

/// First differing line of two listings (1-based), plus both lengths
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingDiff {
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub expected_lines: usize,
    pub actual_lines: usize,
}

fn diff_profiles(expected: &ProfileResult, actual: &ProfileResult) -> Vec<CountDiff> {
    let mut names: Vec<&str> = expected.iter().map(|(name, _)| name).collect();
    names.extend(actual.iter().map(|(name, _)| name));
    names.sort_unstable();
    names.dedup();

    names
        .into_iter()
        .filter_map(|name| {
            let (expected, actual) = (expected.get(name), actual.get(name));
            (expected != actual).then(|| CountDiff {
                name: name.to_string(),
                expected,
                actual,
            })
        })
        .collect()
}

fn diff_listings(expected: &NormalizedListing, actual: &NormalizedListing) -> Option<ListingDiff> {
    let (exp, act) = (expected.lines(), actual.lines());
    let index = (0..exp.len().max(act.len())).find(|&i| exp.get(i) != act.get(i))?;

    Some(ListingDiff {
        line: index + 1,
        expected: exp.get(index).cloned(),
        actual: act.get(index).cloned(),
        expected_lines: exp.len(),
        actual_lines: act.len(),
    })
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Counts { diffs } => {
                write!(f, "{} count(s) differ:", diffs.len())?;
                for diff in diffs {
                    write!(
                        f,
                        " '{}' {} -> {};",
                        diff.name,
                        display_count(diff.expected),
                        display_count(diff.actual)
                    )?;
                }
                Ok(())
            }
            Mismatch::Listing(diff) => write!(
                f,
                "line {}: expected {:?}, got {:?} ({} vs {} lines)",
                diff.line,
                diff.expected.as_deref().unwrap_or("<end>"),
                diff.actual.as_deref().unwrap_or("<end>"),
                diff.expected_lines,
                diff.actual_lines
            ),
            Mismatch::Kind { expected, actual } => {
                write!(f, "golden holds {:?} output, run produced {:?}", expected, actual)
            }
        }
    }
}

fn display_count(count: Option<u64>) -> String {
    match count {
        Some(count) => count.to_string(),
        None => "missing".to_string(),
    }
}
