//! Batch report for `verify` and `generate`
//!
//! Text goes to a terminal, JSON to CI tooling.

use std::path::PathBuf;

use serde::Serialize;

use crate::golden::Mismatch;

/// Terminal state of one case in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Match,
    Mismatch,
    /// Resolution, tool, format, or golden-file error
    Error,
    Regenerated,
}

impl CaseStatus {
    fn label(&self) -> &'static str {
        match self {
            CaseStatus::Match => "PASS",
            CaseStatus::Mismatch => "FAIL",
            CaseStatus::Error => "ERROR",
            CaseStatus::Regenerated => "WROTE",
        }
    }
}

/// One case's line in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub case_id: String,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<Mismatch>,
    /// Golden file written by `generate`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub golden: Option<PathBuf>,
}

impl CaseReport {
    pub fn matched(case_id: &str) -> Self {
        Self::new(case_id, CaseStatus::Match)
    }

    pub fn mismatched(case_id: &str, mismatch: Mismatch) -> Self {
        Self {
            detail: Some(mismatch.to_string()),
            mismatch: Some(mismatch),
            ..Self::new(case_id, CaseStatus::Mismatch)
        }
    }

    pub fn errored(case_id: &str, error: impl ToString) -> Self {
        Self {
            detail: Some(error.to_string()),
            ..Self::new(case_id, CaseStatus::Error)
        }
    }

    pub fn regenerated(case_id: &str, golden: PathBuf) -> Self {
        Self {
            golden: Some(golden),
            ..Self::new(case_id, CaseStatus::Regenerated)
        }
    }

    fn new(case_id: &str, status: CaseStatus) -> Self {
        Self {
            case_id: case_id.to_string(),
            status,
            detail: None,
            mismatch: None,
            golden: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, CaseStatus::Mismatch | CaseStatus::Error)
    }

    /// `<LABEL> <case> [-> <golden>][: <detail>]`, without a newline
    pub fn text_line(&self) -> String {
        let mut line = format!("{:<5} {}", self.status.label(), self.case_id);
        if let Some(golden) = &self.golden {
            line.push_str(&format!(" -> {}", golden.display()));
        }
        if let Some(detail) = &self.detail {
            line.push_str(&format!(": {}", detail));
        }
        line
    }
}

/// All cases of one `verify` or `generate` run, in case-id order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub cases: Vec<CaseReport>,
}

impl BatchReport {
    pub fn push(&mut self, case: CaseReport) {
        self.cases.push(case);
    }

    pub fn count(&self, status: CaseStatus) -> usize {
        self.cases.iter().filter(|c| c.status == status).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.iter().filter(|c| c.is_failure()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for case in &self.cases {
            out.push_str(&case.text_line());
            out.push('\n');
        }

        out.push_str(&format!(
            "{} case(s): {} passed, {} failed, {} error(s), {} written\n",
            self.cases.len(),
            self.count(CaseStatus::Match),
            self.count(CaseStatus::Mismatch),
            self.count(CaseStatus::Error),
            self.count(CaseStatus::Regenerated)
        ));
        out
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            cases: &'a [CaseReport],
            total: usize,
            failed: usize,
            success: bool,
        }

        serde_json::to_string_pretty(&JsonReport {
            cases: &self.cases,
            total: self.cases.len(),
            failed: self.failed(),
            success: self.is_success(),
        })
    }
}
