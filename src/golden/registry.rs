use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::artifact::{Artifact, Verdict};
use super::case::GoldenCase;
use crate::config::{CaseKind, HarnessConfig};
use crate::disasm::normalize;
use crate::error::{HarnessError, Result};
use crate::profile::{attribute_text, AttributionMode, ProfileSummary};
use crate::report::{BatchReport, CaseReport};
use crate::runner::ExternalToolRunner;

/// Golden cases of one fixture directory
///
/// Descriptors are `<id>.json` files; golden artifacts use a leading
/// underscore (`_<id>.self.json`) or a different extension (`<id>.dis`), so
/// the two never collide.
///
/// # Example Usage
/// ```no_run
/// use perfgold::config::HarnessConfig;
/// use perfgold::golden::GoldenCaseRegistry;
///
/// let config = HarnessConfig::for_fixture_dir("tests/fixtures/profile")?;
/// let registry = GoldenCaseRegistry::load(config)?;
/// let report = registry.verify_all(&[])?;
/// print!("{}", report.render_text());
/// # Ok::<(), perfgold::HarnessError>(())
/// ```
#[derive(Debug)]
pub struct GoldenCaseRegistry {
    config: HarnessConfig,
    runner: ExternalToolRunner,
    cases: BTreeMap<String, GoldenCase>,
}

impl GoldenCaseRegistry {
    /// Enumerate the descriptors in the configured fixture directory
    ///
    /// # Errors
    /// The directory cannot be read, or any descriptor is malformed.
    pub fn load(config: HarnessConfig) -> Result<Self> {
        let dir = config.fixture_dir();
        let entries = std::fs::read_dir(dir).map_err(|e| HarnessError::io(dir, e))?;

        let mut cases = BTreeMap::new();
        for entry in entries {
            let path = entry.map_err(|e| HarnessError::io(dir, e))?.path();
            let is_descriptor = path.is_file()
                && path.extension().is_some_and(|ext| ext == "json")
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| !name.starts_with('_'));
            if !is_descriptor {
                continue;
            }

            let case = GoldenCase::load(&path, config.kind)?;
            debug!("loaded case '{}' from {}", case.id, path.display());
            cases.insert(case.id.clone(), case);
        }

        info!("{} case(s) in {}", cases.len(), dir.display());
        Ok(Self {
            runner: ExternalToolRunner::new(&config),
            config,
            cases,
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Case ids in sorted order
    pub fn case_ids(&self) -> impl Iterator<Item = &str> {
        self.cases.keys().map(String::as_str)
    }

    pub fn case(&self, case_id: &str) -> Result<&GoldenCase> {
        self.cases
            .get(case_id)
            .ok_or_else(|| HarnessError::UnknownCase(case_id.to_string()))
    }

    /// Produce a fresh artifact by running the case's external tool
    pub fn run(&self, case_id: &str) -> Result<Artifact> {
        let case = self.case(case_id)?;

        match self.config.kind {
            CaseKind::Profile => {
                let raw = self.runner.profile(
                    &case.binary_name,
                    case.function_name.as_deref(),
                    &case.args,
                )?;
                let mut result = attribute_text(&raw, self.config.attribution);
                if self.config.attribution == AttributionMode::SelfCost {
                    result = result.with_total_entry();
                }

                let summary = ProfileSummary::parse(&raw);
                debug!(
                    "case '{}': {} function(s), attributed {}, profiler summary {:?}",
                    case_id,
                    result.len(),
                    result.total(),
                    summary.instructions()
                );
                Ok(Artifact::Profile(result))
            }
            CaseKind::Disassembly => {
                let raw = self.runner.disassemble(&case.binary_name, &case.symbols)?;
                let listing = normalize(&raw, &case.symbols, self.config.disassembler)?;
                if listing.is_empty() {
                    warn!("case '{}': no requested symbol found in listing", case_id);
                }
                Ok(Artifact::Listing(listing))
            }
        }
    }

    /// Read the checked-in golden artifact
    pub fn expected(&self, case_id: &str) -> Result<Artifact> {
        self.case(case_id)?;
        let path = self.config.golden_path(case_id);

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(HarnessError::Golden {
                    path,
                    message: "missing, run `perfgold generate` first".to_string(),
                });
            }
            Err(e) => return Err(HarnessError::io(path, e)),
        };
        Artifact::parse(self.config.kind, &text, &path)
    }

    /// Compare a fresh run against the golden artifact; never writes
    pub fn verify(&self, case_id: &str) -> Result<Verdict> {
        let expected = self.expected(case_id)?;
        let actual = self.run(case_id)?;
        let verdict = expected.compare(&actual);

        match &verdict {
            Verdict::Match => info!("case '{}' matches", case_id),
            Verdict::Mismatch(mismatch) => warn!("case '{}' differs: {}", case_id, mismatch),
        }
        Ok(verdict)
    }

    /// Overwrite the golden artifact with a fresh run
    ///
    /// The file is replaced atomically, so an interrupted run leaves the old
    /// golden intact.
    pub fn regenerate(&self, case_id: &str) -> Result<PathBuf> {
        let text = self.run(case_id)?.render()?;
        let path = self.config.golden_path(case_id);
        let dir = self.config.fixture_dir();

        let mut staged =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| HarnessError::io(dir, e))?;
        staged
            .write_all(text.as_bytes())
            .map_err(|e| HarnessError::io(staged.path(), e))?;
        staged
            .persist(&path)
            .map_err(|e| HarnessError::io(&path, e.error))?;

        info!("wrote {}", path.display());
        Ok(path)
    }

    /// Verify every case, or only `only` when non-empty
    ///
    /// Per-case failures land in the report; only an unknown id in `only`
    /// is an error.
    pub fn verify_all(&self, only: &[String]) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        for case_id in self.selected(only)? {
            let entry = match self.verify(case_id) {
                Ok(Verdict::Match) => CaseReport::matched(case_id),
                Ok(Verdict::Mismatch(mismatch)) => CaseReport::mismatched(case_id, mismatch),
                Err(e) => {
                    warn!("case '{}' failed: {}", case_id, e);
                    CaseReport::errored(case_id, e)
                }
            };
            report.push(entry);
        }
        Ok(report)
    }

    /// Regenerate every case, or only `only` when non-empty
    pub fn regenerate_all(&self, only: &[String]) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        for case_id in self.selected(only)? {
            let entry = match self.regenerate(case_id) {
                Ok(path) => CaseReport::regenerated(case_id, path),
                Err(e) => {
                    warn!("case '{}' not regenerated: {}", case_id, e);
                    CaseReport::errored(case_id, e)
                }
            };
            report.push(entry);
        }
        Ok(report)
    }

    fn selected<'a>(&'a self, only: &'a [String]) -> Result<Vec<&'a str>> {
        if only.is_empty() {
            return Ok(self.case_ids().collect());
        }
        let mut ids = Vec::with_capacity(only.len());
        for id in only {
            ids.push(self.case(id)?.id.as_str());
        }
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}
