//! The application façade: one method per operation, composing parser,
//! resolver, annotation scanner, evaluator, history, and analytics.
//!
//! Seams (diff provider, test runner, history store, cancellation
//! token) are owned by value; production wiring happens once at
//! construction and tests swap in fakes.

use crate::analytics::compare::{self, CompareReport};
use crate::analytics::debt::{self, DebtReport};
use crate::analytics::delta::{self, DeltaReport};
use crate::analytics::ratchet::{self, RatchetCheck};
use crate::analytics::suggest::{self, Strategy, Suggestion};
use crate::analytics::trend::{self, TrendReport};
use crate::diff::{self, DiffProvider, GitDiff};
use crate::errors::{Error, Result};
use crate::evaluate::{self, EvalOptions};
use crate::history::{HistoryStore, DEFAULT_HISTORY_PATH};
use crate::model::{History, HistoryEntry, Policy, Report};
use crate::profile;
use crate::resolve::{self, ProjectContext, Resolver};
use crate::runner::{RunOptions, TestRunner};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Profile paths to merge. May be empty when a test runner is wired
    /// in, which then produces the profile.
    pub profiles: Vec<PathBuf>,
    /// Narrow the report to files changed versus this ref.
    pub diff_ref: Option<String>,
    /// Narrow to packages owning files changed since the incremental
    /// base ref.
    pub incremental: bool,
    pub fail_under: Option<f64>,
    pub ratchet: bool,
    /// Append the outcome to history.
    pub record: bool,
}

#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub report: Report,
    pub ratchet: Option<RatchetCheck>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.report.passed && self.ratchet.as_ref().map(|r| r.passed).unwrap_or(true)
    }

    /// Error-carrying form for library callers.
    pub fn into_result(self) -> Result<Report> {
        if self.passed() {
            Ok(self.report)
        } else {
            Err(Error::PolicyViolation(Box::new(self.report)))
        }
    }
}

pub struct Coverctl {
    policy: Policy,
    project: ProjectContext,
    resolver: Box<dyn Resolver>,
    diff: Box<dyn DiffProvider>,
    runner: Option<Box<dyn TestRunner>>,
    history: HistoryStore,
    cancel: CancellationToken,
}

impl Coverctl {
    /// Wire up production defaults for the given project root: detected
    /// resolver, git diff provider, history beside the config, no test
    /// runner.
    pub fn new(policy: Policy, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let resolver = resolve::select(&root);
        let identity = resolver.identity(&root)?;
        tracing::debug!(strategy = resolver.name(), identity = %identity, "resolver selected");
        Ok(Self {
            policy,
            diff: Box::new(GitDiff::new(root.clone())),
            runner: None,
            history: HistoryStore::new(root.join(DEFAULT_HISTORY_PATH)),
            project: ProjectContext::new(root, identity),
            resolver,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_history(mut self, store: HistoryStore) -> Self {
        self.history = store;
        self
    }

    pub fn with_diff_provider(mut self, provider: Box<dyn DiffProvider>) -> Self {
        self.diff = provider;
        self
    }

    pub fn with_runner(mut self, runner: Box<dyn TestRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn history_store(&self) -> &HistoryStore {
        &self.history
    }

    /// Evaluate profiles against the policy, optionally scoped, gated,
    /// ratcheted, and recorded.
    pub fn check(&self, opts: &CheckOptions) -> Result<CheckOutcome> {
        self.checkpoint()?;

        let changed = self.changed_scope(opts)?;
        let profiles = self.profile_paths(opts, changed.as_ref())?;
        let report = self.evaluate_profiles(
            &profiles,
            &EvalOptions {
                changed,
                fail_under: opts.fail_under,
            },
        )?;

        let ratchet = if opts.ratchet {
            Some(ratchet::check(&report, &self.history.load()?))
        } else {
            None
        };

        if opts.record {
            self.checkpoint()?;
            let (commit, branch) = diff::git_context(&self.project.root);
            self.history
                .append(HistoryEntry::from_report(&report, commit, branch))?;
        }

        Ok(CheckOutcome { report, ratchet })
    }

    pub fn delta(&self, profiles: &[PathBuf]) -> Result<DeltaReport> {
        let report = self.evaluate_profiles(profiles, &EvalOptions::default())?;
        Ok(delta::compute(&report, &self.history.load()?))
    }

    pub fn trend(&self, last: Option<usize>) -> Result<TrendReport> {
        self.checkpoint()?;
        let mut history = self.history.load()?;
        if let Some(n) = last {
            let len = history.entries.len();
            if len > n {
                history.entries.drain(..len - n);
            }
        }
        Ok(trend::compute(&history))
    }

    pub fn debt(&self, profiles: &[PathBuf]) -> Result<DebtReport> {
        let report = self.evaluate_profiles(profiles, &EvalOptions::default())?;
        Ok(debt::compute(&report))
    }

    pub fn suggest(&self, profiles: &[PathBuf], strategy: Strategy) -> Result<Vec<Suggestion>> {
        let report = self.evaluate_profiles(profiles, &EvalOptions::default())?;
        Ok(suggest::compute(&report, &self.policy, strategy))
    }

    /// Policy with suggested thresholds applied, ready to be saved.
    pub fn suggest_apply(&self, suggestions: &[Suggestion]) -> Policy {
        suggest::apply(&self.policy, suggestions)
    }

    pub fn compare(&self, base: &PathBuf, head: &PathBuf) -> Result<CompareReport> {
        let base_report =
            self.evaluate_profiles(std::slice::from_ref(base), &EvalOptions::default())?;
        let head_report =
            self.evaluate_profiles(std::slice::from_ref(head), &EvalOptions::default())?;
        Ok(compare::compute(&base_report, &head_report))
    }

    pub fn history(&self) -> Result<History> {
        self.history.load()
    }

    /// The one shared aggregation pass every operation goes through.
    fn evaluate_profiles(&self, profiles: &[PathBuf], opts: &EvalOptions) -> Result<Report> {
        self.checkpoint()?;
        let merged = profile::load_and_merge(profiles)?;

        // Profile paths carry the project identity; evaluation compares
        // repo-relative.
        let files: BTreeMap<String, crate::model::CoverageStat> = merged
            .files
            .iter()
            .map(|(path, stat)| (self.project.relativize(path).to_string(), *stat))
            .collect();

        self.checkpoint()?;
        let mut warnings = merged.warnings.clone();
        let domain_dirs = resolve::resolve_domains(
            self.resolver.as_ref(),
            &self.project.root,
            &self.policy,
            &mut warnings,
        )?;

        self.checkpoint()?;
        let annotations =
            crate::annotate::scan_files(&self.project.root, files.keys().map(|s| s.as_str()))?;

        self.checkpoint()?;
        let mut report = evaluate::evaluate(&self.policy, &files, &domain_dirs, &annotations, opts)?;
        let mut all_warnings = warnings;
        all_warnings.append(&mut report.warnings);
        report.warnings = all_warnings;
        Ok(report)
    }

    fn changed_scope(&self, opts: &CheckOptions) -> Result<Option<BTreeSet<String>>> {
        let base_ref = match (&opts.diff_ref, opts.incremental) {
            (Some(r), _) => r.clone(),
            (None, true) => diff::DEFAULT_INCREMENTAL_REF.to_string(),
            (None, false) => return Ok(None),
        };
        self.checkpoint()?;
        let changed = self.diff.changed_files(&base_ref)?;
        Ok(Some(changed.into_iter().collect()))
    }

    fn profile_paths(
        &self,
        opts: &CheckOptions,
        changed: Option<&BTreeSet<String>>,
    ) -> Result<Vec<PathBuf>> {
        if !opts.profiles.is_empty() {
            return Ok(opts.profiles.clone());
        }
        let runner = self.runner.as_ref().ok_or_else(|| {
            Error::Usage("no coverage profile given and no test runner available".into())
        })?;

        let packages = match (opts.incremental, changed) {
            (true, Some(set)) => {
                let files: Vec<String> = set.iter().cloned().collect();
                diff::owning_packages(&files)
            }
            _ => Vec::new(),
        };
        self.checkpoint()?;
        Ok(vec![runner.run(&RunOptions { packages })?])
    }

    fn checkpoint(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(Error::Canceled)
        } else {
            Ok(())
        }
    }
}
