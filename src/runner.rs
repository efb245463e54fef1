//! Batch orchestration and reporting
//!
//! The runner owns one end-to-end pass: discover files under the configured
//! roots, parse each into a [`SourceUnit`], analyze, optionally fix and save,
//! then aggregate per-file reports. Everything it needs is constructor
//! injected, so separate runs never share state.
//!
//! A file that fails to scan is recorded as a `parse-failure` finding and the
//! batch moves on; one broken file never aborts the run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::LintConfig;
use crate::error::{LintError, Result};
use crate::extractor;
use crate::fixer;
use crate::imports::ImportManager;
use crate::resolver::StyleResolver;
use crate::rules::RuleEngine;
use crate::simulator;
use crate::tokens::TokenTables;
use crate::tree::SourceUnit;
use crate::types::{Finding, RuleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    DryRun,
    Fix,
}

impl RunMode {
    pub fn is_fix(self) -> bool {
        matches!(self, RunMode::Fix)
    }

    pub fn label(self) -> &'static str {
        match self {
            RunMode::DryRun => "Dry-run mode",
            RunMode::Fix => "Auto-fix mode",
        }
    }
}

/// Which detectors a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunProfile {
    /// Every rule, for the `design-lint` binary.
    Lint,
    /// Only the size-constraint migration, for `migrate-size-constraints`.
    SizeMigration,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn findings(&self) -> impl Iterator<Item = &Finding> + '_ {
        self.files.iter().flat_map(|f| f.findings.iter())
    }

    pub fn total(&self) -> usize {
        self.findings().count()
    }

    pub fn fixed(&self) -> usize {
        self.findings().filter(|f| f.fixed).count()
    }

    pub fn auto_fixable(&self) -> usize {
        self.findings().filter(|f| f.fixable && !f.fixed).count()
    }

    pub fn manual(&self) -> usize {
        self.findings().filter(|f| !f.fixable).count()
    }

    pub fn unresolved(&self) -> usize {
        self.total() - self.fixed()
    }

    /// Per-rule counts in first-seen order.
    pub fn by_rule(&self) -> Vec<(RuleId, usize)> {
        let mut counts: Vec<(RuleId, usize)> = Vec::new();
        for finding in self.findings() {
            match counts.iter_mut().find(|(rule, _)| *rule == finding.rule) {
                Some((_, n)) => *n += 1,
                None => counts.push((finding.rule, 1)),
            }
        }
        counts
    }
}

pub struct LintRunner {
    config: LintConfig,
    resolver: Box<dyn StyleResolver>,
    tables: TokenTables,
    imports: ImportManager,
    profile: RunProfile,
    mode: RunMode,
}

impl LintRunner {
    pub fn new(
        config: LintConfig,
        resolver: Box<dyn StyleResolver>,
        profile: RunProfile,
        mode: RunMode,
    ) -> Self {
        Self {
            config,
            resolver,
            tables: TokenTables::new(),
            imports: ImportManager::new(),
            profile,
            mode,
        }
    }

    pub fn run(&self) -> Result<RunReport> {
        let files = self.discover()?;
        log::info!("Scanning {} source files", files.len());

        let mut report = RunReport::default();
        for path in files {
            let file = self.process_file(&path)?;
            if !file.findings.is_empty() {
                report.files.push(file);
            }
        }
        Ok(report)
    }

    /// Files under the configured roots with a configured extension, in a
    /// fixed order so reports are stable across runs.
    fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for root in &self.config.roots {
            let root_path = Path::new(root);
            if !root_path.is_dir() {
                log::debug!("Root {} is not a directory, skipping", root);
                continue;
            }
            for entry in walkdir::WalkDir::new(root_path).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    LintError::Io(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        format!("Directory traversal error: {}", e),
                    ))
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let wanted = entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| self.config.extensions.iter().any(|want| want == ext))
                    .unwrap_or(false);
                if wanted {
                    files.push(entry.into_path());
                }
            }
        }
        Ok(files)
    }

    fn process_file(&self, path: &Path) -> Result<FileReport> {
        let display = path.display().to_string();
        log::debug!("Processing {}", display);

        let mut unit = match SourceUnit::from_file(path, &self.config.tags) {
            Ok(unit) => unit,
            Err(err) => {
                log::warn!("Cannot analyze {}: {}", display, err);
                let (line, message) = match err {
                    LintError::Scan { line, message, .. } => (line, message),
                    other => (1, other.to_string()),
                };
                return Ok(FileReport {
                    path: display,
                    findings: vec![Finding::file_level(RuleId::ParseFailure, line, message)],
                });
            }
        };

        let mut findings = self.analyze(&unit);
        if self.mode.is_fix() && findings.iter().any(|f| f.fixable) {
            self.fix_file(&mut unit, &mut findings)?;
        }

        Ok(FileReport {
            path: display,
            findings,
        })
    }

    fn analyze(&self, unit: &SourceUnit) -> Vec<Finding> {
        let engine = RuleEngine::new(&self.tables);
        let mut findings = Vec::new();
        for (index, element) in unit.elements().iter().enumerate() {
            match self.profile {
                RunProfile::Lint => {
                    let props = extractor::extract(element);
                    let snapshot = simulator::simulate(&props, self.resolver.as_ref());
                    findings.extend(engine.check(index, element, &props, &snapshot));
                }
                RunProfile::SizeMigration => {
                    findings.extend(engine.size_constraints(index, element));
                }
            }
        }
        findings
    }

    /// Plans every fixable finding against the current parse, then applies
    /// the whole batch at once. A finding whose plan is refused is downgraded
    /// to a manual one; the rest still go through.
    fn fix_file(&self, unit: &mut SourceUnit, findings: &mut [Finding]) -> Result<()> {
        let mut planned = Vec::new();
        let mut namespaces = BTreeSet::new();
        for (index, finding) in findings.iter_mut().enumerate() {
            if !finding.fixable {
                continue;
            }
            match fixer::plan(finding, unit) {
                Ok(patch) => {
                    namespaces.extend(patch.required_imports.iter().cloned());
                    planned.push((index, patch));
                }
                Err(err) => {
                    log::debug!("Fix refused at line {}: {}", finding.line, err);
                    finding.fixable = false;
                    finding.message =
                        format!("Cannot auto-fix: {}. Manual fix required.", reason(&err));
                }
            }
        }
        if planned.is_empty() {
            return Ok(());
        }

        let mut edits = Vec::new();
        for (_, patch) in &planned {
            edits.extend(patch.edits.iter().cloned());
        }
        edits.extend(self.imports.ensure_tokens(unit, &namespaces));
        unit.queue_edits(edits);

        match unit.commit_edits() {
            Ok(applied) => {
                log::debug!("{}: applied {} edits", unit.path().display(), applied);
                for (index, _) in &planned {
                    findings[*index].fixed = true;
                }
                unit.save()?;
            }
            Err(err) => {
                log::warn!("{}: edits not applied: {}", unit.path().display(), err);
            }
        }
        Ok(())
    }
}

fn reason(err: &LintError) -> String {
    match err {
        LintError::Patch { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// Console logging for the binaries. `DEBUG_MIGRATE=1` forces debug-level
/// output regardless of the verbosity flags; it never changes behavior.
pub fn setup_logging(verbose_count: u8) {
    let mut level = match verbose_count {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    if std::env::var("DEBUG_MIGRATE").map(|v| v == "1").unwrap_or(false) {
        level = level.max(log::LevelFilter::Debug);
    }
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_secs()
        .init();
}

/// Console output in the migration-script format, plus exit-code policy.
pub struct Reporter {
    profile: RunProfile,
    mode: RunMode,
}

impl Reporter {
    pub fn new(profile: RunProfile, mode: RunMode) -> Self {
        Self { profile, mode }
    }

    pub fn print_header(&self) {
        println!("🚀 Starting {} ({})...\n", self.tool_name(), self.mode.label());
    }

    pub fn print(&self, report: &RunReport) {
        for file in &report.files {
            println!("📄 {}", file.path);
            for finding in &file.findings {
                match self.profile {
                    RunProfile::SizeMigration => {
                        println!("   {} L{} [size→override]", self.icon(finding), finding.line);
                    }
                    RunProfile::Lint => {
                        println!(
                            "   {} L{} [{}] {}",
                            self.icon(finding),
                            finding.line,
                            finding.rule,
                            self.display_message(finding)
                        );
                    }
                }
                if let (Some(before), Some(after)) = (&finding.before, &finding.after) {
                    println!("      Before: {}", before);
                    println!("      After:  {}", after);
                }
            }
            println!();
        }
        self.print_summary(report);
    }

    pub fn render_json(&self, report: &RunReport) -> Result<String> {
        let payload = JsonReport {
            mode: match self.mode {
                RunMode::DryRun => "dry-run",
                RunMode::Fix => "fix",
            },
            files: &report.files,
            summary: JsonSummary {
                total: report.total(),
                fixed: report.fixed(),
                auto_fixable: report.auto_fixable(),
                manual: report.manual(),
            },
        };
        serde_json::to_string_pretty(&payload)
            .map_err(|e| LintError::invalid_format(format!("JSON report: {}", e)))
    }

    /// `design-lint` gates on unresolved findings; the migration tool never
    /// gates and always exits 0.
    pub fn exit_code(&self, report: &RunReport) -> i32 {
        match self.profile {
            RunProfile::SizeMigration => 0,
            RunProfile::Lint => {
                if report.unresolved() == 0 {
                    0
                } else {
                    1
                }
            }
        }
    }

    fn tool_name(&self) -> &'static str {
        match self.profile {
            RunProfile::Lint => "design lint",
            RunProfile::SizeMigration => "size constraints migration",
        }
    }

    fn icon(&self, finding: &Finding) -> &'static str {
        if finding.fixed {
            "✅"
        } else if finding.fixable {
            "🔍"
        } else {
            "⚠️"
        }
    }

    fn display_message(&self, finding: &Finding) -> String {
        if finding.fixed {
            format!("Auto-fixed: {}", finding.message)
        } else if finding.fixable && !self.mode.is_fix() {
            format!("Can auto-fix: {} (run with --fix)", finding.message)
        } else {
            finding.message.clone()
        }
    }

    fn print_summary(&self, report: &RunReport) {
        println!("\n📊 Summary:");
        match self.profile {
            RunProfile::SizeMigration => {
                println!("   Total changes: {}", report.total());
            }
            RunProfile::Lint => {
                println!("   Total issues: {}", report.total());
                if self.mode.is_fix() {
                    println!("   Fixed: {}", report.fixed());
                    println!("   Remaining: {}", report.unresolved());
                } else {
                    println!("   Auto-fixable: {}", report.auto_fixable());
                    println!("   Manual fixes needed: {}", report.manual());
                }
                for (rule, count) in report.by_rule() {
                    println!("   - {}: {}", rule, count);
                }
            }
        }

        if !self.mode.is_fix() && report.total() > 0 {
            println!("\n💡 Run with --fix to apply changes automatically");
        }
        if self.mode.is_fix() && self.profile == RunProfile::SizeMigration {
            println!("\n✅ Migration complete! Please run:");
            println!("   npm run typecheck");
            println!("   npm run build");
        }
    }
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    fixed: usize,
    auto_fixable: usize,
    manual: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    mode: &'static str,
    files: &'a [FileReport],
    summary: JsonSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::FrameStyleResolver;
    use std::fs;
    use tempfile::TempDir;

    fn write_src(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        let path = src.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn runner_for(dir: &TempDir, profile: RunProfile, mode: RunMode) -> LintRunner {
        let config = LintConfig {
            roots: vec![dir.path().join("src").to_string_lossy().into_owned()],
            ..LintConfig::default()
        };
        LintRunner::new(config, Box::new(FrameStyleResolver::new()), profile, mode)
    }

    #[test]
    fn dry_run_reports_without_touching_files() {
        let dir = TempDir::new().unwrap();
        let source = "export const V = () => <Frame style={{ padding: \"16px\" }} />;\n";
        let path = write_src(&dir, "View.tsx", source);

        let runner = runner_for(&dir, RunProfile::Lint, RunMode::DryRun);
        let report = runner.run().unwrap();

        assert_eq!(report.total(), 1);
        assert_eq!(report.auto_fixable(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), source);
        assert_eq!(Reporter::new(RunProfile::Lint, RunMode::DryRun).exit_code(&report), 1);
    }

    #[test]
    fn fix_mode_rewrites_and_resolves() {
        let dir = TempDir::new().unwrap();
        let path = write_src(
            &dir,
            "View.tsx",
            "import { Space } from \"@ds/token.const.1tier\";\nexport const V = () => <Frame style={{ padding: \"16px\" }} />;\n",
        );

        let runner = runner_for(&dir, RunProfile::Lint, RunMode::Fix);
        let report = runner.run().unwrap();

        assert_eq!(report.fixed(), 1);
        assert_eq!(report.unresolved(), 0);
        let out = fs::read_to_string(&path).unwrap();
        assert!(out.contains("<Frame override={{ p: Space.n16 }} />"));
        assert_eq!(Reporter::new(RunProfile::Lint, RunMode::Fix).exit_code(&report), 0);
    }

    #[test]
    fn missing_token_import_is_added_once() {
        let dir = TempDir::new().unwrap();
        let path = write_src(
            &dir,
            "View.tsx",
            "export const A = () => <Frame style={{ padding: \"16px\" }} />;\nexport const B = () => <Frame style={{ gap: \"8px\" }} />;\n",
        );

        let runner = runner_for(&dir, RunProfile::Lint, RunMode::Fix);
        let report = runner.run().unwrap();

        assert_eq!(report.fixed(), 2);
        let out = fs::read_to_string(&path).unwrap();
        assert_eq!(out.matches("token.const.1tier").count(), 1);
        assert!(out.contains("import { Space } from"));
    }

    #[test]
    fn scan_failures_are_contained_per_file() {
        let dir = TempDir::new().unwrap();
        write_src(&dir, "Broken.tsx", "export const V = <Frame style={{ padding: \"16px\" ");
        write_src(&dir, "Good.tsx", "export const W = () => <Frame minWidth={100} />;\n");

        let runner = runner_for(&dir, RunProfile::Lint, RunMode::DryRun);
        let report = runner.run().unwrap();

        assert_eq!(report.files.len(), 2);
        let broken = &report.files[0];
        assert!(broken.path.ends_with("Broken.tsx"));
        assert_eq!(broken.findings[0].rule, RuleId::ParseFailure);
        assert!(!broken.findings[0].fixable);
        let good = &report.files[1];
        assert_eq!(good.findings[0].rule, RuleId::SizeConstraints);
    }

    #[test]
    fn clean_trees_exit_zero_in_every_mode() {
        let dir = TempDir::new().unwrap();
        write_src(
            &dir,
            "View.tsx",
            "export const V = () => <div style={{ padding: \"16px\" }} />;\n",
        );

        for profile in [RunProfile::Lint, RunProfile::SizeMigration] {
            for mode in [RunMode::DryRun, RunMode::Fix] {
                let runner = runner_for(&dir, profile, mode);
                let report = runner.run().unwrap();
                assert_eq!(report.total(), 0);
                assert_eq!(Reporter::new(profile, mode).exit_code(&report), 0);
            }
        }
    }

    #[test]
    fn size_migration_runs_only_the_size_rule() {
        let dir = TempDir::new().unwrap();
        let source =
            "export const V = () => <Frame style={{ padding: \"16px\" }} minWidth={100} />;\n";
        let path = write_src(&dir, "View.tsx", source);

        let runner = runner_for(&dir, RunProfile::SizeMigration, RunMode::DryRun);
        let report = runner.run().unwrap();

        assert_eq!(report.total(), 1);
        let finding = report.findings().next().unwrap();
        assert_eq!(finding.rule, RuleId::SizeConstraints);
        assert_eq!(fs::read_to_string(&path).unwrap(), source);
        assert_eq!(
            Reporter::new(RunProfile::SizeMigration, RunMode::DryRun).exit_code(&report),
            0
        );
    }

    #[test]
    fn refused_fixes_downgrade_to_manual() {
        let dir = TempDir::new().unwrap();
        let source = "export const V = () => <Frame minWidth={100} override={overrides} />;\n";
        let path = write_src(&dir, "View.tsx", source);

        let runner = runner_for(&dir, RunProfile::Lint, RunMode::Fix);
        let report = runner.run().unwrap();

        assert_eq!(report.fixed(), 0);
        assert_eq!(report.manual(), 1);
        let finding = report.findings().next().unwrap();
        assert!(finding.message.starts_with("Cannot auto-fix:"));
        assert!(finding.message.ends_with("Manual fix required."));
        assert_eq!(fs::read_to_string(&path).unwrap(), source);
        assert_eq!(Reporter::new(RunProfile::Lint, RunMode::Fix).exit_code(&report), 1);
    }

    #[test]
    fn json_report_carries_counts() {
        let dir = TempDir::new().unwrap();
        write_src(&dir, "View.tsx", "export const V = () => <Frame minWidth={100} />;\n");

        let runner = runner_for(&dir, RunProfile::Lint, RunMode::DryRun);
        let report = runner.run().unwrap();
        let json = Reporter::new(RunProfile::Lint, RunMode::DryRun)
            .render_json(&report)
            .unwrap();

        assert!(json.contains("\"mode\": \"dry-run\""));
        assert!(json.contains("\"total\": 1"));
        assert!(json.contains("size-constraints-to-override"));
    }
}
