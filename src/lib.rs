//! Static design lint and codemod engine for Frame-based UI sources
//!
//! Scans JSX-style `Frame`/`Section` invocations, simulates how the design
//! system would resolve their props into classes and inline CSS, and reports
//! usages that bypass the token system. Mechanical violations are rewritten
//! in place: inline styles become token-valued `override` entries, canonical
//! border literals become the `border` prop, and raw size-constraint
//! attributes are folded into the `override` object.
//!
//! # Basic Usage
//!
//! ```no_run
//! use framelint::{lint, LintConfig, RunMode};
//!
//! fn main() -> framelint::Result<()> {
//!     let report = lint(LintConfig::default(), RunMode::DryRun)?;
//!     println!("{} issues found", report.total());
//!     Ok(())
//! }
//! ```
//!
//! # Analysis Pipeline
//!
//! Each file passes through the same phases:
//!
//! 1. **Scanner & Parser** - Locate target element invocations and their
//!    attributes as char-indexed spans
//! 2. **Extractor** - Flatten attributes into a prop bag
//! 3. **Simulator** - Merge preset, explicit, and override layers, then run
//!    the style resolution oracle
//! 4. **Rule Engine** - Detect violations against the computed snapshot
//! 5. **Fixer** - Plan span edits for fixable findings
//! 6. **Runner** - Apply edits, manage token imports, persist, and report

pub mod ast;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fixer;
pub mod imports;
pub mod lexer;
pub mod parser;
pub mod presets;
pub mod resolver;
pub mod rules;
pub mod runner;
pub mod simulator;
pub mod tokens;
pub mod tree;
pub mod types;

// Re-export commonly used types and functions
pub use config::{load_or_default, LintConfig};
pub use error::{LintError, Result};
pub use extractor::extract;
pub use fixer::{plan, Patch};
pub use imports::ImportManager;
pub use presets::resolve_layout;
pub use resolver::{FrameStyleResolver, StyleResolver};
pub use rules::RuleEngine;
pub use runner::{FileReport, LintRunner, Reporter, RunMode, RunProfile, RunReport};
pub use simulator::simulate;
pub use tokens::{TokenDimension, TokenTables};
pub use tree::{SourceUnit, TextEdit};
pub use types::{
    ComputedStyleSnapshot, Conversion, Finding, PropBag, PropValue, ResolvedStyle, RuleId,
};

/// Tool version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Runs the full lint over the configured roots with the default oracle.
pub fn lint(config: LintConfig, mode: RunMode) -> Result<RunReport> {
    let runner = LintRunner::new(
        config,
        Box::new(FrameStyleResolver::new()),
        RunProfile::Lint,
        mode,
    );
    runner.run()
}
