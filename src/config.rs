#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{sync::Once, time::Duration};

use dotenvy::dotenv;
use state::InitCell;
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use typed_builder::TypedBuilder;

use crate::{language::SupportedLanguage, program::python::BasicCheck};

/// Shared tokio runtime backing the blocking subprocess facade.
static RUNTIME: InitCell<Runtime> = InitCell::new();

/// Guards one-time tracing initialization.
static TRACING_INIT: Once = Once::new();

/// Returns the process-wide runtime, constructing it on first use.
pub fn runtime() -> &'static Runtime {
    if let Some(rt) = RUNTIME.try_get() {
        return rt;
    }
    let rt = Runtime::new().expect("failed to construct tokio runtime");
    RUNTIME.set(rt);
    RUNTIME.get()
}

/// Initializes tracing output for the harness. Loads `.env` first so a
/// fixture can ship its own `RUST_LOG`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        dotenv().ok();

        let fmt = fmt::layer()
            .without_time()
            .with_file(false)
            .with_line_number(false);
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("vpltools=info"));
        tracing_subscriber::registry().with(fmt).with(filter).init();
    });
}

/// Reads an optional whole-second timeout from the environment.
fn read_timeout_secs(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Per-fixture configuration, constructed fresh for every fixture run.
///
/// Earlier revisions kept these as mutable class-level defaults shared
/// across unrelated assignments, which let one fixture observe another's
/// mutations. Every field here is owned by the one fixture being built.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[builder(doc)]
pub struct FixtureConfig {
    /// Files which constitute the instructor solution, possibly carrying
    /// the masking suffix on disk.
    pub key_source_files: Vec<String>,

    /// Files the harness should pretend do not exist (starter code,
    /// alternative solutions).
    pub ignore_files: Vec<String>,

    /// Extensions (dot included) excluded from student-file candidacy on
    /// top of the built-in deny-list.
    pub ignore_extensions: Vec<String>,

    /// Languages this assignment accepts. Empty means all supported.
    pub permitted_languages: Vec<SupportedLanguage>,

    /// Name of the test-definition file living in the fixture directory,
    /// which must never be classified as part of the submission.
    pub test_file_name: Option<String>,

    /// Wall-clock limit applied to every program run. `None` (the
    /// default) runs unbounded; the surrounding jail enforces its own
    /// global limit. Assignments wanting the historical limit pass
    /// [`DEFAULT_RUN_TIMEOUT`](crate::constants::DEFAULT_RUN_TIMEOUT).
    #[builder(default = read_timeout_secs("VPLTOOLS_RUN_TIMEOUT_SECS"))]
    pub timeout: Option<Duration>,

    /// Whether teardown regenerates `vpl_evaluate.cases`.
    #[builder(default = true)]
    pub make_cases_file: bool,

    /// Whether the generated cases file gets a pylint block (Python
    /// submissions only).
    pub include_pylint: bool,

    /// Basic submission checks to skip for this assignment.
    pub skip_basic_checks: Vec<BasicCheck>,
}

impl FixtureConfig {
    /// The permitted-language set with "empty means everything" resolved.
    pub fn permitted(&self) -> Vec<SupportedLanguage> {
        if self.permitted_languages.is_empty() {
            SupportedLanguage::ALL.to_vec()
        } else {
            self.permitted_languages.clone()
        }
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        FixtureConfig::builder().build()
    }
}
