//! Compare command

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use equivx_core::json::load_json;
use equivx_core::report::FailureFormatter;
use equivx_core::{compare_in, EquivalencyOptions, OptionsProfile, TypeCatalog, Value};
use equivx_core_types::RunContext;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// JSON document under test
    pub actual: PathBuf,

    /// JSON document holding the expectation
    pub expected: PathBuf,

    /// Options profile (TOML)
    #[arg(long = "options", value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Compare every array in order
    #[arg(long)]
    pub strict_ordering: bool,

    /// Skip a path, e.g. `orders[*].id`; may be repeated
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Reason appended to the failure message
    #[arg(long)]
    pub because: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted failure message on stderr
    Text,
    /// JSON array of differences on stdout
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Equivalent,
    NotEquivalent,
}

pub fn execute(args: CompareArgs) -> anyhow::Result<Verdict> {
    let options = build_options(&args)?;
    let catalog = TypeCatalog::new().with_json_types()?;
    let actual = load_document(&args.actual)?;
    let expected = load_document(&args.expected)?;

    let ctx = RunContext::new().with_label("cli");
    let differences = compare_in(&ctx, &actual, &expected, &options, &catalog)?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&differences)?);
        }
        OutputFormat::Text if differences.is_empty() => {
            println!("Equivalent");
        }
        OutputFormat::Text => {
            let formatter = FailureFormatter::for_options(&options);
            eprintln!("{}", formatter.format(&differences, args.because.as_deref()));
        }
    }

    Ok(if differences.is_empty() {
        Verdict::Equivalent
    } else {
        Verdict::NotEquivalent
    })
}

/// Profile first, then command-line rules on top
fn build_options(args: &CompareArgs) -> anyhow::Result<EquivalencyOptions> {
    let profile = match &args.options {
        Some(path) => OptionsProfile::load(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => OptionsProfile::default(),
    };
    let mut options = profile.to_options()?;

    for pattern in &args.exclude {
        options = options.excluding(pattern)?;
    }
    if args.strict_ordering {
        options = options.with_strict_ordering();
    }
    tracing::debug!(rules = options.rules().len(), "options_built");
    Ok(options)
}

fn load_document(path: &Path) -> anyhow::Result<Value> {
    load_json(path).with_context(|| format!("reading {}", path.display()))
}
