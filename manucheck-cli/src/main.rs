use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing::Level;

use manucheck::logging::{init_logging, LogConfig, LogFormat};
use manucheck::report::{render_text, ReportArtifact};
use manucheck::{
    DocumentFormat, ManuscriptProcessor, ProcessedSubmission, RuleSet, TemplateRegistry,
    ValidatorConfig, DEFAULT_TEMPLATE,
};

const EXIT_COMPLIANT: i32 = 0;
const EXIT_NON_COMPLIANT: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "manucheck", version)]
#[command(about = "Check a manuscript's abstract, keywords and required sections against a journal template")]
struct Args {
    /// Manuscript to check (.txt, .md, .docx or .pdf)
    #[arg(value_name = "INPUT", required_unless_present = "show_templates")]
    input: Option<PathBuf>,

    /// Built-in journal template
    #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
    template: String,

    /// Path to a custom rule set (YAML format); overrides --template
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to validator settings (YAML format)
    #[arg(long)]
    validator_config: Option<PathBuf>,

    /// Also check that required sections appear in the declared order
    #[arg(long)]
    check_order: bool,

    /// Report file or directory (default: article_compliance_report.txt, or .json with --format json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format printed and written
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: ReportFormat,

    /// Print the report without writing a file
    #[arg(long)]
    no_write: bool,

    /// List available templates and exit
    #[arg(long)]
    show_templates: bool,

    /// Log timing of each pipeline step (raises the log level to info)
    #[arg(long, conflicts_with = "quiet")]
    profile: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormatArg,

    /// Prefix log lines with timestamps
    #[arg(long)]
    log_timestamps: bool,

    /// Disable colored log output
    #[arg(long)]
    no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn main() {
    let args = Args::parse();

    let log_config = log_config_from_args(&args);
    if let Err(e) = init_logging(&log_config) {
        eprintln!("❌ Failed to initialize logging: {e}");
        std::process::exit(EXIT_ERROR);
    }

    let exit_code = match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {e:#}");
            EXIT_ERROR
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags.
fn log_config_from_args(args: &Args) -> LogConfig {
    let mut config = LogConfig::from_verbosity(args.verbose, args.quiet)
        .with_format(args.log_format.into())
        .with_timestamps(args.log_timestamps)
        .with_ansi(!args.no_color && io::stderr().is_terminal());
    if args.profile {
        // Step timings are reported at info
        config = config.with_min_level(Level::INFO);
    }
    config
}

fn run(args: &Args) -> Result<i32> {
    let mut registry = TemplateRegistry::new()?;

    if args.show_templates {
        show_templates(&registry);
        return Ok(EXIT_COMPLIANT);
    }

    let input = args
        .input
        .as_deref()
        .context("no input manuscript given")?;

    let rules = load_rules(args, &mut registry)?;
    let validator_config = load_validator_config(args)?;
    let processor = ManuscriptProcessor::with_config(rules, validator_config)?
        .with_profiling(args.profile);

    let submission = check_manuscript(&processor, input)?;

    match args.format {
        ReportFormat::Text => print_text_report(&submission, processor.validator().rules()),
        ReportFormat::Json => println!("{}", submission.to_json()?),
    }

    if !args.no_write {
        let artifact = match args.format {
            ReportFormat::Text => ReportArtifact::from_report(&submission.report),
            ReportFormat::Json => ReportArtifact::json(&submission)?,
        };
        let path = write_artifact(&artifact, args.output.as_deref())?;
        eprintln!("💾 Report saved to: {} ({})", path.display(), artifact.mime_type);
    }

    Ok(if submission.report.is_compliant() {
        EXIT_COMPLIANT
    } else {
        EXIT_NON_COMPLIANT
    })
}

fn load_rules(args: &Args, registry: &mut TemplateRegistry) -> Result<RuleSet> {
    let rules = match &args.config {
        Some(path) => registry
            .load_template_from_file(path)
            .with_context(|| format!("failed to load rule set from {}", path.display()))?,
        None => registry.get(&args.template)?,
    };
    Ok(rules.clone())
}

fn load_validator_config(args: &Args) -> Result<ValidatorConfig> {
    let mut config = match &args.validator_config {
        Some(path) => ValidatorConfig::load_from_file(path)
            .with_context(|| format!("failed to load validator config from {}", path.display()))?,
        None => ValidatorConfig::default(),
    };
    if args.check_order {
        config.checks.section_order = true;
    }
    Ok(config)
}

fn check_manuscript(processor: &ManuscriptProcessor, input: &Path) -> Result<ProcessedSubmission> {
    let source = input.display().to_string();
    let format =
        DocumentFormat::from_path(input).with_context(|| format!("could not check {source}"))?;
    let bytes = fs::read(input).with_context(|| format!("failed to read {source}"))?;

    processor
        .process_bytes(&bytes, format.extension(), Some(&source))
        .with_context(|| format!("could not check {source}"))
}

/// Write to `output`, or into it when it is an existing directory. Without
/// `output` the artifact's own file name is used in the working directory.
fn write_artifact(artifact: &ReportArtifact, output: Option<&Path>) -> Result<PathBuf> {
    let path = match output {
        Some(dir) if dir.is_dir() => {
            return artifact
                .write_to_dir(dir)
                .with_context(|| format!("failed to write report into {}", dir.display()));
        }
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&artifact.file_name),
    };
    artifact
        .write_to(&path)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(path)
}

fn print_text_report(submission: &ProcessedSubmission, rules: &RuleSet) {
    let report = &submission.report;
    println!("📋 Template: {} ({})", rules.name, rules.journal);
    println!();
    println!("{}", render_text(report));
    println!();
    println!(
        "📊 {} passed, {} failed",
        report.passed_count(),
        report.failed_count()
    );

    println!();
    println!("📝 Formatting guidelines (not checked automatically):");
    for line in rules.formatting.advisory_lines() {
        println!("   - {line}");
    }
}

fn show_templates(registry: &TemplateRegistry) {
    println!("📋 Available templates:");
    for name in registry.names() {
        if let Ok(rules) = registry.get(name) {
            println!(
                "  {:<12} {} (abstract {} words, {} keywords, {} sections)",
                name,
                rules.journal,
                rules.abstract_words,
                rules.keywords,
                rules.required_sections.len()
            );
        }
    }

    println!("\n📝 Usage Examples:");
    println!("  manucheck paper.docx");
    println!("  manucheck paper.pdf --check-order -o reports/paper.txt");
    println!("  manucheck paper.md -c my_journal.yaml -f json --no-write");
}
