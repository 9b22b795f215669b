//! Annotate command implementation

use anyhow::{Context, Result};
use clap::Args;
use glosstip_core::{
    AnnotationStats, FilterResult, FilterSettings, GlossaryStore, OccurrenceLimit, TooltipFilter,
    TriggerEvent,
};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, Document, FileReader};
use crate::output::{HtmlFormatter, JsonFormatter, OutputFormatter};
use crate::progress::ProgressReporter;

/// Arguments for the annotate command
#[derive(Debug, Args)]
pub struct AnnotateArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Glossary file (TOML or JSON)
    #[arg(short, long, value_name = "FILE", env = "GLOSSTIP_GLOSSARY")]
    pub glossary: PathBuf,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Vocabulary to annotate with
    #[arg(long, value_name = "ID")]
    pub vocabulary: Option<String>,

    /// Language of the input; terms of other languages are ignored
    #[arg(short, long, value_name = "CODE")]
    pub langcode: Option<String>,

    /// Maximum annotations per term (-1 for unlimited)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Space separated tags whose content is never annotated, e.g. "h1 div"
    #[arg(long, value_name = "TAGS")]
    pub exclude_tags: Option<String>,

    /// Event that opens the tooltips
    #[arg(long, value_enum)]
    pub trigger: Option<Trigger>,

    /// Output format (default: from config, else html)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of worker threads (default: from config, else all CPUs)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Annotated HTML, documents written in input order
    Html,
    /// JSON array with text, attachments and statistics per document
    Json,
}

impl OutputFormat {
    fn from_config(name: &str) -> Result<Self> {
        match name {
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::ConfigError(format!("unknown output format: {other}")).into()),
        }
    }
}

/// Tooltip trigger events
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Trigger {
    /// Open on click or tap
    Click,
    /// Open on hover
    Mouseover,
}

impl From<Trigger> for TriggerEvent {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Click => TriggerEvent::Click,
            Trigger::Mouseover => TriggerEvent::Mouseover,
        }
    }
}

impl AnnotateArgs {
    /// Execute the annotate command
    pub fn execute(&self) -> Result<()> {
        self.init_logging()?;

        log::info!("Starting annotation");
        log::debug!("Arguments: {:?}", self);

        let config = CliConfig::load(self.config.as_deref())?;
        let store = GlossaryStore::from_file(&self.glossary)
            .with_context(|| format!("Failed to load glossary: {}", self.glossary.display()))?;
        let settings = self.settings(&config, &store)?;

        if !settings.automatic {
            log::warn!("Automatic annotation is disabled; input is passed through unchanged");
        }

        let files = resolve_patterns(&self.input)?;
        let documents = FileReader::read_documents(&files)?;
        log::info!("Annotating {} file(s)", documents.len());

        let filter = TooltipFilter::new(settings, store).with_limits(config.performance.limits());
        let prepared = filter.prepare(self.langcode.as_deref())?;
        if let Some(engine) = prepared.engine() {
            log::debug!(
                "Compiled {} glossary term(s), excluding tags {:?}",
                engine.index().len(),
                prepared.exclusion_config().excluded_tags
            );
        }

        let threads = self.threads.unwrap_or_else(|| config.performance.threads());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to build worker pool")?;

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(documents.len() as u64);

        let results = pool.install(|| {
            documents
                .par_iter()
                .map(|document| -> Result<FilterResult> {
                    let result = prepared.apply(&document.text).map_err(|e| {
                        CliError::AnnotationError {
                            path: document.path.display().to_string(),
                            message: e.to_string(),
                        }
                    })?;
                    progress.file_completed(&document.path.display().to_string());
                    Ok(result)
                })
                .collect::<Result<Vec<_>>>()
        });
        progress.finish();
        let results = results?;

        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_config(&config.output.default_format)?,
        };
        self.write_output(format, config.output.pretty_json, &documents, &results)?;

        let mut total = AnnotationStats::default();
        for result in &results {
            total.merge(&result.stats);
        }
        log::info!(
            "Annotated {} of {} matches ({} capped, {} guarded)",
            total.annotated,
            total.matches_found,
            total.limited,
            total.guarded
        );

        Ok(())
    }

    /// Merge config file settings with command-line overrides
    fn settings(&self, config: &CliConfig, store: &GlossaryStore) -> Result<FilterSettings> {
        let mut settings = config.filter.clone();

        if let Some(vocabulary) = &self.vocabulary {
            settings.vocabulary = Some(vocabulary.clone());
        }
        if let Some(limit) = self.limit {
            settings.occurrence_limit = OccurrenceLimit::try_from(limit)?;
        }
        if let Some(tags) = &self.exclude_tags {
            settings.exclude_tags = tags.clone();
        }
        if let Some(trigger) = self.trigger {
            settings.trigger_event = trigger.into();
        }

        let configured = settings.vocabulary().map(str::to_string);
        match configured.as_deref() {
            Some(id) if store.vocabulary(id).is_none() => {
                return Err(CliError::VocabularyNotFound(id.to_string()).into());
            }
            Some(_) => {}
            None => match store.vocabularies() {
                [only] => {
                    log::info!("Using vocabulary '{}'", only.id);
                    settings.vocabulary = Some(only.id.clone());
                }
                [] => log::warn!("Glossary has no vocabularies; nothing to annotate"),
                many => {
                    return Err(CliError::AmbiguousVocabulary(
                        many.iter().map(|v| v.id.clone()).collect(),
                    )
                    .into());
                }
            },
        }

        Ok(settings)
    }

    fn write_output(
        &self,
        format: OutputFormat,
        pretty_json: bool,
        documents: &[Document],
        results: &[FilterResult],
    ) -> Result<()> {
        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?)),
            None => Box::new(io::stdout()),
        };

        let mut formatter: Box<dyn OutputFormatter> = match format {
            OutputFormat::Html => Box::new(HtmlFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer, pretty_json)),
        };

        for (document, result) in documents.iter().zip(results) {
            formatter.format_document(&document.path, result)?;
        }
        formatter.finish()
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A logger may already be installed when running inside tests
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }

        Ok(())
    }
}
