//! iobkit command-line tool
//!
//! Inspects, splits, retags and exports IOB tag files, and runs the
//! filesystem-side corpus steps.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use iobkit_core::{
    convert_coded, load_coded_jsonl, write_jsonl, AnnotationDocument, MatchMode, Rand64, TagStore,
};
use iobkit_corpus::{
    load_index, load_reference_counts, parse_manuscript_file_list, parse_oa_file_list, resolve,
    IdentifierSet, TopicFilter, TopicFilterConfig,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "iobkit")]
#[command(about = "Prepare IOB-tagged corpora for NER training")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (overridden by IOBKIT_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Seed for random sampling
    #[arg(long, env = "IOBKIT_SEED", default_value_t = 42, global = true)]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Print tag counts, and optionally entity value counts
    Stats {
        input: PathBuf,
        /// Entity type whose surface strings are tallied
        #[arg(short, long)]
        entity: Option<String>,
        /// Ignore B-/I- boundaries when tallying (adjacent entities merge)
        #[arg(long, requires = "entity")]
        conflated: bool,
    },
    /// Split into training and validation files
    Split {
        input: PathBuf,
        #[command(flatten)]
        mode: SplitMode,
        /// Training output (the drawn sample with --sample)
        #[arg(long)]
        train_out: PathBuf,
        /// Validation output (the remainder with --sample)
        #[arg(long)]
        valid_out: PathBuf,
    },
    /// Write k contiguous cross-validation folds
    Kfold {
        input: PathBuf,
        /// Number of folds; values below 2 write nothing
        #[arg(short, long, allow_negative_numbers = true)]
        k: i64,
        #[arg(short, long)]
        out_dir: PathBuf,
    },
    /// Fold one tag category into another
    Merge {
        input: PathBuf,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Exact)]
        mode: ModeArg,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Reset a tag category to O
    Remove {
        input: PathBuf,
        #[arg(long)]
        tag: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Exact)]
        mode: ModeArg,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Append span annotation documents to a JSONL file
    Annotate {
        /// Tag files; the file stem is used as the document source
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory with a second tag set for the same files
        #[arg(long)]
        second_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Convert an integer-coded JSONL dataset to a tag file
    Convert {
        input: PathBuf,
        /// Entity type for codes 1 (B-) and 2 (I-)
        #[arg(long)]
        tag_name: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Resolve identifiers to accessible full-text records
    Resolve {
        /// Newline-separated identifier list
        #[arg(long)]
        ids: PathBuf,
        /// Open-access file list
        #[arg(long)]
        oa_list: Option<PathBuf>,
        /// Author-manuscript file lists
        #[arg(long)]
        manuscripts: Vec<PathBuf>,
        /// Where to write accessible accessions
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Copy on-topic, well-referenced parsed articles
    FilterTopics {
        #[arg(long)]
        parsed_dir: PathBuf,
        #[arg(long)]
        out_dir: PathBuf,
        /// Reference count table (name, count)
        #[arg(long)]
        ref_counts: PathBuf,
        /// JSON filter configuration
        #[arg(long, env = "IOBKIT_FILTER_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SplitMode {
    /// Fraction of sentences for validation, taken from the start
    #[arg(long, allow_negative_numbers = true)]
    fraction: Option<f64>,
    /// Number of sentences for training, taken from the start
    #[arg(long, allow_negative_numbers = true)]
    count: Option<i64>,
    /// Number of sentences to draw at random for training
    #[arg(long, allow_negative_numbers = true)]
    sample: Option<i64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Compare the entity type exactly
    Exact,
    /// Match anywhere in the tag literal
    Substring,
}

impl From<ModeArg> for MatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Exact => MatchMode::ExactType,
            ModeArg::Substring => MatchMode::Substring,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("IOBKIT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<TagStore> {
    TagStore::load(path).with_context(|| format!("failed to load {}", path.display()))
}

fn save(store: &TagStore, path: &Path) -> Result<()> {
    store
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), sentences = store.len(), "wrote tag file");
    Ok(())
}

/// Sizes at or below zero all take the no-op warning path.
fn size_arg(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

fn run_stats(input: &Path, entity: Option<&str>, conflated: bool) -> Result<()> {
    let store = load(input)?;
    println!(
        "{} sentences, {} tokens",
        store.len(),
        store.token_count()
    );
    for (tag, count) in store.tag_stats() {
        println!("{tag}\t{count}");
    }

    if let Some(entity) = entity {
        let values = if conflated {
            store.aggregate_entity_values_conflated(entity)
        } else {
            store.aggregate_entity_values(entity)
        };
        let mut values: Vec<_> = values.into_iter().collect();
        values.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        println!();
        for (value, count) in values {
            println!("{value}\t{count}");
        }
    }
    Ok(())
}

fn run_split(
    input: &Path,
    mode: &SplitMode,
    seed: u64,
    train_out: &Path,
    valid_out: &Path,
) -> Result<()> {
    let store = load(input)?;

    let (train, valid) = if let Some(fraction) = mode.fraction {
        let split = store.split_by_ratio(fraction);
        (split.train, split.validation)
    } else if let Some(count) = mode.count {
        let split = store.split_by_count(size_arg(count));
        (split.train, split.validation)
    } else if let Some(k) = mode.sample {
        let mut rng = Rand64::new(u128::from(seed));
        let sample = store.random_sample(size_arg(k), &mut rng)?;
        (sample.sample, sample.remainder)
    } else {
        bail!("one of --fraction, --count or --sample is required");
    };

    save(&train, train_out)?;
    save(&valid, valid_out)?;
    Ok(())
}

fn run_kfold(input: &Path, k: i64, out_dir: &Path) -> Result<()> {
    let store = load(input)?;
    let folds = store.make_k_folds(size_arg(k));
    if folds.folds.is_empty() {
        return Ok(());
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    for fold in &folds.folds {
        save(&fold.train, &out_dir.join(format!("fold_{}_train.tsv", fold.index)))?;
        save(&fold.validation, &out_dir.join(format!("fold_{}_valid.tsv", fold.index)))?;
    }
    Ok(())
}

fn document_source(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn annotate_one(input: &Path, second_dir: Option<&Path>) -> Result<AnnotationDocument> {
    let store = load(input)?;
    let source = document_source(input);

    let doc = match second_dir {
        Some(dir) => {
            let file_name = input
                .file_name()
                .with_context(|| format!("{} has no file name", input.display()))?;
            let other = load(&dir.join(file_name))?;
            store.to_annotation_document_two_tag_sets(&other, &source)?
        }
        None => store.to_annotation_document(&source)?,
    };
    Ok(doc)
}

fn run_annotate(inputs: &[PathBuf], second_dir: Option<&Path>, output: &Path) -> Result<()> {
    let mut docs = Vec::with_capacity(inputs.len());
    let mut skipped = 0usize;

    for input in inputs {
        match annotate_one(input, second_dir) {
            Ok(doc) => docs.push(doc),
            Err(e) => {
                warn!(input = %input.display(), "skipping record: {e:#}");
                skipped += 1;
            }
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output)
        .with_context(|| format!("failed to open {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    write_jsonl(&mut writer, &docs)?;
    writer.flush()?;

    info!(written = docs.len(), skipped, output = %output.display(), "annotation documents appended");
    Ok(())
}

fn run_convert(input: &Path, tag_name: &str, output: &Path) -> Result<()> {
    let examples = load_coded_jsonl(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let conversion = convert_coded(&examples, tag_name)?;
    if !conversion.anomalies.is_empty() {
        warn!(count = conversion.anomalies.len(), "tokens with strange tag codes were dropped");
    }
    save(&conversion.store, output)
}

fn run_resolve(
    ids: &Path,
    oa_list: Option<&Path>,
    manuscripts: &[PathBuf],
    output: Option<&Path>,
) -> Result<()> {
    let wanted = IdentifierSet::load(ids)
        .with_context(|| format!("failed to read {}", ids.display()))?;

    let mut entries = Vec::new();
    if let Some(path) = oa_list {
        entries.extend(load_index(path, parse_oa_file_list)?);
    }
    for path in manuscripts {
        entries.extend(load_index(path, parse_manuscript_file_list)?);
    }

    let resolution = resolve(&wanted, entries);
    println!("total wanted: {}", wanted.len());
    println!("fully accessible: {}", resolution.accessible.len());
    println!("missing: {}", resolution.missing.len());

    if let Some(path) = output {
        let mut writer = BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        );
        for entry in &resolution.accessible {
            writeln!(writer, "{}\t{}\t{}", entry.accession, entry.pmid, entry.archive_path)?;
        }
        writer.flush()?;
    }
    Ok(())
}

fn run_filter_topics(
    parsed_dir: &Path,
    out_dir: &Path,
    ref_counts: &Path,
    config: Option<&Path>,
) -> Result<()> {
    let config = match config {
        Some(path) => TopicFilterConfig::from_json_file(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => TopicFilterConfig::default(),
    };
    let counts = load_reference_counts(ref_counts)
        .with_context(|| format!("failed to read {}", ref_counts.display()))?;

    let report = TopicFilter::new(config).filter_dir(parsed_dir, out_dir, &counts)?;
    println!(
        "scanned {}, copied {}, off topic {}, too few references {}",
        report.scanned,
        report.copied.len(),
        report.off_topic,
        report.too_few_references
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Stats {
            input,
            entity,
            conflated,
        } => run_stats(&input, entity.as_deref(), conflated),
        Commands::Split {
            input,
            mode,
            train_out,
            valid_out,
        } => run_split(&input, &mode, cli.seed, &train_out, &valid_out),
        Commands::Kfold { input, k, out_dir } => run_kfold(&input, k, &out_dir),
        Commands::Merge {
            input,
            from,
            to,
            mode,
            output,
        } => save(&load(&input)?.merge_tags(&from, &to, mode.into()), &output),
        Commands::Remove {
            input,
            tag,
            mode,
            output,
        } => save(&load(&input)?.remove_tag_type(&tag, mode.into()), &output),
        Commands::Annotate {
            inputs,
            second_dir,
            output,
        } => run_annotate(&inputs, second_dir.as_deref(), &output),
        Commands::Convert {
            input,
            tag_name,
            output,
        } => run_convert(&input, &tag_name, &output),
        Commands::Resolve {
            ids,
            oa_list,
            manuscripts,
            output,
        } => run_resolve(&ids, oa_list.as_deref(), &manuscripts, output.as_deref()),
        Commands::FilterTopics {
            parsed_dir,
            out_dir,
            ref_counts,
            config,
        } => run_filter_topics(&parsed_dir, &out_dir, &ref_counts, config.as_deref()),
    }
}
