use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use rs_bard_core::corpus::{CorpusProvider, FileCorpus};
use rs_bard_core::model::generator::{generate_batch, generate_guaranteed};
use rs_bard_core::model::sample_params::SampleParams;
use rs_bard_core::model::text_model::TextModel;
use rs_bard_core::tag::HeuristicTagger;
use rs_bard_core::tokenizer::{PosTokenizer, Tokenizer, WordTokenizer};

/// Character cap for the short-sentence batches.
const SHORT_CHARS: usize = 100;

/// Command-line options for the demo batch run.
#[derive(Parser)]
#[command(about = "Generate pastiche sentences from literary corpora")]
struct Options {
    /// Corpus text files; all of them feed one training set
    #[arg(required = true)]
    corpus: Vec<PathBuf>,

    /// Chain order (window width in tokens)
    #[arg(long, default_value_t = 3)]
    order: usize,

    /// Sentences per batch
    #[arg(long, default_value_t = 3)]
    count: usize,

    /// Attempt budget per sentence
    #[arg(long, default_value_t = 100)]
    max_tries: usize,

    /// Seed for reproducible output (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the generated report files
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let options = Options::parse();

    // Gather the cleaned sentences of every corpus file into one training set
    let mut sentences = Vec::new();
    for path in &options.corpus {
        let loaded = FileCorpus::new(path).load()?;
        info!("{}: {} sentences", path.display(), loaded.len());
        sentences.extend(loaded);
    }

    // A fixed seed replays the exact same batches
    let mut rng = match options.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    // Train both variants over the same sentences:
    // 'word' chains plain surface words,
    // 'pos' chains word-plus-role composites for sharper transitions
    let word_model = TextModel::train(&sentences, options.order, WordTokenizer)?;
    let pos_model = TextModel::train(
        &sentences,
        options.order,
        PosTokenizer::new(HeuristicTagger::new()),
    )?;

    let basic_report = run_batches("BASIC MARKOV GENERATION", &word_model, &options, &mut rng)?;
    let advanced_report = run_batches("GRAMMAR-AWARE GENERATION", &pos_model, &options, &mut rng)?;

    println!("{}", basic_report);
    println!();
    println!("{}", advanced_report);

    // Keep a copy of both reports next to each other
    fs::create_dir_all(&options.output_dir)?;
    fs::write(options.output_dir.join("basic_generated.txt"), &basic_report)?;
    fs::write(options.output_dir.join("advanced_generated.txt"), &advanced_report)?;

    Ok(())
}

/// Builds the report for one model: a guaranteed batch, then a short batch.
fn run_batches<T: Tokenizer, R: Rng>(
    title: &str,
    model: &TextModel<T>,
    options: &Options,
    rng: &mut R,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut lines = vec![format!("=== {} ===", title)];

    // Full-length sentences through the fallback cascade
    lines.push(format!("{} random sentences:", options.count));
    let batch = generate_batch(model, options.count, options.max_tries, rng)?;
    for (i, slot) in batch.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, slot.as_deref().unwrap_or("(no sentence)")));
    }

    // Short sentences: try strict first, then let the cascade recover
    lines.push(String::new());
    lines.push(format!("{} short sentences (max {} chars):", options.count, SHORT_CHARS));
    let short_params = SampleParams {
        max_attempts: options.max_tries,
        require_novel: true,
        max_chars: Some(SHORT_CHARS),
    };
    for i in 0..options.count {
        let sentence = match model.sample(&short_params, rng)? {
            Some(s) => Some(s),
            None => generate_guaranteed(model, options.max_tries, rng)?,
        };
        lines.push(format!("{}. {}", i + 1, sentence.as_deref().unwrap_or("(no sentence)")));
    }

    Ok(lines.join("\n"))
}
