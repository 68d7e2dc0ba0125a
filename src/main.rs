use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use homedir::my_home;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use feedback_taxonomy::classifier::Classifier;
use feedback_taxonomy::config::{Config, ProviderKind};
use feedback_taxonomy::frequency::FrequencyTable;
use feedback_taxonomy::orchestrator::{import_taxonomy, Orchestrator};
use feedback_taxonomy::rerank::Reranker;
use feedback_taxonomy::semantic::{
    enrich_for_embedding, enrich_problem_for_embedding, expand_query, lookup_context,
    EmbeddingProvider, OpenAiEmbeddings,
};
use feedback_taxonomy::storage::LocalDocumentStore;
use feedback_taxonomy::taxonomy::RawTaxonomy;
use feedback_taxonomy::validation::TaxonomyValidator;
use feedback_taxonomy::version::check_embeddings_status;

mod cli;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn base_path(data_dir: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = data_dir {
        return Ok(dir);
    }
    if let Ok(dir) = std::env::var("TAXO_BASE_PATH") {
        return Ok(PathBuf::from(dir));
    }
    let home = my_home()
        .context("Could not determine home directory")?
        .context("Home directory path is empty")?;
    Ok(home.join(".local").join("share").join("taxo"))
}

fn build_provider(
    config: &Config,
    api_key: Option<String>,
    base_path: &Path,
) -> anyhow::Result<Box<dyn EmbeddingProvider>> {
    match config.embedding.provider {
        ProviderKind::Openai => {
            let api_key = api_key
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .unwrap_or_default();
            let provider = OpenAiEmbeddings::new(
                &config.embedding.api_url,
                &api_key,
                &config.embedding.model,
                config.embedding.request_timeout_secs,
            )?;
            Ok(Box::new(provider))
        }
        #[cfg(feature = "local-embeddings")]
        ProviderKind::Local => {
            let model = feedback_taxonomy::semantic::LocalEmbeddingModel::new(
                &config.embedding.local_model,
                base_path.to_path_buf(),
            )?;
            Ok(Box::new(model))
        }
        #[cfg(not(feature = "local-embeddings"))]
        ProviderKind::Local => {
            let _ = base_path;
            bail!("local embeddings require the `local-embeddings` feature")
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = cli::Args::parse();

    let base_path = base_path(args.data_dir)?;
    let config = Config::load_with(&base_path)?;
    let store = LocalDocumentStore::new(&base_path)?;

    match args.command {
        cli::Command::Enrich { label, problem } => {
            let enriched = if problem {
                enrich_problem_for_embedding(&label)
            } else {
                enrich_for_embedding(&label)
            };
            let authored = !problem && lookup_context(&label).is_some_and(|c| c.is_authored());
            print_json(&json!({
                "label": label,
                "problem": problem,
                "authored": authored,
                "enriched": enriched,
            }))
        }

        cli::Command::Expand { text } => print_json(&json!({
            "text": text,
            "expanded": expand_query(&text),
        })),

        cli::Command::Validate { label, department } => {
            let validator = TaxonomyValidator::new();
            print_json(&json!({
                "validation": validator.validate(&label, &department),
                "auto_correction": validator.auto_correct_department(&label, &department),
            }))
        }

        cli::Command::Classify {
            text,
            department,
            confirm,
            provider,
        } => {
            let _span = tracing::info_span!("classify", department = department.as_deref()).entered();
            let provider = build_provider(&config, provider.api_key, &base_path)?;
            let frequencies = Arc::new(FrequencyTable::load(&store)?);
            let classifier = Classifier::load(
                &store,
                provider,
                frequencies.clone(),
                config.reranking.weights,
                config.recall_settings(),
            )?;

            let classification = classifier.classify(&text, department.as_deref())?;

            if let Some(label) = confirm {
                if !classification.keywords.iter().any(|k| k.label == label) {
                    log::warn!("Confirming '{}', which was not among the ranked keywords", label);
                }
                classifier.confirm(&label);
                frequencies.save(&store)?;
            }

            print_json(&classification)
        }

        cli::Command::Generate { force, provider } => {
            let _span = tracing::info_span!("generate", force).entered();
            let provider = build_provider(&config, provider.api_key, &base_path)?;
            let validator = TaxonomyValidator::new();

            let bar = ProgressBar::new(100);
            bar.set_style(ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")?);
            let progress = |step: &str, percent: u8| {
                bar.set_position(u64::from(percent));
                bar.set_message(step.to_string());
            };

            let response = Orchestrator::new(&store, provider.as_ref(), &validator)
                .with_options(config.generation_options())
                .with_progress(&progress)
                .generate_all_embeddings(force);
            bar.finish_and_clear();

            print_json(&response)?;
            if !response.success {
                bail!(response.error.unwrap_or_default());
            }
            Ok(())
        }

        cli::Command::Import { file } => {
            let taxonomy = match file {
                Some(path) => {
                    let data = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    serde_json::from_str::<RawTaxonomy>(&data)
                        .with_context(|| format!("{} is not a taxonomy file", path.display()))?
                }
                None => RawTaxonomy::builtin(),
            };
            import_taxonomy(&store, &taxonomy)?;
            print_json(&json!({
                "keywords": taxonomy.keywords.labels().len(),
                "problems": taxonomy.problems.len(),
                "departments": taxonomy.departments.len(),
            }))
        }

        cli::Command::Status {} => print_json(&check_embeddings_status(&store)?),

        cli::Command::Stats {} => {
            let validator = Arc::new(TaxonomyValidator::new());
            let frequencies = Arc::new(FrequencyTable::load(&store)?);
            let reranker = Reranker::new(validator.clone(), frequencies, config.reranking.weights);
            print_json(&json!({
                "mapping": validator.mapping_stats(),
                "reranking": reranker.stats(),
            }))
        }
    }
}
