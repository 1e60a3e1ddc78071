//! data.gov.il resolver command line
//!
//! Loads settings (`config/default`, `config/{env}`, `DATAGOV__*`), the
//! corpus and dictionaries, then answers one command and prints JSON.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use datagov_config::{load_settings, DomainData, Settings};
use datagov_retrieval::{rephrase, ResourceResolver};
use datagov_text_processing::extract_field_intents;

#[derive(Parser, Debug)]
#[command(name = "datagov", version, about = "Resolve questions to data.gov.il resources")]
struct Cli {
    /// Configuration environment (loads config/<env>)
    #[arg(long, env = "DATAGOV_ENV")]
    env: Option<String>,

    /// Corpus file, overriding data.corpus_path
    #[arg(long)]
    corpus: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank resources for a query
    Resolve {
        query: String,
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
        /// Retry with rephrasings when the best score is low
        #[arg(long)]
        fallback: bool,
    },
    /// Show subject and location tokens of a query
    Decompose { query: String },
    /// Alternative phrasings tried by the fallback
    Rephrase { query: String },
    /// Map requested fields onto a resource schema
    MatchFields {
        resource_id: String,
        /// Field intents, e.g. `phone`, `כתובת`
        #[arg(short, long = "intent")]
        intents: Vec<String>,
        /// Derive intents from a natural-language query instead
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show a resource and its owning dataset
    Resource { resource_id: String },
}

#[derive(Serialize)]
struct ResourceView<'a> {
    dataset_id: &'a str,
    dataset_title: &'a str,
    organization: &'a str,
    tags: &'a [String],
    resource_id: &'a str,
    resource_title: &'a str,
    format: String,
    has_schema: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match load_settings(cli.env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };
    if let Some(corpus) = &cli.corpus {
        settings.data.corpus_path = corpus.clone();
    }

    init_tracing(&settings);
    tracing::debug!(
        environment = ?settings.environment,
        corpus = %settings.data.corpus_path,
        "Configuration loaded"
    );

    let data = DomainData::load(&settings.data)
        .with_context(|| format!("loading domain data from {}", settings.data.corpus_path))?;
    let resolver = ResourceResolver::from_domain(data, &settings);

    match cli.command {
        Command::Resolve {
            query,
            limit,
            fallback,
        } => {
            if fallback {
                print_json(&resolver.resolve_with_fallback(&query, limit))
            } else {
                print_json(&resolver.resolve(&query, limit))
            }
        }
        Command::Decompose { query } => print_json(&resolver.decompose(&query)),
        Command::Rephrase { query } => {
            let alternatives = rephrase(
                &query,
                resolver.gazetteer(),
                resolver.synonyms(),
                resolver.weights().max_rephrasings,
            );
            print_json(&alternatives)
        }
        Command::MatchFields {
            resource_id,
            intents,
            query,
        } => {
            let intents = match query {
                Some(query) => extract_field_intents(&query),
                None => intents,
            };
            if intents.is_empty() {
                bail!("no field intents given; pass --intent or --query");
            }
            if resolver.resource(&resource_id).is_none() {
                bail!("unknown resource {}", resource_id);
            }
            print_json(&resolver.match_fields(&resource_id, &intents))
        }
        Command::Resource { resource_id } => {
            let (dataset, resource) = resolver
                .resource(&resource_id)
                .with_context(|| format!("unknown resource {}", resource_id))?;
            print_json(&ResourceView {
                dataset_id: &dataset.id,
                dataset_title: dataset.display_title(),
                organization: &dataset.organization,
                tags: &dataset.tags,
                resource_id: &resource.id,
                resource_title: resource.display_title(),
                format: resource.format.to_string(),
                has_schema: resolver.schemas().get(&resource.id).is_some(),
            })
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{}", json);
    Ok(())
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("datagov={}", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
