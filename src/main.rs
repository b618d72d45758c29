use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashSet;
use std::io::{self, Read};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use recipe_lexicon::config::{LexiconConfig, LogFormat};
use recipe_lexicon::db::{self, PgStore};
use recipe_lexicon::ingredient_model::Locale;
use recipe_lexicon::ingredient_parser::{parse, parse_ingredient_block};
use recipe_lexicon::lexicon::LexiconMatcher;
use recipe_lexicon::linkage::{IngredientStore, LinkageJob};
use recipe_lexicon::ranker::{rank_with_options, select_by_slugs};

#[derive(Parser)]
#[command(name = "recipe-lexicon")]
#[command(about = "Ingredient lexicon and recipe matching tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse ingredient lines; reads a whole ingredient block from stdin when no line is given
    Parse {
        lines: Vec<String>,
    },

    /// Detect canonical ingredients in a text
    Detect {
        #[arg(long, default_value = "fr")]
        locale: Locale,

        text: String,
    },

    /// Link every stored recipe to the canonical ingredients it mentions
    Link,

    /// Rank stored recipes by the share of their ingredients found in the given list
    Rank {
        #[arg(required = true)]
        ingredients: Vec<String>,

        /// Drop results below this match percentage
        #[arg(long, default_value = "0")]
        min_percentage: u32,

        /// Maximum number of results, overrides LEXICON_RANK_LIMIT
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    let config = LexiconConfig::from_env().context("Invalid configuration")?;
    init_logging(config.log_format);

    match cli.command {
        Commands::Parse { lines } => run_parse(&lines)?,
        Commands::Detect { locale, text } => run_detect(&config, locale, &text)?,
        Commands::Link => run_link(&config).await?,
        Commands::Rank {
            ingredients,
            min_percentage,
            limit,
        } => run_rank(&config, &ingredients, min_percentage, limit).await?,
    }

    Ok(())
}

/// Logs go to stderr so command output on stdout stays machine-readable
fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().with_writer(io::stderr).with_target(true).json())
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .init(),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_parse(lines: &[String]) -> Result<()> {
    if lines.is_empty() {
        let mut block = String::new();
        io::stdin()
            .read_to_string(&mut block)
            .context("Failed to read ingredient block from stdin")?;
        return print_json(&parse_ingredient_block(&block));
    }

    let parsed: Vec<_> = lines.iter().map(|line| parse(line)).collect();
    print_json(&parsed)
}

fn matchers(config: &LexiconConfig) -> Result<Vec<(Locale, LexiconMatcher)>> {
    config
        .vocabularies()
        .context("Failed to load vocabularies")?
        .iter()
        .map(|vocabulary| -> Result<(Locale, LexiconMatcher)> {
            let matcher = LexiconMatcher::for_vocabulary(vocabulary, config.dedup_policy)
                .with_context(|| format!("Failed to build matcher for locale {}", vocabulary.locale))?;
            Ok((vocabulary.locale, matcher))
        })
        .collect()
}

fn run_detect(config: &LexiconConfig, locale: Locale, text: &str) -> Result<()> {
    let (_, matcher) = matchers(config)?
        .into_iter()
        .find(|(l, _)| *l == locale)
        .with_context(|| format!("Locale {} is not enabled in LEXICON_LOCALES", locale))?;

    print_json(&matcher.detect(text))
}

async fn connect(config: &LexiconConfig) -> Result<PgStore> {
    let database_url = config.require_database_url()?;
    info!("Connecting to database");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    db::init_database_schema(&pool).await?;

    Ok(PgStore::new(pool))
}

async fn run_link(config: &LexiconConfig) -> Result<()> {
    let store = connect(config).await?;
    let recipes = db::list_recipe_texts(store.pool(), &config.locales).await?;

    let mut job = LinkageJob::new(store);
    for (locale, matcher) in matchers(config)? {
        job = job.with_matcher(locale, matcher);
    }

    let report = job.run(&recipes).await;
    print_json(&report)
}

async fn run_rank(
    config: &LexiconConfig,
    ingredients: &[String],
    min_percentage: u32,
    limit: Option<usize>,
) -> Result<()> {
    let store = connect(config).await?;

    let selected: HashSet<_> = select_by_slugs(ingredients, &store.ingredients().await?);
    if selected.len() < ingredients.len() {
        info!(
            requested = ingredients.len(),
            known = selected.len(),
            "Some ingredients are not in the lexicon"
        );
    }

    let mut options = config.rank_options();
    options.min_match_percentage = min_percentage;
    if limit.is_some() {
        options.limit = limit;
    }

    let results = rank_with_options(&selected, &store.links().await?, &options);
    print_json(&results)
}
