use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use sagescore::models::EvaluationKind;
use sagescore::report::{render_business_markdown, render_innovation_text, render_social_text};
use sagescore::{
    provider_from_config, BusinessResearcher, Config, EvaluationConfig, EvaluationPipeline,
    EvaluationSummary, GitHubClient, LLMProvider, RepoFetcher, SerperClient, Storage,
};

#[derive(Parser, Debug)]
#[command(name = "sagescore")]
#[command(version)]
#[command(about = "Score GitHub projects for innovation and social value, and research business plans")]
struct Args {
    /// Database path for the repository cache and evaluation history
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assess a repository's technical and scenario innovation
    Innovation {
        /// GitHub repository URL
        url: String,
        #[command(flatten)]
        opts: EvalOptions,
    },
    /// Assess a repository's social value and ethics
    Social {
        /// GitHub repository URL
        url: String,
        #[command(flatten)]
        opts: EvalOptions,
    },
    /// Evaluate every repository URL listed in a file, one per line
    Batch {
        file: String,
        #[arg(long, value_enum, default_value = "innovation")]
        kind: KindArg,
        #[command(flatten)]
        opts: EvalOptions,
    },
    /// Research the business potential of a plan (text or Markdown)
    Bp {
        file: String,
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show recent evaluations
    History {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Drop every cached repository snapshot
    ClearCache,
}

#[derive(clap::Args, Debug)]
struct EvalOptions {
    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Rewrite the report with the configured LLM
    #[arg(long)]
    llm: bool,

    /// Ignore cached repository data
    #[arg(long)]
    no_cache: bool,

    /// Dimension weight override, e.g. --weight tech_implementation=30
    #[arg(long = "weight", value_name = "KEY=VALUE")]
    weights: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Innovation,
    Social,
}

impl From<KindArg> for EvaluationKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Innovation => EvaluationKind::Innovation,
            KindArg::Social => EvaluationKind::SocialValue,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sagescore=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;
    let database = args.database.clone().unwrap_or_else(|| config.database_path.clone());

    run(args.command, &config, &database).await
}

async fn run(command: Command, config: &Config, database: &str) -> anyhow::Result<()> {
    match command {
        Command::Innovation { url, opts } => {
            let pipeline = build_pipeline(config, database, &opts)?;
            let (report, markdown) = pipeline.evaluate_innovation(&url).await?;
            let output = match opts.format {
                OutputFormat::Json => serde_json::to_string_pretty(&report)?,
                OutputFormat::Markdown => markdown,
                OutputFormat::Text => render_innovation_text(&report),
            };
            write_output(&output, opts.output.as_deref())
        }
        Command::Social { url, opts } => {
            let pipeline = build_pipeline(config, database, &opts)?;
            let (report, markdown) = pipeline.evaluate_social(&url).await?;
            let output = match opts.format {
                OutputFormat::Json => serde_json::to_string_pretty(&report)?,
                OutputFormat::Markdown => markdown,
                OutputFormat::Text => render_social_text(&report),
            };
            write_output(&output, opts.output.as_deref())
        }
        Command::Batch { file, kind, opts } => {
            let urls = read_url_list(&file)?;
            if urls.is_empty() {
                anyhow::bail!("No repository URLs found in {}", file);
            }
            let pipeline = build_pipeline(config, database, &opts)?;
            let mut results = pipeline.evaluate_batch(&urls, kind.into()).await;
            results.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

            let output = match opts.format {
                OutputFormat::Json => serde_json::to_string_pretty(&results)?,
                OutputFormat::Markdown => batch_markdown(&results),
                OutputFormat::Text => batch_text(&results),
            };
            write_output(&output, opts.output.as_deref())
        }
        Command::Bp { file, format, output } => {
            let text = std::fs::read_to_string(&file)?;
            let llm = provider_from_config(config)?;
            let search = SerperClient::new(config.require_serper_key()?)?;
            let researcher = BusinessResearcher::new(llm, search);

            tracing::info!("Analyzing business plan: {}", file);
            let report = researcher.analyze(&text).await?;
            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&report)?,
                OutputFormat::Markdown | OutputFormat::Text => render_business_markdown(&report),
            };
            write_output(&rendered, output.as_deref())
        }
        Command::History { limit } => {
            let storage = Storage::new(database)?;
            let evaluations = storage.list_evaluations(limit)?;
            if evaluations.is_empty() {
                println!("No evaluations recorded yet.");
                return Ok(());
            }
            println!("{:<5} {:<40} {:<13} {:>6}  {:<30} {}", "ID", "Repository", "Kind", "Score", "Level", "Date");
            for e in evaluations {
                println!(
                    "{:<5} {:<40} {:<13} {:>6.1}  {:<30} {}",
                    e.id,
                    e.repo_full_name,
                    e.kind,
                    e.total_score,
                    e.level,
                    e.created_at.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }
        Command::ClearCache => {
            let storage = Storage::new(database)?;
            let removed = storage.clear_cache()?;
            println!("Removed {} cached repositories", removed);
            Ok(())
        }
    }
}

fn build_pipeline(config: &Config, database: &str, opts: &EvalOptions) -> anyhow::Result<EvaluationPipeline> {
    let storage = Arc::new(Storage::new(database)?);
    let github = GitHubClient::new(config.github_token.as_deref(), config.requests_per_minute)?;
    let fetcher = RepoFetcher::new(github, storage.clone(), config.cache_ttl_secs);

    let mut eval_config = EvaluationConfig::from(config);
    eval_config.use_cache = !opts.no_cache;
    eval_config.use_llm = opts.llm;

    // Each override names a dimension of exactly one scorer
    let (innovation, social): (Vec<&String>, Vec<&String>) = opts.weights.iter().partition(|w| {
        w.split_once('=')
            .map(|(key, _)| {
                sagescore::scoring::weights::spec(EvaluationKind::Innovation, key.trim()).is_some()
            })
            .unwrap_or(true)
    });
    eval_config.innovation_weights.apply_overrides(&innovation)?;
    eval_config.social_weights.apply_overrides(&social)?;

    let llm: Option<Arc<dyn LLMProvider>> = if opts.llm {
        Some(provider_from_config(config)?)
    } else {
        None
    };

    Ok(EvaluationPipeline::new(fetcher, llm, storage, eval_config))
}

fn read_url_list(path: &str) -> anyhow::Result<Vec<String>> {
    Ok(std::fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn write_output(output: &str, path: Option<&str>) -> anyhow::Result<()> {
    if let Some(path) = path {
        std::fs::write(path, output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn batch_text(results: &[EvaluationSummary]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n=== Batch Evaluation ({} repositories) ===\n\n", results.len()));
    for (rank, r) in results.iter().enumerate() {
        output.push_str(&format!(
            "{:>3}. {:<40} {:>6.1}  {}\n",
            rank + 1,
            r.repo_full_name,
            r.total_score,
            r.level
        ));
    }
    output
}

fn batch_markdown(results: &[EvaluationSummary]) -> String {
    let mut output = String::new();
    output.push_str("# Batch Evaluation\n\n");
    output.push_str("| Rank | Repository | Score | Level |\n|------|------------|-------|-------|\n");
    for (rank, r) in results.iter().enumerate() {
        output.push_str(&format!(
            "| {} | [{}]({}) | {:.1} | {} |\n",
            rank + 1,
            r.repo_full_name,
            r.repo_url,
            r.total_score,
            r.level
        ));
    }
    for r in results {
        output.push_str(&format!("\n---\n\n{}\n", r.markdown));
    }
    output
}
