use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

mod extract_cmd;
mod output;

use extract_cmd::ExtractTarget;
use output::ColorMode;
use scholarpull_core::{ArticleStore, Config, SerpApiClient, config_file, fetch_and_persist};
use scholarpull_store::ArticleRepository;

/// Google Scholar author lookup - fetch a profile through SerpApi and keep its top articles
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch an author profile, print it and save its leading articles
    Show {
        /// Google Scholar author id, e.g. LSsXyncAAAAJ
        author_id: String,

        /// Number of articles to request
        #[arg(long)]
        num: Option<u32>,

        /// Article ordering: pubdate or title
        #[arg(long)]
        sort: Option<String>,

        /// Interface language
        #[arg(long)]
        hl: Option<String>,

        /// Ask SerpApi for a fresh result instead of a cached one
        #[arg(long)]
        no_cache: bool,

        /// Do not write anything to the database
        #[arg(long)]
        no_save: bool,

        /// How many leading articles to save
        #[arg(long)]
        limit: Option<usize>,

        /// Path to the article database
        #[arg(long)]
        db: Option<PathBuf>,

        /// SerpApi key (overrides SERPAPI_KEY and the config file)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// List stored articles
    List {
        /// Only articles saved for this author id
        #[arg(long)]
        author: Option<String>,

        /// Path to the article database
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Run the field extractor on a saved payload file
    Extract {
        /// Payload file, e.g. a saved SerpApi response
        file: PathBuf,

        /// `field`, `object.field`, `array[]` or `array[].field`
        path: String,

        /// Read the value as an integer
        #[arg(long)]
        int: bool,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());

    match run(cli.command, color).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = output::render_error(&mut std::io::stderr(), &format!("{:#}", e), color);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, color: ColorMode) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let mut config = config_file::resolve(&config_file::load_config(), |name| {
        std::env::var(name).ok()
    });

    match command {
        Command::Show {
            author_id,
            num,
            sort,
            hl,
            no_cache,
            no_save,
            limit,
            db,
            api_key,
        } => {
            if let Some(num) = num {
                config.num = num;
            }
            if let Some(sort) = sort {
                config.sort = sort;
            }
            if let Some(hl) = hl {
                config.hl = hl;
            }
            if no_cache {
                config.no_cache = true;
            }
            if let Some(limit) = limit {
                config.persist_limit = limit;
            }
            if let Some(db) = db {
                config.db_path = db;
            }
            if api_key.is_some() {
                config.serpapi_key = api_key;
            }
            show(&author_id, &config, no_save, color).await
        }
        Command::List { author, db } => {
            if let Some(db) = db {
                config.db_path = db;
            }
            list(author.as_deref(), &config, color)
        }
        Command::Extract { file, path, int } => extract(&file, &path, int),
    }
}

async fn show(
    author_id: &str,
    config: &Config,
    no_save: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let author_id = author_id.trim();
    if author_id.is_empty() {
        anyhow::bail!("author id must not be empty");
    }
    let Some(api_key) = config.serpapi_key.clone() else {
        anyhow::bail!(
            "no SerpApi key: set SERPAPI_KEY, pass --api-key, or add [api] serpapi_key to {}",
            config_file::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ".scholarpull.toml".to_string())
        );
    };
    tracing::debug!(?config, "resolved configuration");

    let client = SerpApiClient::new(api_key).with_base_url(config.base_url.clone());

    let mut stderr = std::io::stderr();
    let mut repo = if no_save {
        None
    } else {
        match ArticleRepository::open(&config.db_path) {
            Ok(repo) => Some(repo),
            Err(e) => {
                tracing::warn!(path = %config.db_path.display(), error = %e, "cannot open article database");
                let msg = format!(
                    "cannot open {}: {}; articles will not be saved",
                    config.db_path.display(),
                    e
                );
                if color.enabled() {
                    use owo_colors::OwoColorize;
                    writeln!(stderr, "{} {}", "WARNING:".yellow(), msg)?;
                } else {
                    writeln!(stderr, "WARNING: {}", msg)?;
                }
                None
            }
        }
    };

    let spinner = color.enabled().then(|| {
        let bar = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(format!("Fetching {} from SerpApi...", author_id));
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    });

    let query = config.query(author_id);
    let store = repo.as_mut().map(|r| r as &mut dyn ArticleStore);
    let result = fetch_and_persist(&client, store, &query, config.persist_limit).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let outcome = result?;

    let mut stdout = std::io::stdout();
    output::render_author(&mut stdout, &outcome.author, color)?;
    output::render_persist(&mut stderr, &outcome.persist, &config.db_path, color)?;
    Ok(())
}

fn list(author: Option<&str>, config: &Config, color: ColorMode) -> anyhow::Result<()> {
    if !config.db_path.exists() {
        anyhow::bail!(
            "article database not found at {}. Fetch an author first with: scholarpull show <AUTHOR_ID>",
            config.db_path.display()
        );
    }
    let repo = ArticleRepository::open(&config.db_path)?;
    let records = match author {
        Some(id) => repo.by_author(id)?,
        None => repo.all()?,
    };
    output::render_records(&mut std::io::stdout(), &records, color)?;
    Ok(())
}

fn extract(file: &Path, path: &str, as_int: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", file.display(), e))?;
    let target: ExtractTarget = path.parse()?;
    let values = extract_cmd::evaluate(&text, &target, as_int);

    let mut stdout = std::io::stdout();
    match target {
        ExtractTarget::Field(_) => match values.into_iter().next().flatten() {
            Some(value) => writeln!(stdout, "{}", value)?,
            None => anyhow::bail!("no value at {}", target),
        },
        ExtractTarget::Blocks { .. } | ExtractTarget::BlockField { .. } => {
            if values.is_empty() {
                anyhow::bail!("no object blocks at {}", target);
            }
            for (i, value) in values.iter().enumerate() {
                writeln!(stdout, "[{}] {}", i, value.as_deref().unwrap_or("(absent)"))?;
            }
        }
    }
    Ok(())
}
