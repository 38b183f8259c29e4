//! arxiv-feed CLI
//!
//! Terminal front end for the article feed: one-shot listings, an
//! interactive browser and the data file merge used by ingestion.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use arxiv_feed::{
    error::{AppError, Result},
    models::{ActiveView, Article, Config, DateFilter, FilterCriteria, Language, validate_collection},
    pipeline::{Feed, merge_articles},
    storage::{DataStore, LocalSource, source_from_config},
    utils::is_remote,
    view::{BrowseCommand, CommandOutcome, Renderer, ViewState, command::HELP},
};
use chrono::Local;
use clap::{Args, Parser, Subcommand};

/// arxiv-feed - arXiv security paper feed
#[derive(Parser, Debug)]
#[command(
    name = "arxiv-feed",
    version,
    about = "Browse summarized arXiv security papers"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "feed.toml")]
    config: PathBuf,

    /// Override the data file location (path or URL)
    #[arg(short, long)]
    source: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the filtered article list
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Page to show (pages accumulate, as in the browser)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Body language (en or tr)
        #[arg(short, long)]
        lang: Option<String>,

        /// Show the dashboard instead of cards
        #[arg(long)]
        dashboard: bool,
    },

    /// Print one article with its full body
    Show {
        id: String,

        /// Body language (en or tr)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// List every tag with its article count
    Tags,

    /// Interactive browser driven by line commands
    Browse,

    /// Show configuration and data file summary
    Info,

    /// Validate the configuration and the data file
    Validate,

    /// Merge a batch of new articles into the local data file
    Merge {
        /// JSON array of incoming articles
        #[arg(long)]
        input: PathBuf,

        /// Data file to update (default: the configured source location)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Fuzzy search query
    #[arg(short, long)]
    query: Option<String>,

    /// Required tag (repeatable; all must match)
    #[arg(short, long = "tag")]
    tags: Vec<String>,

    /// Relative window: all, 24h, week or month
    #[arg(short, long)]
    date: Option<String>,

    /// Start of an explicit range (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// End of an explicit range (YYYY-MM-DD, defaults to --from)
    #[arg(long, requires = "from")]
    to: Option<String>,
}

impl FilterArgs {
    fn criteria(&self) -> Result<FilterCriteria> {
        let date_filter = match (&self.from, &self.date) {
            (Some(from), _) => DateFilter::range(from, self.to.as_deref())?,
            (None, Some(date)) => DateFilter::parse(date)?,
            (None, None) => DateFilter::All,
        };
        Ok(FilterCriteria {
            query: self.query.clone().unwrap_or_default(),
            selected_tags: self.tags.iter().cloned().collect(),
            date_filter,
        })
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Load the data file once, printing the error state when the fetch or
/// parse failed.
async fn load_store(config: &Config, renderer: &Renderer<'_>) -> Result<DataStore> {
    let source = source_from_config(&config.source)?;
    let mut store = DataStore::new();
    if let Err(e) = store.load(source.as_ref()).await {
        if e.is_load_error() {
            if let Some(message) = renderer.status(&store) {
                println!("{message}");
            }
        }
        return Err(e);
    }
    Ok(store)
}

fn parse_language(lang: Option<&str>, fallback: Language) -> Result<Language> {
    lang.map(str::parse).transpose().map(|l| l.unwrap_or(fallback))
}

/// Run the interactive browser until `quit` or end of input.
fn browse(config: &Config, renderer: &Renderer<'_>, feed: &Feed) -> Result<()> {
    let mut state = ViewState::new(&config.view);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut outcome = CommandOutcome::Redraw;

    loop {
        let now = Local::now();
        match outcome {
            CommandOutcome::Quit => break,
            CommandOutcome::ShowHelp => println!("{HELP}"),
            CommandOutcome::ShowTags => print!("{}", renderer.tags(feed.tags(), &state)),
            CommandOutcome::Redraw => {
                let results = feed.derive(state.criteria(), &now);
                let total = feed.articles().len();
                match state.active_view() {
                    ActiveView::List => print!("{}", renderer.list(&results, total, &state, &now)),
                    ActiveView::Dashboard => print!("{}", renderer.dashboard(&results, total, &now)),
                }
            }
        }

        print!("\n> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        outcome = match line.parse::<BrowseCommand>() {
            Ok(command) => {
                log::debug!("Browse command: {:?}", command);
                command.apply(&mut state)
            }
            Err(e) => {
                println!("{e}");
                CommandOutcome::ShowHelp
            }
        };
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(source) = cli.source {
        config.source.location = source;
    }
    log::debug!("Data source: {}", config.source.location);

    let renderer = Renderer::new(&config);

    match cli.command {
        Command::List {
            filter,
            page,
            lang,
            dashboard,
        } => {
            let store = load_store(&config, &renderer).await?;
            let feed = Feed::new(store.articles().clone(), &config.search);

            let criteria = filter.criteria()?;
            for tag in criteria.selected_tags.iter().filter(|t| !feed.tags().contains(t)) {
                log::warn!("Tag '{}' is not on any article", tag);
            }

            let mut state = ViewState::new(&config.view);
            state.set_criteria(criteria);
            state.set_global_language(parse_language(lang.as_deref(), state.global_language())?);
            for _ in 1..page {
                state.load_more();
            }

            let now = Local::now();
            let results = feed.derive(state.criteria(), &now);
            let total = feed.articles().len();
            if dashboard {
                print!("{}", renderer.dashboard(&results, total, &now));
            } else {
                print!("{}", renderer.list(&results, total, &state, &now));
            }
        }

        Command::Show { id, lang } => {
            let store = load_store(&config, &renderer).await?;
            let article = store
                .articles()
                .iter()
                .find(|a| a.id == id)
                .ok_or_else(|| AppError::validation(format!("no article with id '{id}'")))?;

            let mut state = ViewState::new(&config.view);
            state.set_global_language(parse_language(lang.as_deref(), state.global_language())?);
            state.toggle_expanded(&article.id);
            print!("{}", renderer.card(article, &state, &Local::now()));
        }

        Command::Tags => {
            let store = load_store(&config, &renderer).await?;
            let feed = Feed::new(store.articles().clone(), &config.search);
            print!("{}", renderer.tags(feed.tags(), &ViewState::new(&config.view)));
        }

        Command::Browse => {
            let store = load_store(&config, &renderer).await?;
            let feed = Feed::new(store.articles().clone(), &config.search);
            log::info!(
                "Browsing {} articles ({} tags)",
                feed.articles().len(),
                feed.tags().len()
            );
            browse(&config, &renderer, &feed)?;
        }

        Command::Info => {
            log::info!("Config file: {}", cli.config.display());
            log::info!("Data source: {}", config.source.location);

            let store = load_store(&config, &renderer).await?;
            let articles = store.articles();
            let feed = Feed::new(articles.clone(), &config.search);

            println!("Articles: {}", articles.len());
            println!("Tags: {}", feed.tags().len());
            for known in &config.known_tags {
                println!("  {} ({}): {}", known.name, known.label, feed.tags().count(&known.name));
            }
            let newest = articles.iter().map(Article::published).max();
            let oldest = articles.iter().map(Article::published).min();
            if let (Some(oldest), Some(newest)) = (oldest, newest) {
                println!(
                    "Published: {} .. {}",
                    oldest.format("%Y-%m-%d"),
                    newest.format("%Y-%m-%d")
                );
            }
            let translated = articles
                .iter()
                .filter(|a| a.content.has(Language::Tr))
                .count();
            println!("Turkish summaries: {} / {}", translated, articles.len());
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let store = load_store(&config, &renderer).await?;
            validate_collection(store.articles())?;
            log::info!("✓ Data file OK ({} articles)", store.articles().len());

            log::info!("All validations passed!");
        }

        Command::Merge { input, output } => {
            let output = match output {
                Some(path) => path,
                None if is_remote(&config.source.location) || config.source.base_url.is_some() => {
                    return Err(AppError::config(
                        "source is remote; pass --output to choose a local data file",
                    ));
                }
                None => PathBuf::from(&config.source.location),
            };

            let incoming = Article::parse_collection(&tokio::fs::read(&input).await?)?;
            log::info!("Read {} incoming articles from {}", incoming.len(), input.display());

            let target = LocalSource::new(output);
            let existing = target.read_or_empty().await?;
            let outcome = merge_articles(existing, incoming);

            if outcome.has_changes() {
                target.write(&outcome.articles).await?;
                log::info!(
                    "Wrote {} articles to {}",
                    outcome.articles.len(),
                    target.path().display()
                );
            } else {
                log::info!("No new articles, {} left unchanged", target.path().display());
            }
            for id in &outcome.added {
                println!("+ {id}");
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
