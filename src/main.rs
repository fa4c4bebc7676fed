use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use drama_browser::config::{API_URL_ENV, DEFAULT_BASE_URL};
use drama_browser::pagination::DEFAULT_CLASSIFY;
use drama_browser::{
    ApiConfig, Category, Drama, DramaBoxService, DramaBrowserError, DramaDetail, Episode,
    HttpPageSource, Library, LoadMore, RequestState, SearchParams, open_library,
};
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Browse the DramaBox catalog from the terminal or serve it as JSON
#[derive(Debug, Parser)]
#[command(name = "drama-browser", version, about)]
struct Cli {
    /// Base URL of the upstream catalog API
    #[arg(long, global = true, env = API_URL_ENV, default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Retries after a failed request
    #[arg(long, global = true, default_value_t = 3)]
    retries: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve pages and the listing endpoint over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Trending dramas
    Trending,
    /// Latest dramas
    Latest {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Personalized recommendations
    ForYou,
    /// VIP dramas
    Vip {
        #[arg(long)]
        page: Option<u32>,
    },
    /// Indonesian-dubbed dramas
    Dubbed {
        #[arg(long, default_value = DEFAULT_CLASSIFY)]
        classify: String,
        #[arg(long)]
        page: Option<u32>,
    },
    /// One random drama
    Random,
    /// Popular search terms
    Popular,
    /// A category from the navigation menu (vip, dubindo, random, ...)
    Category {
        slug: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search the catalog
    Search {
        query: String,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Details of one drama
    Detail { id: String },
    /// Episodes of one drama
    Episodes { id: String },
    /// One episode of a drama
    Episode { id: String, episode_id: String },
    /// Page through the dubbed listing interactively
    Browse {
        #[arg(long, default_value = DEFAULT_CLASSIFY)]
        classify: String,
        /// Load further pages from a running server instead of the API
        #[arg(long)]
        server: Option<String>,
    },
}

fn print_dramas(dramas: &[Drama], offset: usize) {
    if dramas.is_empty() {
        println!("No dramas found.");
        return;
    }

    for (index, drama) in dramas.iter().enumerate() {
        let views = drama
            .views
            .as_deref()
            .map(|v| format!(" - {} views", v))
            .unwrap_or_default();
        println!("{:>3}. {} [{}]{}", offset + index + 1, drama.title, drama.id, views);
    }
}

fn print_detail(detail: &DramaDetail) {
    let drama = &detail.drama;
    println!("{}", drama.title);
    println!("  ID: {}", drama.id);
    if let Some(total) = drama.total_episodes {
        println!("  Episodes: {}", total);
    }
    if !drama.genre.is_empty() {
        println!("  Genre: {}", drama.genre.join(", "));
    }
    if let Some(views) = &drama.views {
        println!("  Views: {}", views);
    }
    if let Some(description) = &detail.long_description {
        let text = nanohtml2text::html2text(description);
        println!("\n{}\n", text.trim());
    }
}

fn print_episodes(episodes: &[Episode]) {
    if episodes.is_empty() {
        println!("No episodes available.");
        return;
    }

    for episode in episodes {
        let marker = match episode.is_charge {
            Some(true) => " (paid)",
            _ => "",
        };
        println!("  E{:03} {}{}", episode.number, episode.title, marker);
        match &episode.video_url {
            Some(url) => println!("       {}", url),
            None => println!("       not playable"),
        }
    }
}

async fn browse(
    library: &Library<DramaBoxService>,
    classify: &str,
    server: Option<&str>,
) -> Result<(), DramaBrowserError> {
    let initial = library.dubbed(Some(classify), Some(1)).await;
    print_dramas(&initial, 0);

    let timeout = library.catalog().client().config().timeout;
    let remote = server
        .map(|url| HttpPageSource::new(url, timeout))
        .transpose()?;
    let mut list = LoadMore::new(initial, 1, Some(classify));

    while list.has_more()
        && Confirm::new()
            .with_prompt("Load more?")
            .default(true)
            .interact()?
    {
        let shown = list.dramas().len();
        match &remote {
            Some(source) => list.load_more(source).await,
            None => list.load_more(library).await,
        };

        match list.state() {
            RequestState::Failed(message) => eprintln!("Could not load more: {}", message),
            _ => print_dramas(&list.dramas()[shown..], shown),
        }
    }

    if !list.dramas().is_empty() {
        println!("All {} dramas loaded.", list.dramas().len());
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), DramaBrowserError> {
    let config = ApiConfig::new(cli.api_url)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_retries(cli.retries);
    let library = open_library(config)?;

    match cli.command {
        Command::Serve { bind } => {
            drama_browser::server::serve(Arc::new(library), bind).await?;
        }
        Command::Trending => print_dramas(&library.trending().await, 0),
        Command::Latest { page, limit } => print_dramas(&library.latest(page, limit).await, 0),
        Command::ForYou => print_dramas(&library.for_you().await, 0),
        Command::Vip { page } => print_dramas(&library.vip(page).await, 0),
        Command::Dubbed { classify, page } => {
            print_dramas(&library.dubbed(Some(&classify), page).await, 0)
        }
        Command::Random => match library.random().await {
            Some(drama) => print_dramas(&[drama], 0),
            None => println!("No drama found."),
        },
        Command::Popular => {
            let terms = library.popular_searches().await;
            if terms.is_empty() {
                println!("No popular searches.");
            }
            for term in terms {
                println!("  {}", term);
            }
        }
        Command::Category { slug, page } => {
            let category: Category = slug.parse()?;
            let listing = library.category_page(category, page).await;
            println!("=== {} (page {}) ===", listing.title, listing.page);
            print_dramas(&listing.dramas, 0);
        }
        Command::Search { query, page, limit } => {
            let params = SearchParams {
                query,
                page,
                limit,
            };
            let results = library.search(&params).await;
            println!("Results for \"{}\": {}", params.query, results.len());
            print_dramas(&results, 0);
        }
        Command::Detail { id } => match library.detail_page(&id).await {
            Some(page) => {
                print_detail(&page.drama);
                print_episodes(&page.episodes);
            }
            None => println!("Drama {} not found.", id),
        },
        Command::Episodes { id } => print_episodes(&library.episodes(&id).await),
        Command::Episode { id, episode_id } => match library.episode(&id, &episode_id).await {
            Some(episode) => print_episodes(&[episode]),
            None => println!("Episode {} of drama {} not found.", episode_id, id),
        },
        Command::Browse { classify, server } => {
            browse(&library, &classify, server.as_deref()).await?
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}
