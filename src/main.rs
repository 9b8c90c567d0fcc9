use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use icebreaker::agents::ProfileUrlResolver;
use icebreaker::llm::create_adapter;
use icebreaker::profile::{FetchMode, ProfileFetcher};
use icebreaker::search::TavilySearchProvider;
use icebreaker::services::{ConfigService, EnvConfigService, UrlResolver};
use icebreaker::{server, IceBreaker, IcebreakerError};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "icebreaker")]
#[command(version = icebreaker::version::VERSION)]
#[command(about = "Find a person's LinkedIn profile and summarize it into a short bio and two facts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the web form.
    Serve {
        /// Listen address (default: ICEBREAKER_BIND or 127.0.0.1:5000)
        #[arg(long)]
        bind: Option<String>,
        /// Load profiles from the public fixture instead of the enrichment API.
        #[arg(long)]
        mock: bool,
    },
    /// Run the whole pipeline for one name and print the summary.
    Lookup {
        #[arg(default_value = "Harrison Chase")]
        name: Vec<String>,
        #[arg(long)]
        mock: bool,
        /// Print the terminal pipeline state as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Resolve a name to a profile URL only.
    Resolve {
        #[arg(default_value = "Eden Marco")]
        name: Vec<String>,
    },
    /// Fetch and filter the profile behind a URL, printed as JSON.
    Fetch {
        url: String,
        #[arg(long)]
        mock: bool,
        /// Enrichment endpoint override
        #[arg(long, env = "SCRAPIN_ENDPOINT")]
        endpoint: Option<String>,
    },
}

fn fetch_mode(mock: bool) -> FetchMode {
    if mock {
        FetchMode::Mock
    } else {
        FetchMode::Live
    }
}

fn load_config() -> Result<Arc<EnvConfigService>> {
    let config = EnvConfigService::load().context("failed to load configuration")?;
    Ok(Arc::new(config))
}

fn build_icebreaker(mock: bool) -> Result<IceBreaker> {
    let config = load_config()?;
    IceBreaker::from_config(config, fetch_mode(mock)).context("failed to wire the pipeline")
}

/// Exit status for errors the operator has to fix (missing keys, bad values)
const EXIT_CONFIGURATION: i32 = 2;

/// True when any cause in the chain is a configuration error
fn is_configuration_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<IcebreakerError>()
            .is_some_and(IcebreakerError::is_configuration)
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("icebreaker=info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!("{}", icebreaker::version::version_string());

    match run(cli).await {
        Err(err) if is_configuration_error(&err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(EXIT_CONFIGURATION);
        }
        other => other,
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { bind, mock } => {
            let config = load_config()?;
            let addr = bind.unwrap_or_else(|| config.bind_addr());
            let icebreaker = IceBreaker::from_config(config, fetch_mode(mock))
                .context("failed to wire the pipeline")?;
            server::serve(Arc::new(icebreaker), &addr)
                .await
                .with_context(|| format!("web server on {} stopped", addr))?;
        }
        Commands::Lookup { name, mock, json } => {
            let icebreaker = build_icebreaker(mock)?;
            let outcome = icebreaker.run_detailed(&name.join(" ")).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                let summary = outcome.into_summary();
                println!("{}", summary.summary);
                for fact in &summary.facts {
                    println!("- {}", fact);
                }
            }
        }
        Commands::Resolve { name } => {
            let config = load_config()?;
            let llm = create_adapter(
                config.llm_provider(),
                config.llm_api_key()?,
                Some(config.llm_api_base()),
                Some(config.llm_model()),
            );
            let search = TavilySearchProvider::new(config.search_api_key()?, config.search_endpoint())?;
            let resolver = ProfileUrlResolver::new(
                Arc::from(llm),
                Arc::new(search),
                config.agent_max_iterations(),
            );
            println!("{}", resolver.resolve(&name.join(" ")).await?);
        }
        Commands::Fetch {
            url,
            mock,
            endpoint,
        } => {
            let mut fetcher = ProfileFetcher::new(EnvConfigService::enrichment_key_from_env())?;
            if let Some(endpoint) = endpoint {
                fetcher = fetcher.with_endpoint(endpoint);
            }
            let record = fetcher.fetch(&url, fetch_mode(mock)).await?;
            println!("{}", record.to_prompt_json()?);
        }
    }

    Ok(())
}
