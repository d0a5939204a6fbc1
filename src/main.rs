use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use geoscope::config::ExplorerConfig;
use geoscope::explorer::{DeviceTrigger, Explorer};
use geoscope::gateway::Gateway;
use geoscope::models::Coordinate;
use geoscope::providers::HttpProviders;
use geoscope::resolver::LocationResolver;
use geoscope::view::{MenuState, PanelState, ViewState};
use geoscope::web;

#[derive(Parser)]
#[command(name = "geoscope", version, about = "Interactive location explorer")]
struct Cli {
    /// Path to a configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Resolve a place name or a coordinate pair and print its info panel
    Locate {
        /// Free-text place name, e.g. "New Delhi"
        query: Option<String>,
        #[arg(long, requires = "lon", conflicts_with = "query")]
        lat: Option<f64>,
        #[arg(long, requires = "lat", conflicts_with = "query")]
        lon: Option<f64>,
    },
    /// Walk the country/state/city cascade and print each level
    Browse {
        #[arg(long)]
        country: String,
        #[arg(long)]
        state: Option<String>,
        #[arg(long, requires = "state")]
        city: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ExplorerConfig::load_from_path(cli.config.clone())?;
    init_tracing(&config.logging.level);

    match cli.command {
        Command::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            web::run(config).await
        }
        Command::Locate { query, lat, lon } => {
            let mut explorer = build_explorer(&config)?;
            match (query, lat, lon) {
                (Some(query), None, None) => explorer.search_city(query, None).await,
                (None, Some(lat), Some(lon)) => {
                    explorer
                        .device_position(
                            Ok(Coordinate::new(lat, lon)),
                            DeviceTrigger::ButtonPress,
                        )
                        .await;
                }
                _ => bail!("Provide a place name or both --lat and --lon"),
            }
            print_panel(explorer.view());
            Ok(())
        }
        Command::Browse {
            country,
            state,
            city,
        } => {
            let mut explorer = build_explorer(&config)?;
            explorer.start().await;

            explorer.select_country(Some(country.clone())).await;
            println!("States in {country}:");
            print_menu(&explorer.view().state_menu);

            if let Some(state) = state {
                explorer.select_state(Some(state.clone())).await;
                println!("Cities in {state}:");
                print_menu(&explorer.view().city_menu);

                if let Some(city) = city {
                    explorer.select_city(Some(city)).await;
                    println!();
                    print_panel(explorer.view());
                }
            }
            Ok(())
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_explorer(config: &ExplorerConfig) -> Result<Explorer> {
    let providers = HttpProviders::from_config(&config.upstream)?;
    let gateway = Gateway::new(providers.directory.clone());
    let resolver = LocationResolver::new(
        providers.reverse,
        providers.weather,
        providers.directory,
    );
    Ok(Explorer::new(gateway, resolver, providers.forward))
}

fn print_menu(menu: &MenuState) {
    match menu {
        MenuState::Ready(options) => {
            for option in options {
                println!("  {option}");
            }
        }
        MenuState::Failed(message) => println!("  {message}"),
        MenuState::Disabled => println!("  (unavailable)"),
        MenuState::Loading => println!("  (loading)"),
    }
}

fn print_panel(view: &ViewState) {
    match &view.panel {
        PanelState::Info(info) => println!("{info}"),
        PanelState::Message(message) => println!("{message}"),
        PanelState::Loading(message) => println!("{message}"),
        PanelState::Empty => println!("No location resolved"),
    }
}
