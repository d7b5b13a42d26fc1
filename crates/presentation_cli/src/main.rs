//! Skycast CLI
//!
//! Command-line surface over the weather repository and the screen models:
//! search for cities, manage favorites, and view the forecast of the
//! selected city.

#![allow(clippy::print_stdout)]

mod render;

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::sync::watch;

use application::{
    DetailModel, DrawerModel, ManageModel, SearchModel, ViewState, WeatherRepository,
    ports::{CityStorePort, SelectionStorePort, WeatherProviderPort},
};
use domain::LocationKey;
use infrastructure::{
    AppConfig, SqliteCityStore, SqliteSelectionStore, WeatherProviderAdapter, create_pool,
    init_tracing,
};

/// Skycast CLI
#[derive(Parser)]
#[command(name = "skycast")]
#[command(author, version, about = "City search and 5-day forecasts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the provider for cities matching a text
    Search {
        /// Search text (three characters minimum)
        query: String,
    },

    /// Search and save the first match as a favorite, selecting it
    Add {
        /// Search text (three characters minimum)
        query: String,

        /// Pick the n-th search result instead of the first (1-based)
        #[arg(short, long, default_value = "1")]
        pick: usize,
    },

    /// List favorite cities; the selected one is starred
    List,

    /// Select a favorite city by its provider id
    Select {
        /// Provider id of the favorite
        id: String,
    },

    /// Remove a favorite city by its provider id
    Remove {
        /// Provider id of the favorite
        id: String,
    },

    /// Show the 5-day forecast of the selected city
    Forecast,

    /// Remove all favorite cities
    Clear,
}

/// Everything the subcommands operate on
struct App {
    repository: Arc<WeatherRepository>,
    selection: Arc<dyn SelectionStorePort>,
    max_cities: usize,
}

fn build_app(config: &AppConfig) -> anyhow::Result<App> {
    tracing::debug!(database = %config.database.path, "Building application");
    let pool = Arc::new(create_pool(&config.database).context("creating database pool")?);

    let cities: Arc<dyn CityStorePort> =
        Arc::new(SqliteCityStore::new(Arc::clone(&pool)).context("opening favorites store")?);
    let selection: Arc<dyn SelectionStorePort> = Arc::new(
        SqliteSelectionStore::new(Arc::clone(&pool)).context("opening selection store")?,
    );
    let provider: Arc<dyn WeatherProviderPort> = Arc::new(
        WeatherProviderAdapter::new(config.weather.clone()).context("creating weather client")?,
    );

    Ok(App {
        repository: Arc::new(WeatherRepository::new(provider, cities)),
        selection,
        max_cities: config.favorites.max_cities,
    })
}

/// Wait until a screen model leaves `Loading`
async fn settled_state<T: Clone>(rx: &mut watch::Receiver<ViewState<T>>) -> ViewState<T> {
    loop {
        let state = rx.borrow_and_update().clone();
        if !matches!(state, ViewState::Loading) {
            return state;
        }
        if rx.changed().await.is_err() {
            return state;
        }
    }
}

async fn run_search(app: &App, query: &str) -> anyhow::Result<()> {
    let model = SearchModel::new(Arc::clone(&app.repository));
    model.set_query(query);
    model.trigger().await;

    match model.state() {
        ViewState::Idle => {
            println!(
                "Query too short; type at least {} characters.",
                SearchModel::MIN_QUERY_LENGTH
            );
        },
        ViewState::Success(cities) => {
            for city in &cities {
                println!("{}", render::city_row(city, false));
            }
        },
        ViewState::NoResults => println!("No cities match \"{query}\"."),
        ViewState::Error(cause) => anyhow::bail!("search failed: {cause}"),
        ViewState::Loading => unreachable!("search completed"),
    }
    Ok(())
}

async fn run_add(app: &App, query: &str, pick: usize) -> anyhow::Result<()> {
    let cities = app
        .repository
        .search_city(query)
        .await
        .context("searching cities")?;
    let Some(city) = cities.get(pick.saturating_sub(1)) else {
        anyhow::bail!("no search result at position {pick} for \"{query}\"");
    };

    let manage = ManageModel::new(
        Arc::clone(&app.repository),
        Arc::clone(&app.selection),
        app.max_cities,
    );
    let mut rx = manage.subscribe();
    settled_state(&mut rx).await;

    if !manage.can_add_city() {
        println!("Favorites are full ({} cities).", app.max_cities);
        return Ok(());
    }

    // Hand the city over the same way the search screen does: serialized.
    let payload = serde_json::to_string(city).context("serializing city")?;
    manage.ingest_city(&payload).await;

    if let ViewState::Error(cause) = manage.state() {
        anyhow::bail!("could not save city: {cause}");
    }
    println!("Saved and selected {}.", city.name);
    Ok(())
}

async fn run_list(app: &App) -> anyhow::Result<()> {
    let manage = ManageModel::new(
        Arc::clone(&app.repository),
        Arc::clone(&app.selection),
        app.max_cities,
    );
    let mut rx = manage.subscribe();

    match settled_state(&mut rx).await {
        ViewState::Success(cities) => {
            let selected = manage.selected_city_id();
            for city in &cities {
                println!(
                    "{}",
                    render::city_row(city, selected.as_ref() == Some(&city.id))
                );
            }
        },
        ViewState::NoResults => println!("No favorite cities yet."),
        ViewState::Error(cause) => anyhow::bail!("could not load favorites: {cause}"),
        ViewState::Idle | ViewState::Loading => unreachable!("listing settled"),
    }
    Ok(())
}

async fn run_select(app: &App, id: &str) -> anyhow::Result<()> {
    let key = LocationKey::parse(id).context("parsing city id")?;
    let Some(city) = app.repository.get_city(&key).await? else {
        anyhow::bail!("no favorite with id {id}");
    };

    let drawer = DrawerModel::new(&app.repository, Arc::clone(&app.selection));
    drawer.select_city(&city).await?;
    println!("Selected {}.", city.name);
    Ok(())
}

async fn run_remove(app: &App, id: &str) -> anyhow::Result<()> {
    let key = LocationKey::parse(id).context("parsing city id")?;
    let Some(city) = app.repository.get_city(&key).await? else {
        anyhow::bail!("no favorite with id {id}");
    };

    let manage = ManageModel::new(
        Arc::clone(&app.repository),
        Arc::clone(&app.selection),
        app.max_cities,
    );
    let mut rx = manage.subscribe();
    settled_state(&mut rx).await;

    manage.remove_city(&city).await?;

    // Wait for the listing subscription to catch up before reporting.
    let removed = city.id.clone();
    let _ = tokio::time::timeout(
        std::time::Duration::from_secs(2),
        rx.wait_for(move |state| match state {
            ViewState::Success(cities) => cities.iter().all(|c| c.id != removed),
            ViewState::NoResults => true,
            _ => false,
        }),
    )
    .await;

    println!("Removed {}.", city.name);
    match manage.selected_city_id() {
        Some(selected) if selected != city.id => println!("Selection moved to {selected}."),
        _ => {},
    }
    Ok(())
}

async fn run_forecast(app: &App) -> anyhow::Result<()> {
    let detail = DetailModel::new(Arc::clone(&app.repository), Arc::clone(&app.selection));
    let mut rx = detail.subscribe();

    match settled_state(&mut rx).await {
        ViewState::Idle => println!("No city selected; add or select one first."),
        ViewState::NoResults => println!("The selected city is no longer a favorite."),
        ViewState::Success(forecast) => {
            if let Some(city) = detail.city() {
                println!("Forecast for {}:", city.name);
            }
            println!("{}", render::forecast_report(&forecast, Utc::now()));
        },
        ViewState::Error(cause) => anyhow::bail!("forecast failed: {cause}"),
        ViewState::Loading => unreachable!("forecast settled"),
    }
    Ok(())
}

async fn run_clear(app: &App) -> anyhow::Result<()> {
    app.repository.delete_all_cities().await?;
    app.selection.save(None).await?;
    println!("Removed all favorite cities.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let cli = Cli::parse();
    let config = AppConfig::load().context("loading configuration")?;
    let app = build_app(&config)?;

    match cli.command {
        Commands::Search { query } => run_search(&app, &query).await,
        Commands::Add { query, pick } => run_add(&app, &query, pick).await,
        Commands::List => run_list(&app).await,
        Commands::Select { id } => run_select(&app, &id).await,
        Commands::Remove { id } => run_remove(&app, &id).await,
        Commands::Forecast => run_forecast(&app).await,
        Commands::Clear => run_clear(&app).await,
    }
}
