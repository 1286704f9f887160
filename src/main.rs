use recipebook::auth::Session;
use recipebook::recipes::{CatalogController, RecipeCatalog};
use recipebook::state::AppState;
use recipebook::view::ConsoleView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "recipebook=debug".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let app_state = AppState::init()?;

    match Session::new(app_state.store.clone()).current()? {
        Some(user) => tracing::info!(user_id = user.id, email = %user.email, "signed in"),
        None => tracing::debug!("no active session"),
    }

    let catalog = RecipeCatalog::load(&app_state)?;
    let controller = CatalogController::new(catalog, ConsoleView::new(std::io::stdout(), false));

    let stats = controller.catalog().stats();
    tracing::info!(
        total = stats.total,
        user_recipes = stats.user_recipes,
        favorites = stats.favorites,
        "catalog rendered"
    );

    Ok(())
}
