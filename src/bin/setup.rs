use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog::db;
use catalog::import::{ImportConfig, Importer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "catalog=info,setup=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        error!("DATABASE_URL must be set");
        std::process::exit(1);
    };

    let pool = match db::connect_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("unable to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let importer = Importer::new(pool.clone(), ImportConfig::default());
    match importer.run().await {
        Ok(reports) => {
            let courses: usize = reports.iter().map(|r| r.inserted).sum();
            info!(
                "setup finished: {} departments, {} courses",
                reports.len(),
                courses
            );
        }
        Err(e) => {
            // the schema may be half-torn-down here; a rerun always starts
            // from a full drop/create
            error!("setup failed: {}", e);
            pool.close().await;
            std::process::exit(1);
        }
    }

    pool.close().await;
}
