use tracing::{error, info};

use quill::{BlogService, Config, Database, WebServer};

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // Load configuration
    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = quill::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        quill::logging::init_console_only(&config.logging.level);
    }

    info!("Quill blog starting");

    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> quill::Result<()> {
    let db = Database::open(&config.database.path).await?;

    let seeded = BlogService::new(&db)
        .seed_categories(&config.blog.categories)
        .await?;
    info!(categories = seeded, "Categories seeded");

    let server = WebServer::new(&config, db)?;
    info!("Server configured on {}", server.addr());
    server.run().await
}
