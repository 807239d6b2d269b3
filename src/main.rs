use anyhow::Context;

use bookshelf_kernel::settings::Settings;
use bookshelf_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;

    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookshelf bootstrap starting"
    );

    let pool = bookshelf_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    bookshelf_app::register_all(&mut registry, &pool, &settings);

    let ctx = InitCtx {
        settings: &settings,
        db: &pool,
    };

    registry.init_all(&ctx).await?;
    bookshelf_db::run_migrations(&pool, &registry.collect_migrations()).await?;
    registry.start_all(&ctx).await?;

    bookshelf_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;

    Ok(())
}
