use async_trait::async_trait;
use axum::Router;
use sqlx::SqlitePool;

/// Shared handles passed to every module lifecycle hook.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a SqlitePool,
}

/// A single schema migration contributed by a module.
///
/// `id` must be unique within the module; the registry prefixes it with the
/// module name when recording applied migrations.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A self-contained feature of the service: its routes, its schema, and its
/// lifecycle.
///
/// The registry drives implementations through `init`, migrations, `start`,
/// and finally `stop` on shutdown. Every hook except `name` has a no-op
/// default so small modules only implement what they need.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name, also the URL prefix the module's routes are mounted under.
    fn name(&self) -> &'static str;

    /// Runs before migrations, once per process.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Router mounted under `/{module_name}`.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment merged into the service-wide document.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Schema migrations owned by this module, in execution order.
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Runs after migrations, before the server accepts traffic.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs during graceful shutdown, in reverse registration order.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
