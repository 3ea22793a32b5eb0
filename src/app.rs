//! Bootstrap shared by the `posters-app` binary and the `posters` CLI.

use std::sync::Arc;

use anyhow::Context;
use posters_auth::{JwtConfig, JwtVerifier};
use posters_db::{MemoryPosterStore, MongoConnection, PosterStore};
use posters_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Where poster records live while serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Mongo,
    /// In-process store pre-loaded with the seed posters, for local runs.
    Memory,
}

/// Opens the configured poster store.
pub async fn open_store(
    settings: &Settings,
    backend: StoreBackend,
) -> anyhow::Result<Arc<dyn PosterStore>> {
    match backend {
        StoreBackend::Mongo => {
            let connection = MongoConnection::connect(&settings.database.uri)
                .await
                .context("failed to connect to MongoDB")?;
            Ok(Arc::new(connection.poster_store(
                &settings.database.name,
                &settings.database.collection,
            )))
        }
        StoreBackend::Memory => {
            let store = MemoryPosterStore::new();
            posters_db::seed(&store)
                .await
                .context("failed to seed in-memory store")?;
            Ok(Arc::new(store))
        }
    }
}

/// Runs the HTTP API until shutdown.
pub async fn serve(settings: &Settings, backend: StoreBackend) -> anyhow::Result<()> {
    let jwt = JwtConfig::from_settings(&settings.auth).context("invalid auth settings")?;
    let store = open_store(settings, backend).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store.clone());

    let ctx = InitCtx {
        settings,
        store: &store,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = posters_http::start_server(&registry, settings, JwtVerifier::new(&jwt)).await;

    registry.stop_all().await?;
    served
}
