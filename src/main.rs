use anyhow::Context;
use posters_app::StoreBackend;
use posters_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load posters settings")?;
    posters_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %posters_db::redact_uri(&settings.database.uri),
        "posters-app bootstrap starting"
    );

    posters_app::serve(&settings, StoreBackend::Mongo).await
}
