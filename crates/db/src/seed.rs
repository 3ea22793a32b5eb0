//! One-shot initialization of the `posters` collection.
//!
//! The seeder drops the collection and reloads the fixed poster list, so
//! running it again always converges on the same contents. Anything written
//! to the collection since the previous run is discarded.

use std::io::Write;

use anyhow::Context;

use crate::{MongoConnection, PosterDocument, PosterStore};

/// Database the seeder targets.
pub const SEED_DATABASE: &str = "posters_db";
/// Collection the seeder drops and repopulates.
pub const SEED_COLLECTION: &str = "posters";

const SEED_POSTERS: [(&str, &str, &str); 5] = [
    (
        "tt0111161",
        "https://m.media-amazon.com/images/M/MV5BNDE3ODcxYzMtY2YzZC00NiYy._V1_.jpg",
        "The Shawshank Redemption",
    ),
    (
        "tt0068646",
        "https://m.media-amazon.com/images/M/MV5BM2MyNjYxNmUtYTAwNi00MTYx._V1_.jpg",
        "The Godfather",
    ),
    (
        "tt0071562",
        "https://m.media-amazon.com/images/M/MV5BMWMwMGQzZTItY2JlNC00OWRi._V1_.jpg",
        "The Godfather Part II",
    ),
    (
        "tt0468569",
        "https://m.media-amazon.com/images/M/MV5BMTMxNTMwODM0NF5BMl5BanBn._V1_.jpg",
        "The Dark Knight",
    ),
    (
        "tt0050083",
        "https://m.media-amazon.com/images/M/MV5BMWU4N2FjNzYtNTVkNC00NzQ0._V1_.jpg",
        "12 Angry Men",
    ),
];

/// The fixed poster list, in insertion order.
pub fn seed_posters() -> Vec<PosterDocument> {
    SEED_POSTERS
        .iter()
        .map(|&(id, url, title)| PosterDocument::new(id, url, title))
        .collect()
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub count: u64,
}

impl SeedReport {
    /// Status line written to stdout after seeding.
    pub fn status_line(&self) -> String {
        format!(
            "Collection {SEED_COLLECTION} initialized with {} documents.",
            self.count
        )
    }
}

/// Drops the store's contents, inserts the fixed list and counts the result.
///
/// Steps run strictly in sequence and the first failure aborts the run.
pub async fn seed(store: &dyn PosterStore) -> anyhow::Result<SeedReport> {
    let posters = seed_posters();

    store
        .drop_all()
        .await
        .with_context(|| format!("failed to drop collection '{SEED_COLLECTION}'"))?;

    store
        .insert_many(&posters)
        .await
        .with_context(|| format!("failed to insert {} seed posters", posters.len()))?;

    let count = store
        .count()
        .await
        .with_context(|| format!("failed to count documents in '{SEED_COLLECTION}'"))?;

    tracing::info!(
        target: "posters-db",
        backend = store.backend(),
        count,
        "seed complete"
    );

    Ok(SeedReport { count })
}

/// Seeds `store` and writes the status line to `out`.
pub async fn seed_and_report<W: Write>(
    store: &dyn PosterStore,
    out: &mut W,
) -> anyhow::Result<SeedReport> {
    let report = seed(store).await?;
    writeln!(out, "{}", report.status_line())
        .and_then(|_| out.flush())
        .context("failed to write seed status")?;
    Ok(report)
}

/// Connects to `uri`, seeds `posters_db.posters`, and prints the count to stdout.
pub async fn run_seeder(uri: &str) -> anyhow::Result<SeedReport> {
    let connection = MongoConnection::connect(uri)
        .await
        .context("failed to connect to MongoDB")?;
    let store = connection.poster_store(SEED_DATABASE, SEED_COLLECTION);

    seed_and_report(&store, &mut std::io::stdout()).await
}
