//! Poster storage for the catalogue: MongoDB connection factory, the
//! [`PosterStore`] abstraction with its MongoDB and in-memory backends, and the
//! one-shot seeder that loads the fixed poster list.

pub mod connection;
pub mod document;
pub mod error;
pub mod memory;
pub mod mongo;
pub mod seed;
pub mod store;

pub use connection::{redact_uri, MongoConnection};
pub use document::{PosterDocument, PosterPatch};
pub use error::DbError;
pub use memory::MemoryPosterStore;
pub use mongo::MongoPosterStore;
pub use seed::{run_seeder, seed, seed_and_report, seed_posters, SeedReport, SEED_COLLECTION, SEED_DATABASE};
pub use store::PosterStore;
