pub mod posters;

use std::sync::Arc;

use posters_db::PosterStore;
use posters_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn PosterStore>) {
    registry.register(posters::create_module(store));
}
