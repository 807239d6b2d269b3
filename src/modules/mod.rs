pub mod books;
pub mod favorites;
pub mod users;

use sqlx::SqlitePool;

use bookshelf_auth::TokenVerifier;
use bookshelf_kernel::settings::Settings;
use bookshelf_kernel::ModuleRegistry;

/// Register all bookshelf modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, pool: &SqlitePool, settings: &Settings) {
    let verifier = TokenVerifier::new(&settings.auth);

    registry.register(books::create_module(pool.clone()));
    registry.register(users::create_module(pool.clone(), settings.auth.bcrypt_cost));
    registry.register(favorites::create_module(pool.clone(), verifier));
}
