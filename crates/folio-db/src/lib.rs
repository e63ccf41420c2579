pub mod errors;
pub mod models;
pub mod pool;
pub mod schema;

use deadpool_diesel::Runtime;
use deadpool_diesel::postgres::{Manager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub use errors::{DatabaseError, ErrorKind};
pub use pool::FolioPool;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../../migrations");

/// Build the deadpool-diesel pool for the given database URL.
pub fn init_pool(app_name: &str, database_url: &str) -> Result<Pool, ErrorKind> {
    let manager = Manager::new(database_url, Runtime::Tokio1);
    let pool = Pool::builder(manager)
        .build()
        .map_err(|e| ErrorKind::Pool(e.to_string()))?;

    tracing::info!("[{app_name}] 🗃️ Database pool initialized");
    Ok(pool)
}

/// Apply any pending embedded migrations.
pub async fn run_migrations(pool: &Pool) -> Result<(), ErrorKind> {
    let conn = pool
        .get()
        .await
        .map_err(|e| ErrorKind::Pool(e.to_string()))?;

    conn.interact(|conn| {
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|e| ErrorKind::GenericInit(e.to_string()))
    })
    .await
    .map_err(|e| ErrorKind::GenericInit(e.to_string()))?
    .map(|applied| {
        if applied > 0 {
            tracing::info!("[folio_db] 🗃️ Applied {applied} pending migrations");
        }
    })
}
