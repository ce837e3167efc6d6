use crate::config::StorageBackend;
use crate::error::Result;
use crate::modules::product::{InMemoryProductRepository, MongoProductRepository, ProductRepository};
use mongodb::{Client, Database, bson::doc};
use std::sync::Arc;

/// Connect to MongoDB and verify the server answers a ping.
pub async fn connect(uri: &str, database: &str) -> Result<Database> {
    tracing::info!("📦 Database: connecting to '{}'...", database);

    let client = Client::with_uri_str(uri).await?;
    let database = client.database(database);
    database.run_command(doc! { "ping": 1 }).await?;

    tracing::info!("✅ Database: connection established");
    Ok(database)
}

/// Build the product repository for the configured backend
pub async fn product_repository(storage: &StorageBackend) -> Result<Arc<dyn ProductRepository>> {
    match storage {
        StorageBackend::Mongo { uri, database } => {
            let database = connect(uri, database).await?;
            Ok(Arc::new(MongoProductRepository::new(&database)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory product storage; data is lost on exit");
            Ok(Arc::new(InMemoryProductRepository::new()))
        }
    }
}
