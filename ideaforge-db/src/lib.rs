pub mod error;
pub mod memory;
pub mod model;
pub mod repository;

use std::sync::Arc;

use log::{error, info};

pub use error::{RepositoryError, RepositoryResult};
pub use memory::InMemoryIdeaRepository;
pub use model::{Idea, IdeaDraft};
pub use repository::{IdeaRepository, MongoIdeaRepository, OfflineIdeaRepository};

pub const COLLECTION_NAME: &str = "ideas";
pub const DEFAULT_DATABASE: &str = "ideaforge";

/// Opens the store and verifies it, failing if the server cannot be reached.
pub async fn connect(mongodb_uri: &str) -> RepositoryResult<MongoIdeaRepository> {
    let repository = MongoIdeaRepository::open(mongodb_uri).await?;
    repository.verify().await?;
    Ok(repository)
}

/// Returns the repository the server should use. Never fails: an unreachable
/// store is logged and requests then fail per call.
///
/// The connection check runs in the background so the listener is not held
/// up by server selection.
pub async fn initialize_db(mongodb_uri: &str) -> Arc<dyn IdeaRepository> {
    let repository = match MongoIdeaRepository::open(mongodb_uri).await {
        Ok(repository) => repository,
        Err(e) => {
            error!("MongoDB connection error: {e}");
            return Arc::new(OfflineIdeaRepository::new(e.to_string()));
        }
    };
    info!("Using database '{}'.", repository.database_name());

    let probe = repository.clone();
    tokio::spawn(async move {
        match probe.verify().await {
            Ok(()) => info!("Connected to MongoDB"),
            Err(e) => error!("MongoDB connection error: {e}"),
        }
    });

    Arc::new(repository)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unparsable_uri_falls_back_to_offline_repository() {
        let repository = initialize_db("not a connection string").await;
        let err = repository.list().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Unavailable(_)));
    }
}
