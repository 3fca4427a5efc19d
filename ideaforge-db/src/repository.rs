use async_trait::async_trait;
use log::{debug, info};
use mongodb::bson::{Bson, DateTime as BsonDateTime, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database, IndexModel};

use crate::error::{RepositoryError, RepositoryResult};
use crate::model::{Idea, IdeaDocument, IdeaDraft, now_millis, parse_object_id};
use crate::{COLLECTION_NAME, DEFAULT_DATABASE};

/// Persistence operations over the idea collection.
///
/// Implementations validate drafts before writing and assign `id`,
/// `createdAt` and `updatedAt` themselves. A missing record yields `Ok(None)`.
#[async_trait]
pub trait IdeaRepository: Send + Sync {
    /// All ideas, most recently updated first.
    async fn list(&self) -> RepositoryResult<Vec<Idea>>;

    async fn create(&self, draft: IdeaDraft) -> RepositoryResult<Idea>;

    /// Replaces title, description and tags and refreshes `updatedAt`.
    async fn update(&self, id: &str, draft: IdeaDraft) -> RepositoryResult<Option<Idea>>;

    /// Hard delete. Returns the removed record.
    async fn delete(&self, id: &str) -> RepositoryResult<Option<Idea>>;
}

#[derive(Clone)]
pub struct MongoIdeaRepository {
    database: Database,
    collection: Collection<IdeaDocument>,
}

impl MongoIdeaRepository {
    /// Builds a client for `uri` without touching the network. Uses the URI's
    /// default database, else `ideaforge`.
    pub async fn open(uri: &str) -> RepositoryResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        let collection = database.collection(COLLECTION_NAME);
        Ok(Self {
            database,
            collection,
        })
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Round-trips to the server and makes sure the list index exists.
    pub async fn verify(&self) -> RepositoryResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        self.ensure_indexes().await
    }

    async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "updatedAt": -1 })
            .build();
        let result = self.collection.create_index(index).await?;
        info!("Index '{}' ready on '{}'.", result.index_name, self.collection.name());
        Ok(())
    }
}

#[async_trait]
impl IdeaRepository for MongoIdeaRepository {
    async fn list(&self) -> RepositoryResult<Vec<Idea>> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "updatedAt": -1, "_id": -1 })
            .await?;

        let mut ideas = Vec::new();
        while cursor.advance().await? {
            ideas.push(Idea::try_from(cursor.deserialize_current()?)?);
        }
        debug!("Listed {} ideas.", ideas.len());
        Ok(ideas)
    }

    async fn create(&self, draft: IdeaDraft) -> RepositoryResult<Idea> {
        draft.validate()?;
        let mut document = IdeaDocument::from_draft(&draft, now_millis());
        let result = self.collection.insert_one(&document).await?;
        document.id = result.inserted_id.as_object_id();
        let idea = Idea::try_from(document)?;
        debug!("Created idea {}.", idea.id);
        Ok(idea)
    }

    async fn update(&self, id: &str, draft: IdeaDraft) -> RepositoryResult<Option<Idea>> {
        let oid = parse_object_id(id)?;
        draft.validate()?;

        let now = BsonDateTime::from_millis(now_millis().timestamp_millis());
        let tags: Vec<Bson> = draft.tags.into_iter().map(Bson::String).collect();
        // Pipeline update so `updatedAt` can be derived from its stored value.
        let pipeline = vec![doc! {
            "$set": {
                "title": { "$literal": draft.title },
                "description": { "$literal": draft.description },
                "tags": { "$literal": tags },
                "updatedAt": { "$max": [now, { "$add": ["$updatedAt", 1] }] },
            }
        }];

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, pipeline)
            .return_document(ReturnDocument::After)
            .await?;
        updated.map(Idea::try_from).transpose()
    }

    async fn delete(&self, id: &str) -> RepositoryResult<Option<Idea>> {
        let oid = parse_object_id(id)?;
        let deleted = self
            .collection
            .find_one_and_delete(doc! { "_id": oid })
            .await?;
        deleted.map(Idea::try_from).transpose()
    }
}

/// Stand-in used when no client could be built at startup.
pub struct OfflineIdeaRepository {
    reason: String,
}

impl OfflineIdeaRepository {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable<T>(&self) -> RepositoryResult<T> {
        Err(RepositoryError::Unavailable(self.reason.clone()))
    }
}

#[async_trait]
impl IdeaRepository for OfflineIdeaRepository {
    async fn list(&self) -> RepositoryResult<Vec<Idea>> {
        self.unavailable()
    }

    async fn create(&self, _draft: IdeaDraft) -> RepositoryResult<Idea> {
        self.unavailable()
    }

    async fn update(&self, _id: &str, _draft: IdeaDraft) -> RepositoryResult<Option<Idea>> {
        self.unavailable()
    }

    async fn delete(&self, _id: &str) -> RepositoryResult<Option<Idea>> {
        self.unavailable()
    }
}
