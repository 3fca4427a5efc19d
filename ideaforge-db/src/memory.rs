use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::error::RepositoryResult;
use crate::model::{Idea, IdeaDraft, next_updated_at, now_millis, parse_object_id};
use crate::repository::IdeaRepository;

/// Process-local repository with the same observable behaviour as the
/// MongoDB one. Ids are ObjectId hex strings.
#[derive(Default)]
pub struct InMemoryIdeaRepository {
    ideas: RwLock<Vec<Idea>>,
}

impl InMemoryIdeaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.ideas.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ideas.read().await.is_empty()
    }
}

#[async_trait]
impl IdeaRepository for InMemoryIdeaRepository {
    async fn list(&self) -> RepositoryResult<Vec<Idea>> {
        let mut ideas = self.ideas.read().await.clone();
        // ObjectId hex sorts by creation time, matching the store's tie-break.
        ideas.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(ideas)
    }

    async fn create(&self, draft: IdeaDraft) -> RepositoryResult<Idea> {
        draft.validate()?;
        let now = now_millis();
        let idea = Idea {
            id: ObjectId::new().to_hex(),
            title: draft.title,
            description: draft.description,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        };
        self.ideas.write().await.push(idea.clone());
        Ok(idea)
    }

    async fn update(&self, id: &str, draft: IdeaDraft) -> RepositoryResult<Option<Idea>> {
        parse_object_id(id)?;
        draft.validate()?;

        let mut ideas = self.ideas.write().await;
        let Some(idea) = ideas.iter_mut().find(|idea| idea.id == id) else {
            return Ok(None);
        };
        idea.title = draft.title;
        idea.description = draft.description;
        idea.tags = draft.tags;
        idea.updated_at = next_updated_at(idea.updated_at, now_millis());
        Ok(Some(idea.clone()))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<Option<Idea>> {
        parse_object_id(id)?;
        let mut ideas = self.ideas.write().await;
        Ok(ideas
            .iter()
            .position(|idea| idea.id == id)
            .map(|index| ideas.remove(index)))
    }
}
