use chrono::{DateTime, TimeDelta, Utc};
use mongodb::bson::DateTime as BsonDateTime;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::RepositoryError;

/// A stored idea, as returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The client-controlled fields of an idea, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaDraft {
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl IdeaDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Schema check every repository runs before a write.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        if self.title.trim().is_empty() {
            return Err(RepositoryError::Validation("title is required".to_string()));
        }
        Ok(())
    }
}

/// Current time truncated to the store's millisecond precision.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Next `updatedAt` for a record last touched at `previous`. Always strictly later.
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(previous + TimeDelta::milliseconds(1))
}

pub fn parse_object_id(id: &str) -> Result<ObjectId, RepositoryError> {
    ObjectId::parse_str(id).map_err(|_| RepositoryError::InvalidId(id.to_string()))
}

/// Shape of an idea inside the `ideas` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IdeaDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl IdeaDocument {
    pub fn from_draft(draft: &IdeaDraft, now: DateTime<Utc>) -> Self {
        let now = BsonDateTime::from_millis(now.timestamp_millis());
        Self {
            id: None,
            title: draft.title.clone(),
            description: draft.description.clone(),
            tags: draft.tags.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

fn to_chrono(value: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or(DateTime::UNIX_EPOCH)
}

impl TryFrom<IdeaDocument> for Idea {
    type Error = RepositoryError;

    fn try_from(document: IdeaDocument) -> Result<Self, Self::Error> {
        let id = document.id.ok_or(RepositoryError::MissingId)?;
        Ok(Self {
            id: id.to_hex(),
            title: document.title,
            description: document.description,
            tags: document.tags,
            created_at: to_chrono(document.created_at),
            updated_at: to_chrono(document.updated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_title_fails_validation() {
        assert!(IdeaDraft::new("Rust rewrite").validate().is_ok());
        for title in ["", "   "] {
            let err = IdeaDraft::new(title).validate().unwrap_err();
            assert!(matches!(err, RepositoryError::Validation(_)));
        }
    }

    #[test]
    fn next_updated_at_is_strictly_later() {
        let t = now_millis();
        assert_eq!(next_updated_at(t, t), t + TimeDelta::milliseconds(1));
        let later = t + TimeDelta::seconds(5);
        assert_eq!(next_updated_at(t, later), later);
        // clock went backwards
        let earlier = t - TimeDelta::seconds(5);
        assert!(next_updated_at(t, earlier) > t);
    }

    #[test]
    fn now_millis_drops_sub_millisecond_precision() {
        let now = now_millis();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn malformed_object_id_is_rejected() {
        assert!(parse_object_id("65f1c0ffee0000000000abcd").is_ok());
        let err = parse_object_id("not-an-id").unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidId(id) if id == "not-an-id"));
    }

    #[test]
    fn document_converts_to_idea() {
        let oid = ObjectId::new();
        let created = now_millis();
        let draft = IdeaDraft::new("Garden").with_tags(["outdoors"]);
        let mut document = IdeaDocument::from_draft(&draft, created);
        assert!(matches!(
            Idea::try_from(document.clone()),
            Err(RepositoryError::MissingId)
        ));

        document.id = Some(oid);
        let idea = Idea::try_from(document).unwrap();
        assert_eq!(idea.id, oid.to_hex());
        assert_eq!(idea.title, "Garden");
        assert_eq!(idea.description, None);
        assert_eq!(idea.tags, vec!["outdoors".to_string()]);
        assert_eq!(idea.created_at, created);
        assert_eq!(idea.updated_at, created);
    }

    #[test]
    fn idea_serializes_with_camel_case_keys() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let idea = Idea {
            id: "65f1c0ffee0000000000abcd".to_string(),
            title: "A".to_string(),
            description: None,
            tags: vec![],
            created_at: at,
            updated_at: at,
        };
        let value = serde_json::to_value(&idea).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "65f1c0ffee0000000000abcd",
                "title": "A",
                "description": null,
                "tags": [],
                "createdAt": "2023-11-14T22:13:20Z",
                "updatedAt": "2023-11-14T22:13:20Z",
            })
        );
    }
}
