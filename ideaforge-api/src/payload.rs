use ideaforge_db::IdeaDraft;
use serde::{Deserialize, Serialize};

/// Body accepted by create and update. Unknown keys such as `id` or
/// `createdAt` are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct IdeaPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<IdeaPayload> for IdeaDraft {
    fn from(payload: IdeaPayload) -> Self {
        Self {
            title: payload.title.unwrap_or_default(),
            description: payload.description,
            tags: payload.tags.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_become_empty_draft_values() {
        let payload: IdeaPayload = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        let draft = IdeaDraft::from(payload);
        assert_eq!(draft, IdeaDraft::default());
    }

    #[test]
    fn client_supplied_identity_is_ignored() {
        let payload: IdeaPayload = serde_json::from_str(
            r#"{"id": "abc", "createdAt": "2020-01-01T00:00:00Z", "title": "A", "tags": ["x"]}"#,
        )
        .unwrap();
        let draft = IdeaDraft::from(payload);
        assert_eq!(draft, IdeaDraft::new("A").with_tags(["x"]));
    }
}
