use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

/// A poster as stored in the `posters` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterDocument {
    /// External catalogue key (IMDb id), used as the primary key.
    #[serde(rename = "_id")]
    pub id: String,
    pub url: String,
    /// Written as `title`; documents from the earlier schema carry `titre`.
    #[serde(alias = "titre")]
    pub title: String,
}

impl PosterDocument {
    pub fn new(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Partial update for a poster. Absent or blank fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosterPatch {
    pub url: Option<String>,
    pub title: Option<String>,
}

impl PosterPatch {
    /// Fields that carry a non-blank value.
    pub fn url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.url().is_none() && self.title().is_none()
    }

    /// Applies the non-blank fields to `poster` in place.
    pub fn apply(&self, poster: &mut PosterDocument) {
        if let Some(url) = self.url() {
            poster.url = url.to_string();
        }
        if let Some(title) = self.title() {
            poster.title = title.to_string();
        }
    }

    /// Update document for the non-blank fields, `None` when there is nothing to set.
    ///
    /// Setting the title also removes a legacy `titre` field so the document
    /// keeps a single title.
    pub fn to_update(&self) -> Option<Document> {
        let mut set = Document::new();
        if let Some(url) = self.url() {
            set.insert("url", url);
        }
        let title = self.title();
        if let Some(title) = title {
            set.insert("title", title);
        }

        if set.is_empty() {
            return None;
        }

        let mut update = doc! { "$set": set };
        if title.is_some() {
            update.insert("$unset", doc! { "titre": "" });
        }
        Some(update)
    }
}

pub(crate) fn query_by_id(id: &str) -> Document {
    doc! { "_id": id }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_serializes_id_as_underscore_id() {
        let poster = PosterDocument::new("tt0068646", "https://img/2.jpg", "The Godfather");
        let bson = mongodb::bson::to_document(&poster).unwrap();
        assert_eq!(bson.get_str("_id").unwrap(), "tt0068646");
        assert_eq!(bson.get_str("title").unwrap(), "The Godfather");
        assert!(bson.get("id").is_none());
    }

    #[test]
    fn blank_patch_fields_are_ignored() {
        let patch = PosterPatch {
            url: Some("   ".to_string()),
            title: Some("Heat".to_string()),
        };
        let mut poster = PosterDocument::new("tt0113277", "https://img/heat.jpg", "Heat (1995)");
        patch.apply(&mut poster);

        assert_eq!(poster.url, "https://img/heat.jpg");
        assert_eq!(poster.title, "Heat");
        assert_eq!(
            patch.to_update(),
            Some(doc! { "$set": { "title": "Heat" }, "$unset": { "titre": "" } })
        );
    }

    #[test]
    fn url_only_patch_sets_url() {
        let patch = PosterPatch {
            url: Some("https://img/new.jpg".to_string()),
            title: None,
        };
        assert_eq!(
            patch.to_update(),
            Some(doc! { "$set": { "url": "https://img/new.jpg" } })
        );
    }

    #[test]
    fn legacy_titre_documents_are_readable() {
        let stored = doc! {
            "_id": "tt0111161",
            "url": "https://img/1.jpg",
            "titre": "The Shawshank Redemption",
        };

        let poster: PosterDocument = mongodb::bson::from_document(stored).unwrap();
        assert_eq!(poster.title, "The Shawshank Redemption");

        let written = mongodb::bson::to_document(&poster).unwrap();
        assert_eq!(written.get_str("title").unwrap(), "The Shawshank Redemption");
        assert!(written.get("titre").is_none());
    }

    #[test]
    fn empty_patch_has_no_update() {
        let patch = PosterPatch::default();
        assert!(patch.is_empty());
        assert!(patch.to_update().is_none());
    }
}
