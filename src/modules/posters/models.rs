use posters_db::{PosterDocument, PosterPatch};
use serde::{Deserialize, Serialize};

/// A movie poster as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poster {
    /// External catalogue key, e.g. `tt0111161`
    pub id: String,
    /// Link to the poster image
    pub url: String,
    /// Display title of the movie
    pub title: String,
}

impl From<PosterDocument> for Poster {
    fn from(doc: PosterDocument) -> Self {
        Self {
            id: doc.id,
            url: doc.url,
            title: doc.title,
        }
    }
}

impl From<Poster> for PosterDocument {
    fn from(poster: Poster) -> Self {
        PosterDocument::new(poster.id, poster.url, poster.title)
    }
}

/// Request body for creating a poster. Every field is required and non-blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePoster {
    pub id: Option<String>,
    pub url: Option<String>,
    #[serde(alias = "titre")]
    pub title: Option<String>,
}

impl CreatePoster {
    /// Names of the fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("id", &self.id),
            ("url", &self.url),
            ("title", &self.title),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    /// Converts into a poster when every field is present.
    pub fn into_poster(self) -> Option<Poster> {
        if !self.missing_fields().is_empty() {
            return None;
        }
        Some(Poster {
            id: self.id?,
            url: self.url?,
            title: self.title?,
        })
    }
}

/// Request body for updating a poster. Blank or absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePoster {
    pub url: Option<String>,
    #[serde(alias = "titre")]
    pub title: Option<String>,
}

impl From<UpdatePoster> for PosterPatch {
    fn from(update: UpdatePoster) -> Self {
        PosterPatch {
            url: update.url,
            title: update.title,
        }
    }
}
