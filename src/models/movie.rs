use serde::{Deserialize, Serialize};

/// Raw provider response body, passed through unparsed
pub type Payload = Vec<u8>;

/// A TMDB genre as embedded in movie details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// The subset of GET /movie/{id} this service reads
///
/// Every other field of the provider document is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl MovieDetail {
    /// Parses a provider detail payload
    pub fn from_payload(payload: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_detail_from_tmdb_payload() {
        let json = br#"{
            "adult": false,
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
            "vote_average": 8.2,
            "runtime": 136
        }"#;

        let detail = MovieDetail::from_payload(json).unwrap();
        assert_eq!(detail.id, 603);
        assert_eq!(detail.title, "The Matrix");
        assert_eq!(detail.release_date.as_deref(), Some("1999-03-30"));
        assert_eq!(
            detail.genres[0],
            Genre {
                id: 28,
                name: "Action".to_string()
            }
        );
        assert_eq!(detail.genres.len(), 2);
        assert_eq!(detail.vote_average, Some(8.2));
    }

    #[test]
    fn test_movie_detail_tolerates_missing_optional_fields() {
        let json = br#"{"id": 1, "title": "Untitled", "poster_path": null}"#;

        let detail = MovieDetail::from_payload(json).unwrap();
        assert!(detail.genres.is_empty());
        assert_eq!(detail.poster_path, None);
        assert_eq!(detail.release_date, None);
    }

    #[test]
    fn test_movie_detail_rejects_error_document() {
        let json = br#"{"success": false, "status_code": 34, "status_message": "The resource you requested could not be found."}"#;
        assert!(MovieDetail::from_payload(json).is_err());
    }
}
