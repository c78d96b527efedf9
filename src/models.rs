use std::{fmt, str::FromStr};

use sea_orm::FromQueryResult;
use serde::{Deserialize, Deserializer, Serialize, de};

/// A movie joined with its genre and director, with both references
/// rendered as names.
#[derive(Clone, Debug, PartialEq, Serialize, FromQueryResult)]
pub struct MovieRecord {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub trailer: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub genre: Option<String>,
    pub director: Option<String>,
}

/// Body of a movie create or full replace. Absent keys become null.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub trailer: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub genre_id: Option<i32>,
    #[serde(default)]
    pub director_id: Option<i32>,
}

/// Body of a movie partial update.
///
/// The outer `Option` records whether the key was present at all, the inner
/// one carries the (possibly null) value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MoviePatch {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub trailer: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub rating: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub genre_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub director_id: Option<Option<i32>>,
}

/// Body shared by directors and genres.
#[derive(Clone, Debug, Deserialize)]
pub struct NameFields {
    pub name: String,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct MovieFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub director_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub genre_id: Option<i32>,
}

fn present<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn empty_as_none<'de, T, D>(de: D) -> Result<Option<T>, D::Error>
where
    T: FromStr,
    T::Err: fmt::Display,
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(de)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn patch_tells_null_from_missing() {
        let patch: MoviePatch =
            serde_json::from_value(json!({"rating": 9.0, "description": null})).unwrap();
        assert_eq!(patch.rating, Some(Some(9.0)));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.title, None);
        assert_eq!(patch.genre_id, None);
    }

    #[test]
    fn fields_ignore_id_and_default_missing_keys() {
        let fields: MovieFields =
            serde_json::from_value(json!({"id": 77, "title": "Солярис", "year": 1972})).unwrap();
        assert_eq!(fields.title.as_deref(), Some("Солярис"));
        assert_eq!(fields.year, Some(1972));
        assert_eq!(fields.description, None);
        assert_eq!(fields.director_id, None);
    }

    #[test]
    fn name_is_required() {
        assert!(serde_json::from_value::<NameFields>(json!({})).is_err());
    }

    #[test]
    fn filter_treats_empty_as_absent() {
        let filter: MovieFilter =
            serde_json::from_value(json!({"director_id": "", "genre_id": "4"})).unwrap();
        assert_eq!(filter.director_id, None);
        assert_eq!(filter.genre_id, Some(4));
    }

    #[test]
    fn filter_rejects_garbage() {
        assert!(serde_json::from_value::<MovieFilter>(json!({"genre_id": "drama"})).is_err());
    }
}
