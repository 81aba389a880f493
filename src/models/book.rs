use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_AUTHOR: &str = "Unknown";

fn deserialize_optional_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i32),
        Float(f64),
    }

    match Option::<StringOrInt>::deserialize(deserializer)? {
        Some(StringOrInt::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                i32::from_str(s).map(Some).map_err(serde::de::Error::custom)
            }
        }
        Some(StringOrInt::Int(i)) => Ok(Some(i)),
        Some(StringOrInt::Float(f)) => Ok(Some(f as i32)),
        None => Ok(None),
    }
}

fn deserialize_optional_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrUint {
        String(String),
        Uint(u64),
        Int(i64),
    }

    match Option::<StringOrUint>::deserialize(deserializer)? {
        Some(StringOrUint::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                u64::from_str(s).map(Some).map_err(serde::de::Error::custom)
            }
        }
        Some(StringOrUint::Uint(id)) => Ok(Some(id)),
        // Negative ids mean "no cover" in some catalog dumps.
        Some(StringOrUint::Int(_)) | None => Ok(None),
    }
}

fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        String(String),
        Vec(Vec<Option<String>>),
    }

    match Option::<StringOrVec>::deserialize(deserializer)? {
        Some(StringOrVec::String(s)) if !s.is_empty() => Ok(vec![s]),
        Some(StringOrVec::Vec(v)) => Ok(v.into_iter().flatten().collect()),
        _ => Ok(Vec::new()),
    }
}

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

/// One catalog record as returned by the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub title: Option<String>,
    #[serde(
        rename = "author_name",
        default,
        deserialize_with = "deserialize_string_list"
    )]
    pub authors: Vec<String>,
    #[serde(
        rename = "cover_i",
        default,
        deserialize_with = "deserialize_optional_u64"
    )]
    pub cover_id: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub first_publish_year: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub cover_edition_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub edition_key: Vec<String>,
}

impl Document {
    /// Stable identity: canonical key, then edition key, then first alternate edition, then title.
    pub fn identity(&self) -> String {
        self.key
            .as_deref()
            .or(self.cover_edition_key.as_deref())
            .or(self.edition_key.first().map(String::as_str))
            .or(self.title.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    pub fn primary_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    pub fn display_author(&self) -> &str {
        self.primary_author().unwrap_or(UNKNOWN_AUTHOR)
    }
}

/// Minimal snapshot of a document kept in the favorites slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    pub author: String,
    #[serde(rename = "cover_i", default)]
    pub cover_id: Option<u64>,
    #[serde(default)]
    pub work_key: Option<String>,
}

impl FavoriteEntry {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            key: doc.identity(),
            title: doc.title.clone(),
            author: doc.display_author().to_string(),
            cover_id: doc.cover_id,
            work_key: doc.key.clone(),
        }
    }

    /// Reinterpret the snapshot as a document so it can be rendered as a card.
    /// The publish year is not kept, so favorites cards never show one.
    pub fn to_document(&self) -> Document {
        Document {
            key: self.work_key.clone(),
            title: self.title.clone(),
            authors: vec![self.author.clone()],
            cover_id: self.cover_id,
            first_publish_year: None,
            cover_edition_key: None,
            // Keeps the identity stable for entries saved without a work key.
            edition_key: match self.work_key {
                Some(_) => Vec::new(),
                None => vec![self.key.clone()],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_open_library_fields() {
        let doc: Document = serde_json::from_value(json!({
            "key": "/works/OL82563W",
            "title": "Harry Potter and the Philosopher's Stone",
            "author_name": ["J. K. Rowling", "Mary GrandPré"],
            "cover_i": 10521270,
            "first_publish_year": 1997,
            "edition_key": ["OL26331930M"]
        }))
        .unwrap();

        assert_eq!(doc.key.as_deref(), Some("/works/OL82563W"));
        assert_eq!(doc.primary_author(), Some("J. K. Rowling"));
        assert_eq!(doc.cover_id, Some(10521270));
        assert_eq!(doc.first_publish_year, Some(1997));
    }

    #[test]
    fn test_lenient_field_shapes() {
        let doc: Document = serde_json::from_value(json!({
            "title": "",
            "author_name": "Solo Author",
            "cover_i": "42",
            "first_publish_year": "",
            "edition_key": null
        }))
        .unwrap();

        assert_eq!(doc.title, None);
        assert_eq!(doc.authors, vec!["Solo Author".to_string()]);
        assert_eq!(doc.cover_id, Some(42));
        assert_eq!(doc.first_publish_year, None);
        assert!(doc.edition_key.is_empty());
        assert_eq!(doc.display_title(), UNTITLED);
    }

    #[test]
    fn test_identity_fallback_order() {
        let mut doc = Document {
            key: Some("/works/1".into()),
            cover_edition_key: Some("OL1M".into()),
            edition_key: vec!["OL2M".into()],
            title: Some("Dune".into()),
            ..Default::default()
        };
        assert_eq!(doc.identity(), "/works/1");

        doc.key = None;
        assert_eq!(doc.identity(), "OL1M");

        doc.cover_edition_key = None;
        assert_eq!(doc.identity(), "OL2M");

        doc.edition_key.clear();
        assert_eq!(doc.identity(), "Dune");

        doc.title = None;
        assert_eq!(doc.identity(), "");
    }

    #[test]
    fn test_favorite_snapshot_uses_wire_names() {
        let doc = Document {
            key: Some("/works/7".into()),
            title: Some("Emma".into()),
            cover_id: Some(9),
            ..Default::default()
        };
        let entry = FavoriteEntry::from_document(&doc);

        assert_eq!(entry.author, UNKNOWN_AUTHOR);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "key": "/works/7",
                "title": "Emma",
                "author": "Unknown",
                "cover_i": 9,
                "work_key": "/works/7"
            })
        );

        let card_doc = entry.to_document();
        assert_eq!(card_doc.key.as_deref(), Some("/works/7"));
        assert_eq!(card_doc.first_publish_year, None);
        assert_eq!(card_doc.identity(), entry.key);
    }
}
