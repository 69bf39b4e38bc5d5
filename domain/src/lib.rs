use chrono::{DateTime, Utc}; // Creation timestamps
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid; // For generated document ids

// --- Document ID ---
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)] // Plain string on the wire
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generates a fresh random identifier (UUID v4, hyphenated).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id.to_string())
    }
}
impl From<DocumentId> for String {
    fn from(doc_id: DocumentId) -> Self {
        doc_id.0
    }
}
impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Author ---

/// The creator of a document. Pure value object, embedded in [`Document`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Author {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }
}

// --- Document ---

/// A stored record. Every field is optional; the id is assigned on first save.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<DocumentId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// The id, if one is present and non-empty. An empty id counts as unassigned.
    pub fn assigned_id(&self) -> Option<&DocumentId> {
        self.id.as_ref().filter(|id| !id.is_empty())
    }

    /// Id of the author, `None` when there is no author or the author has no id.
    pub fn author_id(&self) -> Option<&str> {
        self.author.as_ref().and_then(|author| author.id.as_deref())
    }
}

// --- Search Criteria ---

/// Filter criteria for a search.
///
/// Every `None` field places no constraint on its dimension. A `Some` list is
/// an OR across its entries; an empty list therefore matches nothing. The
/// clauses themselves are combined with AND.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_prefixes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains_contents: Option<Vec<String>>,
    /// A `None` entry matches documents without an author id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_ids: Option<Vec<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_to: Option<DateTime<Utc>>,
}

impl SearchRequest {
    /// A request with no constraints; matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.title_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_contains_contents<I, S>(mut self, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains_contents = Some(needles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_author_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.author_ids = Some(ids.into_iter().map(|id| Some(id.into())).collect());
        self
    }

    /// Adds a `None` entry to the author list so authorless documents match too.
    pub fn including_authorless(mut self) -> Self {
        self.author_ids.get_or_insert_with(Vec::new).push(None);
        self
    }

    pub fn created_from(mut self, from: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn created_to(mut self, to: DateTime<Utc>) -> Self {
        self.created_to = Some(to);
        self
    }

    /// Checks a document against every clause that is set.
    pub fn matches(&self, document: &Document) -> bool {
        self.matches_title(document)
            && self.matches_content(document)
            && self.matches_author(document)
            && self.matches_created(document)
    }

    fn matches_title(&self, document: &Document) -> bool {
        match &self.title_prefixes {
            None => true,
            Some(prefixes) => document.title.as_deref().is_some_and(|title| {
                prefixes
                    .iter()
                    .any(|prefix| title.starts_with(prefix.as_str()))
            }),
        }
    }

    fn matches_content(&self, document: &Document) -> bool {
        match &self.contains_contents {
            None => true,
            Some(needles) => document.content.as_deref().is_some_and(|content| {
                needles.iter().any(|needle| content.contains(needle.as_str()))
            }),
        }
    }

    fn matches_author(&self, document: &Document) -> bool {
        match &self.author_ids {
            None => true,
            Some(ids) => {
                let author_id = document.author_id();
                ids.iter().any(|id| id.as_deref() == author_id)
            }
        }
    }

    // Range bounds only apply to documents that carry a timestamp.
    fn matches_created(&self, document: &Document) -> bool {
        let Some(created) = document.created else {
            return true;
        };
        self.created_from.is_none_or(|from| created >= from)
            && self.created_to.is_none_or(|to| created <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn create_test_document() -> Document {
        Document::new()
            .with_id("doc-1")
            .with_title("Introduction to Rust")
            .with_content("Ownership and borrowing explained")
            .with_author(Author::new("a1", "Ferris"))
            .with_created(at(12))
    }

    #[test]
    fn generated_ids_are_unique_and_non_empty() {
        let first = DocumentId::generate();
        let second = DocumentId::generate();
        assert!(!first.is_empty());
        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }

    #[test]
    fn empty_id_counts_as_unassigned() {
        assert!(Document::new().assigned_id().is_none());
        assert!(Document::new().with_id("").assigned_id().is_none());
        assert_eq!(
            Document::new().with_id("x").assigned_id().map(DocumentId::as_str),
            Some("x")
        );
    }

    #[test]
    fn author_id_is_none_without_author() {
        assert_eq!(create_test_document().author_id(), Some("a1"));
        assert_eq!(Document::new().author_id(), None);
        let nameless = Document::new().with_author(Author {
            id: None,
            name: Some("Anonymous".to_string()),
        });
        assert_eq!(nameless.author_id(), None);
    }

    #[test]
    fn empty_request_matches_everything() {
        let request = SearchRequest::new();
        assert!(request.matches(&create_test_document()));
        assert!(request.matches(&Document::new()));
    }

    #[test]
    fn title_prefixes_match_any_prefix() {
        let doc = create_test_document();
        assert!(SearchRequest::new()
            .with_title_prefixes(["Intro"])
            .matches(&doc));
        assert!(SearchRequest::new()
            .with_title_prefixes(["Advanced", "Introduction"])
            .matches(&doc));
        assert!(!SearchRequest::new()
            .with_title_prefixes(["intro"]) // Case sensitive
            .matches(&doc));
        assert!(!SearchRequest::new()
            .with_title_prefixes(["Rust"])
            .matches(&doc));
    }

    #[test]
    fn title_prefixes_exclude_untitled_documents() {
        let request = SearchRequest::new().with_title_prefixes([""]);
        assert!(request.matches(&create_test_document()));
        assert!(!request.matches(&Document::new()));
    }

    #[test]
    fn empty_lists_match_nothing() {
        let doc = create_test_document();
        let no_prefixes: [&str; 0] = [];
        assert!(!SearchRequest::new()
            .with_title_prefixes(no_prefixes)
            .matches(&doc));
        assert!(!SearchRequest::new()
            .with_contains_contents(no_prefixes)
            .matches(&doc));
        assert!(!SearchRequest::new()
            .with_author_ids(no_prefixes)
            .matches(&doc));
    }

    #[test]
    fn contains_contents_matches_substrings() {
        let doc = create_test_document();
        assert!(SearchRequest::new()
            .with_contains_contents(["borrow"])
            .matches(&doc));
        assert!(SearchRequest::new()
            .with_contains_contents(["lifetimes", "explained"])
            .matches(&doc));
        assert!(!SearchRequest::new()
            .with_contains_contents(["lifetimes"])
            .matches(&doc));
        assert!(!SearchRequest::new()
            .with_contains_contents(["borrow"])
            .matches(&Document::new()));
    }

    #[test]
    fn author_ids_use_exact_containment() {
        let doc = create_test_document();
        assert!(SearchRequest::new().with_author_ids(["a1"]).matches(&doc));
        assert!(!SearchRequest::new().with_author_ids(["a"]).matches(&doc));
        assert!(!SearchRequest::new()
            .with_author_ids(["a2"])
            .matches(&Document::new()));
    }

    #[test]
    fn authorless_entry_matches_documents_without_author() {
        let request = SearchRequest::new()
            .with_author_ids(["a2"])
            .including_authorless();
        assert!(request.matches(&Document::new()));
        assert!(!request.matches(&create_test_document()));

        let only_authorless = SearchRequest::new().including_authorless();
        assert_eq!(only_authorless.author_ids, Some(vec![None]));
        assert!(only_authorless.matches(&Document::new()));
    }

    #[test]
    fn created_range_is_inclusive() {
        let doc = create_test_document(); // created at 12:00
        assert!(SearchRequest::new().created_from(at(12)).matches(&doc));
        assert!(SearchRequest::new().created_to(at(12)).matches(&doc));
        assert!(SearchRequest::new()
            .created_from(at(10))
            .created_to(at(14))
            .matches(&doc));
        assert!(!SearchRequest::new().created_from(at(13)).matches(&doc));
        assert!(!SearchRequest::new().created_to(at(11)).matches(&doc));
    }

    #[test]
    fn created_range_skips_documents_without_timestamp() {
        let undated = Document::new().with_title("Undated");
        assert!(SearchRequest::new()
            .created_from(at(13))
            .created_to(at(11))
            .matches(&undated));
    }

    #[test]
    fn clauses_are_combined_with_and() {
        let doc = create_test_document();
        let request = SearchRequest::new()
            .with_title_prefixes(["Intro"])
            .with_author_ids(["a1"])
            .created_from(at(13));
        assert!(!request.matches(&doc));
    }

    #[test]
    fn document_serializes_with_camel_case_and_skips_absent_fields() {
        let value = serde_json::to_value(create_test_document()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "doc-1",
                "title": "Introduction to Rust",
                "content": "Ownership and borrowing explained",
                "author": { "id": "a1", "name": "Ferris" },
                "created": "2024-03-01T12:00:00Z"
            })
        );
        assert_eq!(serde_json::to_value(Document::new()).unwrap(), json!({}));
    }

    #[test]
    fn search_request_deserializes_null_author_entries() {
        let request: SearchRequest = serde_json::from_value(json!({
            "titlePrefixes": ["Intro"],
            "authorIds": ["a1", null],
            "createdFrom": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(request.title_prefixes, Some(vec!["Intro".to_string()]));
        assert_eq!(request.author_ids, Some(vec![Some("a1".to_string()), None]));
        assert_eq!(request.created_from, Some(at(10)));
        assert!(request.contains_contents.is_none());
        assert!(request.created_to.is_none());
    }
}
