use serde::Deserialize;
use serde_json::Value;

/// A Scholar profile with its publication listing.
#[derive(Debug, Clone)]
pub struct AuthorHandle {
    pub author_id: String,
    pub name: String,
    pub publications: Vec<PublicationStub>,
}

/// One row of the profile's publication table. Only the citation id is
/// consumed downstream, by the detail fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationStub {
    pub citation_id: String,
    pub title: String,
}

/// Full detail for one publication, as supplied by the provider.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawDetailRecord {
    /// The nested bibliographic mapping. Its absence makes the record
    /// malformed; absence of any field inside it does not.
    #[serde(default)]
    pub bib: Option<Bib>,
    #[serde(default)]
    pub id_citations: String,
    #[serde(default)]
    pub pub_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Bib {
    /// Scholar reports the year as either a string or a number.
    #[serde(default)]
    pub pub_year: Option<Value>,
    /// Full author list, names joined by the literal separator `" and "`.
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub pages: String,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub issue: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
}
