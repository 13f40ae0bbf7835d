use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::RawDetailRecord;
use crate::error::Error;

/// One normalized publication entry, in the CSL-like shape the site's data
/// file expects. Field order here is the serialization order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalCitation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(rename = "container-title")]
    pub container_title: String,
    pub page: String,
    pub volume: String,
    pub issue: String,
    pub source: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(rename = "DOI")]
    pub doi: String,
    pub author: Vec<Name>,
    pub link: String,
    pub issued: Issued,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub family: String,
    pub given: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issued {
    #[serde(rename = "date-parts")]
    pub date_parts: Vec<Vec<i32>>,
}

/// A bucket of citations sharing a publication year, the top-level unit of
/// the output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearGroup {
    pub year: i32,
    pub pub_list: Vec<CanonicalCitation>,
}

impl CanonicalCitation {
    pub fn year(&self) -> i32 {
        self.issued
            .date_parts
            .first()
            .and_then(|parts| parts.first())
            .copied()
            .unwrap_or(0)
    }
}

/// Map one raw detail record to its canonical shape. Pure; every optional
/// field has an empty/zero default. Fails only when the bib mapping itself
/// is absent.
pub fn normalize(record: &RawDetailRecord) -> Result<CanonicalCitation, Error> {
    let bib = record.bib.as_ref().ok_or_else(|| {
        Error::Malformed(format!(
            "record {:?} has no bib mapping",
            record.id_citations
        ))
    })?;

    let container_title = if bib.journal.is_empty() {
        bib.venue.clone()
    } else {
        bib.journal.clone()
    };

    Ok(CanonicalCitation {
        id: record.id_citations.chars().take(9).collect(),
        kind: "article-journal".to_string(),
        title: bib.title.clone(),
        container_title,
        page: bib.pages.clone(),
        volume: bib.volume.clone(),
        issue: bib.issue.clone(),
        source: "Google Scholar".to_string(),
        abstract_text: bib.abstract_text.clone(),
        doi: String::new(),
        author: split_authors(&bib.author),
        link: record.pub_url.clone(),
        issued: Issued {
            date_parts: vec![vec![parse_year(bib.pub_year.as_ref())]],
        },
    })
}

/// Split an `" and "`-joined author string into family/given pairs. The last
/// whitespace token of each name is the family name; everything before it,
/// joined by single spaces, is the given name.
pub fn split_authors(raw: &str) -> Vec<Name> {
    raw.split(" and ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            let mut tokens: Vec<&str> = name.split_whitespace().collect();
            let family = tokens.pop().unwrap_or_default().to_string();
            Name {
                family,
                given: tokens.join(" "),
            }
        })
        .collect()
}

fn parse_year(value: Option<&Value>) -> i32 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0) as i32,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Partition citations into year groups, newest year first. Within a group,
/// citations keep their relative input order; this is a stable partition,
/// not a sort of the citations themselves.
pub fn group_by_year(citations: Vec<CanonicalCitation>) -> Vec<YearGroup> {
    let mut groups: Vec<YearGroup> = Vec::new();
    for citation in citations {
        let year = citation.year();
        match groups.iter_mut().find(|group| group.year == year) {
            Some(group) => group.pub_list.push(citation),
            None => groups.push(YearGroup {
                year,
                pub_list: vec![citation],
            }),
        }
    }
    groups.sort_by(|a, b| b.year.cmp(&a.year));
    groups
}
