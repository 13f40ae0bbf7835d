use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::api::{AuthorHandle, Bib, PublicationStub, RawDetailRecord};
use crate::error::Error;

const BASE_URL: &str = "https://scholar.google.com";

/// Provider-side ordering hint for the publication listing. The output only
/// depends on the in-memory grouping step, but requesting year order keeps
/// the fetch sequence close to the final file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Most cited first (Scholar's default listing order).
    Citations,
    /// Newest first.
    Year,
}

impl SortOrder {
    fn query_value(self) -> Option<&'static str> {
        match self {
            SortOrder::Citations => None,
            SortOrder::Year => Some("pubdate"),
        }
    }
}

/// The external collaborator: resolves an author id and fills publication
/// data. The pipeline is generic over this so the network client stays at
/// the boundary.
pub trait Provider {
    fn search_author_id(&self, author_id: &str) -> Result<AuthorHandle, Error>;
    fn fill_publications(&self, author: &mut AuthorHandle, sort: SortOrder) -> Result<(), Error>;
    fn fill_publication(&self, stub: &PublicationStub) -> Result<RawDetailRecord, Error>;
}

/// Fetch full detail for every publication of an author, strictly one at a
/// time, with a progress bar over the detail fetches.
pub fn fetch_publications<P: Provider>(
    provider: &P,
    author_id: &str,
    sort: SortOrder,
) -> Result<Vec<RawDetailRecord>, Error> {
    let mut author = provider.search_author_id(author_id)?;
    provider.fill_publications(&mut author, sort)?;
    info!(
        "resolved author {:?} with {} publications",
        author.name,
        author.publications.len()
    );

    let bar = ProgressBar::new(author.publications.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "Fetching publications [{bar:40}] {pos}/{len} {msg}",
        )
        .expect("valid progress template"),
    );

    let mut records = Vec::with_capacity(author.publications.len());
    for stub in &author.publications {
        bar.set_message(stub.title.clone());
        records.push(provider.fill_publication(stub)?);
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(records)
}

/// Blocking Google Scholar client. Scholar serves HTML only, so both the
/// listing and the detail pages are scraped. No retry, backoff, or auth.
pub struct ScholarClient {
    http: reqwest::blocking::Client,
    base_url: String,
    page_size: usize,
}

impl ScholarClient {
    pub fn new(page_size: usize) -> Self {
        Self::with_base_url(BASE_URL, page_size)
    }

    pub fn with_base_url(base_url: &str, page_size: usize) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            // A zero page size would never terminate the listing loop.
            page_size: page_size.max(1),
        }
    }

    fn get(&self, url: &str) -> Result<String, Error> {
        debug!("GET {url}");
        Ok(self.http.get(url).send()?.error_for_status()?.text()?)
    }
}

impl Provider for ScholarClient {
    fn search_author_id(&self, author_id: &str) -> Result<AuthorHandle, Error> {
        let url = format!("{}/citations?hl=en&user={}", self.base_url, author_id);
        let html = self.get(&url)?;
        let document = Html::parse_document(&html);
        let name = parse_profile_name(&document)
            .ok_or_else(|| Error::Lookup(author_id.to_string()))?;
        Ok(AuthorHandle {
            author_id: author_id.to_string(),
            name,
            publications: Vec::new(),
        })
    }

    fn fill_publications(&self, author: &mut AuthorHandle, sort: SortOrder) -> Result<(), Error> {
        let mut start = 0;
        loop {
            let mut url = format!(
                "{}/citations?hl=en&user={}&view_op=list_works&cstart={}&pagesize={}",
                self.base_url, author.author_id, start, self.page_size
            );
            if let Some(sortby) = sort.query_value() {
                url.push_str("&sortby=");
                url.push_str(sortby);
            }
            let html = self.get(&url)?;
            let rows = parse_listing_rows(&Html::parse_document(&html));
            let page_len = rows.len();
            debug!("listing page cstart={start}: {page_len} rows");
            author.publications.extend(rows);
            if page_len < self.page_size {
                return Ok(());
            }
            start += self.page_size;
        }
    }

    fn fill_publication(&self, stub: &PublicationStub) -> Result<RawDetailRecord, Error> {
        let url = format!(
            "{}/citations?view_op=view_citation&hl=en&citation_for_view={}",
            self.base_url, stub.citation_id
        );
        let html = self.get(&url)?;
        parse_detail(&Html::parse_document(&html), &stub.citation_id)
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub fn parse_profile_name(document: &Html) -> Option<String> {
    let name = selector("#gsc_prf_in");
    document
        .select(&name)
        .next()
        .map(text_of)
        .filter(|name| !name.is_empty())
}

/// Extract publication stubs from one page of the profile's listing table.
pub fn parse_listing_rows(document: &Html) -> Vec<PublicationStub> {
    let row = selector("tr.gsc_a_tr");
    let title_link = selector("a.gsc_a_at");
    document
        .select(&row)
        .filter_map(|tr| {
            let anchor = tr.select(&title_link).next()?;
            let href = anchor.value().attr("href")?;
            let citation_id = query_param(href, "citation_for_view")?;
            Some(PublicationStub {
                citation_id,
                title: text_of(anchor),
            })
        })
        .collect()
}

/// Parse a citation detail page into a raw record. The bib field table uses
/// label/value pairs; labels Scholar does not emit for a given publication
/// simply leave their defaults.
pub fn parse_detail(document: &Html, citation_id: &str) -> Result<RawDetailRecord, Error> {
    let title_sel = selector("#gsc_oci_title");
    let link_sel = selector("#gsc_oci_title a.gsc_oci_title_link");
    let field_row = selector("#gsc_oci_table div.gs_scl");
    let field_label = selector(".gsc_oci_field");
    let field_value = selector(".gsc_oci_value");

    let title = document
        .select(&title_sel)
        .next()
        .map(text_of)
        .ok_or_else(|| {
            Error::Malformed(format!("detail page for {citation_id:?} has no title block"))
        })?;
    let pub_url = document
        .select(&link_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .unwrap_or_default()
        .to_string();

    let mut bib = Bib {
        title,
        ..Bib::default()
    };
    for section in document.select(&field_row) {
        let label = match section.select(&field_label).next() {
            Some(el) => text_of(el),
            None => continue,
        };
        let value = match section.select(&field_value).next() {
            Some(el) => text_of(el),
            None => continue,
        };
        match label.as_str() {
            "Authors" => bib.author = join_with_and(&value),
            "Publication date" => {
                if let Some(year) = value.split('/').next() {
                    bib.pub_year = Some(Value::String(year.trim().to_string()));
                }
            }
            "Journal" => bib.journal = value,
            "Source" | "Conference" | "Book" => bib.venue = value,
            "Pages" => bib.pages = value,
            "Volume" => bib.volume = value,
            "Issue" => bib.issue = value,
            "Description" => bib.abstract_text = value,
            _ => {}
        }
    }

    Ok(RawDetailRecord {
        bib: Some(bib),
        id_citations: citation_id.to_string(),
        pub_url,
    })
}

/// Rejoin Scholar's comma-separated author list with the `" and "` separator
/// the bib mapping uses.
fn join_with_and(authors: &str) -> String {
    authors
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(" and ")
}

fn query_param(href: &str, key: &str) -> Option<String> {
    href.split(['?', '&'])
        .find_map(|pair| pair.strip_prefix(key)?.strip_prefix('='))
        .map(|value| value.replace("%3A", ":"))
}

#[cfg(test)]
mod test {
    use super::*;

    const LISTING: &str = r#"
        <div id="gsc_prf_in">Ada Lovelace</div>
        <table><tbody id="gsc_a_b">
          <tr class="gsc_a_tr">
            <td class="gsc_a_t">
              <a class="gsc_a_at" href="/citations?view_op=view_citation&user=iIiVrrQAAAAJ&citation_for_view=iIiVrrQAAAAJ:abcDEF123">Notes on the Analytical Engine</a>
            </td>
          </tr>
          <tr class="gsc_a_tr">
            <td class="gsc_a_t">
              <a class="gsc_a_at" href="/citations?view_op=view_citation&user=iIiVrrQAAAAJ&citation_for_view=iIiVrrQAAAAJ%3AxyzUVW456">Sketch of the Engine</a>
            </td>
          </tr>
        </tbody></table>
    "#;

    const DETAIL: &str = r#"
        <div id="gsc_oci_title">
          <a class="gsc_oci_title_link" href="https://example.org/paper">Notes on the Analytical Engine</a>
        </div>
        <div id="gsc_oci_table">
          <div class="gs_scl">
            <div class="gsc_oci_field">Authors</div>
            <div class="gsc_oci_value">Ada Lovelace, Charles Babbage</div>
          </div>
          <div class="gs_scl">
            <div class="gsc_oci_field">Publication date</div>
            <div class="gsc_oci_value">1843/9/1</div>
          </div>
          <div class="gs_scl">
            <div class="gsc_oci_field">Journal</div>
            <div class="gsc_oci_value">Scientific Memoirs</div>
          </div>
          <div class="gs_scl">
            <div class="gsc_oci_field">Volume</div>
            <div class="gsc_oci_value">3</div>
          </div>
          <div class="gs_scl">
            <div class="gsc_oci_field">Pages</div>
            <div class="gsc_oci_value">666-731</div>
          </div>
          <div class="gs_scl">
            <div class="gsc_oci_field">Description</div>
            <div class="gsc_oci_value">The first published program.</div>
          </div>
        </div>
    "#;

    #[test]
    fn test_parse_profile_name() {
        let document = Html::parse_document(LISTING);
        assert_eq!(
            parse_profile_name(&document),
            Some("Ada Lovelace".to_string())
        );
    }

    #[test]
    fn test_parse_listing_rows() {
        let document = Html::parse_document(LISTING);
        let rows = parse_listing_rows(&document);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].citation_id, "iIiVrrQAAAAJ:abcDEF123");
        assert_eq!(rows[0].title, "Notes on the Analytical Engine");
        // Percent-encoded colon in the second row's href.
        assert_eq!(rows[1].citation_id, "iIiVrrQAAAAJ:xyzUVW456");
    }

    #[test]
    fn test_parse_detail_fields() {
        let document = Html::parse_document(DETAIL);
        let record = parse_detail(&document, "iIiVrrQAAAAJ:abcDEF123").unwrap();
        assert_eq!(record.pub_url, "https://example.org/paper");
        let bib = record.bib.unwrap();
        assert_eq!(bib.title, "Notes on the Analytical Engine");
        assert_eq!(bib.author, "Ada Lovelace and Charles Babbage");
        assert_eq!(bib.pub_year, Some(serde_json::json!("1843")));
        assert_eq!(bib.journal, "Scientific Memoirs");
        assert_eq!(bib.volume, "3");
        assert_eq!(bib.pages, "666-731");
        assert_eq!(bib.abstract_text, "The first published program.");
        assert_eq!(bib.venue, "");
    }

    #[test]
    fn test_detail_without_title_is_malformed() {
        let document = Html::parse_document("<div id=\"gsc_oci_table\"></div>");
        assert!(matches!(
            parse_detail(&document, "x:y"),
            Err(Error::Malformed(_))
        ));
    }

    #[test]
    fn test_query_param_extraction() {
        assert_eq!(
            query_param("/citations?a=1&citation_for_view=u:v&b=2", "citation_for_view"),
            Some("u:v".to_string())
        );
        assert_eq!(query_param("/citations?a=1", "citation_for_view"), None);
    }
}
