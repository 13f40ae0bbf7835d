pub mod api;
pub mod args;
pub mod citation;
pub mod error;
pub mod scholar;
pub mod writer;

use anyhow::Result;

use crate::args::Args;
use crate::scholar::{Provider, ScholarClient};

/// Counts reported on successful completion.
pub struct Summary {
    pub publications: usize,
    pub groups: usize,
}

pub fn run(args: &Args) -> Result<Summary> {
    let client = ScholarClient::new(args.page_size);
    run_with_provider(&client, args)
}

/// Fetch, normalize, group, write. First error aborts the run before the
/// output file is touched; there is no partial-success mode.
pub fn run_with_provider<P: Provider>(provider: &P, args: &Args) -> Result<Summary> {
    let records = scholar::fetch_publications(provider, &args.user, args.sortby)?;

    let mut citations = Vec::with_capacity(records.len());
    for record in &records {
        citations.push(citation::normalize(record)?);
    }
    let groups = citation::group_by_year(citations);

    writer::write_groups(&groups, &args.output)?;
    Ok(Summary {
        publications: records.len(),
        groups: groups.len(),
    })
}
