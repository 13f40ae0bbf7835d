use std::path::PathBuf;

use clap::Parser;

use crate::scholar::SortOrder;

#[derive(Debug, Parser)]
#[command(author, version, about)]
/// Fetch an author's Google Scholar publications into a JSON data file
pub struct Args {
    /// Google Scholar author id
    #[arg(default_value = "iIiVrrQAAAAJ")]
    pub user: String,

    /// Destination JSON file
    #[arg(default_value = "_data/publications.json")]
    #[arg(long)]
    pub output: PathBuf,

    /// Listing page size
    #[arg(default_value = "100")]
    #[arg(long)]
    pub page_size: usize,

    /// Listing order requested from Scholar
    #[arg(value_enum, default_value = "year")]
    #[arg(long)]
    pub sortby: SortOrder,
}
