use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::citation::YearGroup;
use crate::error::Error;

/// Serialize the year groups to `path` as 4-space-indented UTF-8 JSON with
/// non-ASCII characters kept literal. Parent directories are created as
/// needed. The file is overwritten in place with no atomic rename; a crash
/// mid-write can corrupt a previously valid file.
pub fn write_groups(groups: &[YearGroup], path: &Path) -> Result<(), Error> {
    let as_write_error = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(as_write_error)?;
        }
    }

    let file = File::create(path).map_err(as_write_error)?;
    let mut writer = BufWriter::new(file);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut writer, formatter);
    groups.serialize(&mut serializer)?;
    writer.flush().map_err(as_write_error)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::citation::{group_by_year, normalize};
    use crate::api::{Bib, RawDetailRecord};
    use serde_json::json;

    fn sample_groups() -> Vec<YearGroup> {
        let raw = RawDetailRecord {
            bib: Some(Bib {
                pub_year: Some(json!(1998)),
                author: "Noël Marquet and José García".to_string(),
                title: "Caractères accentués".to_string(),
                journal: "Révue".to_string(),
                ..Bib::default()
            }),
            id_citations: "abcdefghijkl".to_string(),
            pub_url: "https://example.org".to_string(),
        };
        group_by_year(vec![normalize(&raw).unwrap()])
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("publications.json");
        let groups = sample_groups();
        write_groups(&groups, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let parsed: Vec<YearGroup> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, groups);
    }

    #[test]
    fn test_non_ascii_kept_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("publications.json");
        write_groups(&sample_groups(), &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Noël"));
        assert!(contents.contains("José"));
        assert!(contents.contains("Révue"));
        assert!(!contents.contains("\\u00"));
    }

    #[test]
    fn test_four_space_indentation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("publications.json");
        write_groups(&sample_groups(), &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\n    {"));
        assert!(contents.contains("\n        \"year\""));
    }

    #[test]
    fn test_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("publications.json");
        fs::write(&path, "stale contents that run much longer than the update").unwrap();
        write_groups(&[], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }
}
