use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{HpoError, HpoResult, SMALL_FILE_FIELDS};

/// The exact column names of the small file header line
pub const SMALL_FILE_HEADER: [&str; SMALL_FILE_FIELDS] = [
    "#diseaseID",
    "diseaseName",
    "phenotypeID",
    "phenotypeName",
    "onsetID",
    "onsetName",
    "frequency",
    "sex",
    "negation",
    "modifier",
    "description",
    "publication",
    "evidence",
    "biocuration",
];

/// One data line of a small file with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based position inside the file, the header is line 1
    pub line_number: usize,
    /// the unmodified line, without the line break
    pub text: String,
}

/// Checks that the header line has exactly the expected columns
///
/// # Errors
///
/// [`HpoError::HeaderSchemaMismatch`] with a description of the first mismatch
pub fn check_header(filename: &str, line: &str) -> HpoResult<()> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != SMALL_FILE_FIELDS {
        return Err(HpoError::HeaderSchemaMismatch {
            file: filename.to_string(),
            message: format!(
                "expecting {SMALL_FILE_FIELDS} fields but got {}",
                fields.len()
            ),
        });
    }
    for (idx, (found, expected)) in fields.iter().zip(SMALL_FILE_HEADER).enumerate() {
        if *found != expected {
            return Err(HpoError::HeaderSchemaMismatch {
                file: filename.to_string(),
                message: format!("malformed field {idx}: expected {expected} but got {found}"),
            });
        }
    }
    Ok(())
}

/// Splits a data line into its 14 fields
///
/// # Errors
///
/// [`HpoError::FieldCount`] if the line does not have exactly 14 fields
pub fn split_line(line: &str, line_number: usize) -> HpoResult<[&str; SMALL_FILE_FIELDS]> {
    let mut fields = [""; SMALL_FILE_FIELDS];
    let mut found = 0;
    for (idx, field) in line.split('\t').enumerate() {
        if idx < SMALL_FILE_FIELDS {
            fields[idx] = field;
        }
        found += 1;
    }
    if found != SMALL_FILE_FIELDS {
        return Err(HpoError::FieldCount {
            line: line_number,
            found,
        });
    }
    Ok(fields)
}

/// Reads the header and all data lines of a small file
///
/// Empty lines are skipped.
///
/// # Errors
///
/// - [`HpoError::CannotOpenFile`]: The file is missing, unreadable or empty
/// - [`HpoError::HeaderSchemaMismatch`]: The header does not match [`SMALL_FILE_HEADER`]
/// - [`HpoError::FieldCount`]: A line does not contain 14 fields
pub fn read_small_file<P: AsRef<Path>>(path: P) -> HpoResult<Vec<RawLine>> {
    let filename = path.as_ref().display().to_string();
    let file = File::open(path).map_err(|_| HpoError::CannotOpenFile(filename.clone()))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let Some(Ok(header)) = lines.next() else {
        return Err(HpoError::CannotOpenFile(filename));
    };
    let basename = basename(&filename);
    check_header(basename, header.trim_end_matches('\r'))?;

    let mut res = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line.map_err(|_| HpoError::CannotOpenFile(filename.clone()))?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let line_number = idx + 2;
        split_line(line, line_number)?;
        res.push(RawLine {
            line_number,
            text: line.to_string(),
        });
    }
    Ok(res)
}

/// Converts a file name like `OMIM-600123.tab` into the disease CURIE `OMIM:600123`
pub fn disease_curie_from_filename(filename: &str) -> Option<String> {
    let stem = basename(filename).strip_suffix(".tab")?;
    let (prefix, id) = stem.split_once('-')?;
    if prefix.is_empty() || id.is_empty() {
        return None;
    }
    Some(format!("{prefix}:{id}"))
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn valid_header() {
        let header = SMALL_FILE_HEADER.join("\t");
        assert!(check_header("OMIM-100050.tab", &header).is_ok());
    }

    #[test]
    fn header_with_wrong_column() {
        let header = SMALL_FILE_HEADER.join("\t").replace("onsetName", "onsetLabel");
        let err = check_header("OMIM-100050.tab", &header).unwrap_err();
        assert_eq!(
            err,
            HpoError::HeaderSchemaMismatch {
                file: "OMIM-100050.tab".to_string(),
                message: "malformed field 5: expected onsetName but got onsetLabel".to_string()
            }
        );
    }

    #[test]
    fn header_is_whitespace_sensitive() {
        let header = SMALL_FILE_HEADER.join("\t") + " ";
        assert!(check_header("x.tab", &header).is_err());
        let header = SMALL_FILE_HEADER.join("    ");
        assert!(check_header("x.tab", &header).is_err());
    }

    #[test]
    fn split_correct_line() {
        let line = "OMIM:100050\tAarskog\tHP:0001250\tSeizure\t\t\t2/4\t\t\t\t\tOMIM:100050\tIEA\tHPO:probinson[2013-01-09]";
        let fields = split_line(line, 2).expect("line has 14 fields");
        assert_eq!(fields[0], "OMIM:100050");
        assert_eq!(fields[6], "2/4");
        assert_eq!(fields[13], "HPO:probinson[2013-01-09]");
    }

    #[test]
    fn split_short_line() {
        let line = "OMIM:100050\tAarskog\tHP:0001250";
        assert_eq!(
            split_line(line, 7),
            Err(HpoError::FieldCount { line: 7, found: 3 })
        );
    }

    #[test]
    fn filename_to_curie() {
        assert_eq!(
            disease_curie_from_filename("OMIM-600123.tab"),
            Some("OMIM:600123".to_string())
        );
        assert_eq!(
            disease_curie_from_filename("/data/DECIPHER-1.tab"),
            Some("DECIPHER:1".to_string())
        );
        assert_eq!(disease_curie_from_filename("OMIM-600123.txt"), None);
        assert_eq!(disease_curie_from_filename("README.tab"), None);
    }

    #[test]
    fn read_fixture() {
        let lines = read_small_file("tests/smallfiles/OMIM-100050.tab").expect("fixture is valid");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].line_number, 2);
    }

    #[test]
    fn read_bad_header() {
        assert!(matches!(
            read_small_file("tests/malformed/OMIM-999999.tab"),
            Err(HpoError::HeaderSchemaMismatch { .. })
        ));
    }
}
