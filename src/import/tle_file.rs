use std::fs;
use std::path::PathBuf;

use crate::import::ImportError;

// Columns of line 1 holding the launch year + launch number of the designator.
const INTDES_COLUMNS: std::ops::Range<usize> = 9..14;

/// One two-line element set, kept as raw text until propagation needs it.
#[derive(Debug, Clone)]
pub struct Tle {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl Tle {
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("NORAD {}", self.line1[2..7].trim()),
        }
    }

    /// Launch year + launch number portion of line 1, e.g. "24012".
    pub fn designator_number(&self) -> &str {
        &self.line1[INTDES_COLUMNS]
    }

    pub fn elements(&self) -> Result<sgp4::Elements, ImportError> {
        sgp4::Elements::from_tle(
            self.name.clone(),
            self.line1.as_bytes(),
            self.line2.as_bytes(),
        )
        .map_err(|e| ImportError::InvalidTle {
            name: self.display_name(),
            message: e.to_string(),
        })
    }
}

/// Source of element sets for one launch batch.
pub trait TleImporter {
    /// All element sets whose international designator matches.
    fn fetch_batch(&self, international_designator: &str) -> Result<Vec<Tle>, ImportError>;

    /// A single element set by satellite name.
    fn fetch_satellite(&self, name: &str) -> Result<Tle, ImportError>;
}

/// Importer over a local multi-TLE text file.
pub struct TleFileImporter {
    path: PathBuf,
}

impl TleFileImporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TleImporter for TleFileImporter {
    fn fetch_batch(&self, international_designator: &str) -> Result<Vec<Tle>, ImportError> {
        let number = designator_number(international_designator).ok_or_else(|| {
            ImportError::InvalidDesignator(international_designator.to_string())
        })?;

        let content = fs::read_to_string(&self.path)?;
        let matches: Vec<Tle> = parse_multi_tle(&content)
            .into_iter()
            .filter(|tle| tle.designator_number() == number)
            .collect();

        if matches.is_empty() {
            return Err(ImportError::NoSuchDesignator(
                international_designator.to_string(),
            ));
        }
        Ok(matches)
    }

    fn fetch_satellite(&self, name: &str) -> Result<Tle, ImportError> {
        let content = fs::read_to_string(&self.path)?;
        parse_multi_tle(&content)
            .into_iter()
            .find(|tle| tle.name.as_deref() == Some(name))
            .ok_or_else(|| ImportError::NoSuchSatellite(name.to_string()))
    }
}

/// Validate "5 digits + up to 3 uppercase letters" and return the digits.
fn designator_number(designator: &str) -> Option<&str> {
    if designator.len() < 5 || designator.len() > 8 {
        return None;
    }
    let (digits, piece) = designator.split_at(5);
    if digits.chars().all(|c| c.is_ascii_digit()) && piece.chars().all(|c| c.is_ascii_uppercase())
    {
        Some(digits)
    } else {
        None
    }
}

/// Parse multi-satellite TLE content (2-line and named 3-line sets).
fn parse_multi_tle(content: &str) -> Vec<Tle> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim_end())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if is_element_line(lines[i], "1 ") && i + 1 < lines.len() && is_element_line(lines[i + 1], "2 ")
        {
            result.push(Tle {
                name: None,
                line1: lines[i].to_string(),
                line2: lines[i + 1].to_string(),
            });
            i += 2;
        } else if i + 2 < lines.len()
            && is_element_line(lines[i + 1], "1 ")
            && is_element_line(lines[i + 2], "2 ")
        {
            result.push(Tle {
                name: Some(lines[i].trim().to_string()),
                line1: lines[i + 1].to_string(),
                line2: lines[i + 2].to_string(),
            });
            i += 3;
        } else {
            i += 1; // Skip unknown line
        }
    }

    result
}

fn is_element_line(line: &str, prefix: &str) -> bool {
    line.len() >= 69 && line.starts_with(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_NAME: &str = "ISS (ZARYA)";
    const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    fn three_line_fixture() -> String {
        format!("{ISS_NAME}\n{ISS_LINE1}\n{ISS_LINE2}\n")
    }

    #[test]
    fn parses_named_three_line_sets() {
        let tles = parse_multi_tle(&three_line_fixture());
        assert_eq!(tles.len(), 1);
        assert_eq!(tles[0].name.as_deref(), Some(ISS_NAME));
        assert_eq!(tles[0].designator_number(), "98067");
    }

    #[test]
    fn parses_bare_two_line_sets() {
        let content = format!("{ISS_LINE1}\n{ISS_LINE2}\n");
        let tles = parse_multi_tle(&content);
        assert_eq!(tles.len(), 1);
        assert!(tles[0].name.is_none());
        assert_eq!(tles[0].display_name(), "NORAD 25544");
    }

    #[test]
    fn skips_junk_between_sets() {
        let content = format!("# comment\n\n{ISS_NAME}\n{ISS_LINE1}\n{ISS_LINE2}\n");
        assert_eq!(parse_multi_tle(&content).len(), 1);
    }

    #[test]
    fn designator_number_accepts_piece_suffix() {
        assert_eq!(designator_number("98067"), Some("98067"));
        assert_eq!(designator_number("98067A"), Some("98067"));
        assert_eq!(designator_number("98067ABC"), Some("98067"));
        assert_eq!(designator_number("9806"), None);
        assert_eq!(designator_number("98067abcd"), None);
        assert_eq!(designator_number("9806xA"), None);
    }

    #[test]
    fn tle_parses_into_elements() {
        let tles = parse_multi_tle(&three_line_fixture());
        let elements = tles[0].elements().unwrap();
        assert_eq!(elements.norad_id, 25544);
    }
}
