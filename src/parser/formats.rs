//! Supported file formats and header detection.

/// The tabular schemas the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Legacy,
    Banner,
    Georgetown,
    Mediasite,
}

/// A supported schema: its name tag and the exact header sequence that
/// identifies it. Arities and orderings are distinct by construction, so at
/// most one schema can match a given header.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub format: FileFormat,
    pub header: &'static [&'static str],
}

/// Static table of the supported schemas. Consulted only by header
/// detection; row normalization addresses fields by fixed index.
pub static SCHEMAS: &[Schema] = &[
    Schema {
        format: FileFormat::Legacy,
        header: &[
            "sessionName",
            "recorderName",
            "recordingDate",
            "startTime",
            "endTime",
            "presenterName",
            "folderName",
        ],
    },
    Schema {
        format: FileFormat::Banner,
        header: &[
            "Seats",
            "Enr",
            "Building",
            "Room",
            "Title",
            "Instructor",
            "Begin Time",
            "End Time",
            "Meeting Days",
            "Meeting Type",
            "Course ID",
            "Section",
        ],
    },
    Schema {
        format: FileFormat::Georgetown,
        header: &[
            "Date Start",
            "Date End",
            "Building",
            "Room",
            "Remote Recorder",
            "Title",
            "Instructor",
            "Begin Time",
            "End Time",
            "Meeting Days",
            "Course ID",
            "Section",
            "Recording Option",
        ],
    },
    Schema {
        format: FileFormat::Mediasite,
        header: &[
            "Day",
            "Class of",
            "Cohort",
            "Date",
            "Start",
            "End",
            "Room",
            "Alias",
            "Alternate Session Title",
            "Notes",
        ],
    },
];

impl FileFormat {
    /// Expected field count for rows of this format.
    pub fn arity(&self) -> usize {
        SCHEMAS
            .iter()
            .find(|s| s.format == *self)
            .map(|s| s.header.len())
            .unwrap_or(0)
    }
}

/// Match a row against the schema table: case-insensitive on each field,
/// sensitive to both ordering and field count.
pub fn detect(fields: &[&str]) -> Option<FileFormat> {
    SCHEMAS
        .iter()
        .find(|schema| {
            schema.header.len() == fields.len()
                && schema
                    .header
                    .iter()
                    .zip(fields)
                    .all(|(expected, actual)| expected.eq_ignore_ascii_case(actual.trim()))
        })
        .map(|schema| schema.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_schema() {
        for schema in SCHEMAS {
            assert_eq!(detect(schema.header), Some(schema.format));
        }
    }

    #[test]
    fn detection_is_case_insensitive() {
        let header: Vec<String> = SCHEMAS[0]
            .header
            .iter()
            .map(|h| h.to_uppercase())
            .collect();
        let fields: Vec<&str> = header.iter().map(String::as_str).collect();
        assert_eq!(detect(&fields), Some(FileFormat::Legacy));
    }

    #[test]
    fn detection_is_order_sensitive() {
        let mut reversed: Vec<&str> = SCHEMAS[0].header.to_vec();
        reversed.reverse();
        assert_eq!(detect(&reversed), None);
    }

    #[test]
    fn wrong_arity_never_matches() {
        let short = &SCHEMAS[1].header[..5];
        assert_eq!(detect(short), None);
    }

    #[test]
    fn arity_matches_header_length() {
        assert_eq!(FileFormat::Legacy.arity(), 7);
        assert_eq!(FileFormat::Banner.arity(), 12);
        assert_eq!(FileFormat::Georgetown.arity(), 13);
        assert_eq!(FileFormat::Mediasite.arity(), 10);
    }
}
