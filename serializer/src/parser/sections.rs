//! Section metadata table: `folderName;slug;title`, one section per line.

use std::path::Path;

use super::{read_source, split_fields, IdSequence};
use crate::error::{ParseError, ParseResult, PipelineResult, RowError, RowResult};
use crate::models::SectionMetaData;

/// Parse one metadata row into a section with the given id.
pub fn parse_section_line(fields: &[&str], section_id: u32) -> RowResult<SectionMetaData> {
    let [folder_name, slug, title] = fields else {
        return Err(RowError::ColumnCount {
            kind: "section",
            expected: "3",
            found: fields.len(),
        });
    };

    Ok(SectionMetaData {
        section_id,
        folder_name: (*folder_name).to_string(),
        slug: (*slug).to_string(),
        title: (*title).to_string(),
    })
}

/// Parse a whole metadata table. Every line, blank ones included, must have
/// exactly three fields; ids are assigned from `ids` in line order.
pub fn parse_sections(
    content: &str,
    path: &Path,
    ids: &mut IdSequence,
) -> ParseResult<Vec<SectionMetaData>> {
    let mut sections = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let fields = split_fields(line);
        let section = parse_section_line(&fields, ids.current())
            .and_then(|section| ids.advance().map(|_| section))
            .map_err(|e| ParseError::new(path, line_idx + 1, e))?;

        sections.push(section);
    }

    Ok(sections)
}

/// Read and parse the metadata table at `path`, numbering sections from 1.
pub fn load_sections(path: &Path, encoding: Option<&str>) -> PipelineResult<Vec<SectionMetaData>> {
    let content = read_source(path, encoding)?;
    let mut ids = IdSequence::new();
    Ok(parse_sections(&content, path, &mut ids)?)
}
