use serde::Deserialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::models::{DepartmentImport, NewCourseRequest, Semester};
use crate::slug;

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    title: Option<String>,
    description: Option<String>,
    csv: Option<String>,
}

/// Parse the JSON manifest listing departments and their course files.
/// Entries missing a required property, or whose title produces no slug,
/// are warned about and skipped; a manifest that is not a JSON array
/// yields an empty list.
pub fn parse_manifest(input: &str) -> Vec<DepartmentImport> {
    let parsed: Value = match serde_json::from_str(input) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("unable to parse manifest: {}", e);
            return Vec::new();
        }
    };

    let Some(entries) = parsed.as_array() else {
        error!("manifest is not a JSON array");
        return Vec::new();
    };

    let mut items = Vec::new();
    for raw in entries {
        let entry: ManifestEntry = match serde_json::from_value(raw.clone()) {
            Ok(entry) => entry,
            Err(_) => {
                warn!("manifest entry is not an object, skipping");
                continue;
            }
        };

        let (Some(title), Some(description), Some(csv)) =
            (entry.title, entry.description, entry.csv)
        else {
            warn!("manifest entry missing required properties, skipping");
            continue;
        };

        let Some(slug) = slug::slugify(&title) else {
            warn!("no slug could be derived from {:?}, skipping", title);
            continue;
        };

        items.push(DepartmentImport {
            title,
            slug,
            description,
            csv,
        });
    }

    items
}

/// Decode a legacy ISO-8859-1 byte stream. Every byte maps to the Unicode
/// code point of the same value, which covers the Icelandic characters in
/// the historical exports. Data compatibility requirement, preserved
/// exactly.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Parse one `;`-delimited course line: `code;title;units;semester;level;url`.
/// Lines missing code or title, with units that do not survive the strict
/// numeric round-trip, or with an unknown semester are invalid and yield
/// `None`. Empty level and url fields map to absent values.
pub fn parse_course_line(line: &str) -> Option<NewCourseRequest> {
    let mut parts = line.split(';');
    let course_id = parts.next().unwrap_or("").trim();
    let title = parts.next().unwrap_or("").trim();
    let units = parts.next().unwrap_or("").trim();
    let semester = parts.next().unwrap_or("").trim();
    let level = parts.next().unwrap_or("").trim();
    let url = parts.next().unwrap_or("").trim();

    if course_id.is_empty() || title.is_empty() {
        return None;
    }

    let units = parse_units(units)?;
    let semester = Semester::from_value(semester)?;

    Some(NewCourseRequest {
        course_id: course_id.to_string(),
        title: title.to_string(),
        units: Some(units),
        semester,
        level: (!level.is_empty()).then(|| level.to_string()),
        url: (!url.is_empty()).then(|| url.to_string()),
    })
}

/// Units come from exports that use the Icelandic decimal comma; a `.` in
/// the raw field marks a malformed value and the parsed number must
/// round-trip back to the exact input.
fn parse_units(raw: &str) -> Option<f64> {
    if raw.contains('.') {
        return None;
    }

    let formatted = raw.replace(',', ".");
    let parsed: f64 = formatted.parse().ok()?;

    if parsed < 0.0 || formatted != parsed.to_string() {
        return None;
    }

    Some(parsed)
}
