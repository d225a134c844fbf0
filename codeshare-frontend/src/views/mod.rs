//! Plain-text rendering for the terminal front-end.

use crate::catalog::StaticContentCatalog;
use crate::models::{FileRecord, StoredFile};

pub const EMPTY_ROW: &str = "No files available";

/// Shown in the date column when a record has no usable date.
pub const MISSING_DATE: &str = "-";

/// Search results table. `url_for` maps a stored file name to its download URL.
pub fn render_results(records: &[FileRecord], url_for: impl Fn(&str) -> String) -> String {
    let mut out = format!(
        "{:<32} {:<20} {:<10} {:<6} {}\n",
        "File Name", "Person Name", "Date", "Type", "Link"
    );

    if records.is_empty() {
        out.push_str(EMPTY_ROW);
        out.push('\n');
        return out;
    }

    for record in records {
        out.push_str(&format!(
            "{:<32} {:<20} {:<10} {:<6} {}\n",
            record.file,
            record.name,
            record
                .date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| MISSING_DATE.to_string()),
            record.extension(),
            url_for(&record.file)
        ));
    }
    out
}

/// Admin listing table.
pub fn render_listing(files: &[StoredFile], url_for: impl Fn(&str) -> String) -> String {
    let mut out = format!(
        "{:<32} {:<24} {:>10} {:<10} {}\n",
        "Filename", "Type", "Size", "Modified", "File"
    );

    if files.is_empty() {
        out.push_str(EMPTY_ROW);
        out.push('\n');
        return out;
    }

    for file in files {
        let size = file
            .size
            .map(|size| size.to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{:<32} {:<24} {:>10} {:<10} {}\n",
            file.filename,
            file.file_type.as_deref().unwrap_or(""),
            size,
            file.modified.format("%Y-%m-%d"),
            url_for(&file.file)
        ));
    }
    out
}

/// Numbered course list with the week labels each course offers.
pub fn render_courses(catalog: &StaticContentCatalog) -> String {
    let weeks = catalog.week_labels().join(" | ");
    catalog
        .courses()
        .iter()
        .enumerate()
        .map(|(index, course)| format!("{}. {}\n   {}\n", index + 1, course, weeks))
        .collect()
}

pub fn render_week(course: &str, week: &str, topics: &[String]) -> String {
    let mut out = format!("{} - {}\n", course, week);
    for topic in topics {
        out.push_str(&format!("  - {}\n", topic));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn empty_results_render_placeholder_row() {
        let table = render_results(&[], |file| file.to_string());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("File Name"));
        assert_eq!(lines[1], EMPTY_ROW);
    }

    #[test]
    fn result_rows_show_date_type_and_link() {
        let records = vec![FileRecord {
            file: "1717-report.pdf".to_string(),
            name: "Alice".to_string(),
            date: Some(Utc.with_ymd_and_hms(2024, 5, 29, 16, 26, 40).unwrap()),
            mime_type: Some("application/pdf".to_string()),
        }];

        let table = render_results(&records, |file| format!("http://host/uploads/{}", file));

        assert!(table.contains("2024-05-29"));
        assert!(table.contains(" pdf "));
        assert!(table.contains("http://host/uploads/1717-report.pdf"));
    }

    #[test]
    fn rows_without_date_still_render() {
        let records = vec![FileRecord {
            file: "undated.pdf".to_string(),
            name: "Ben".to_string(),
            date: None,
            mime_type: None,
        }];

        let table = render_results(&records, |file| format!("http://host/uploads/{}", file));
        let row = table.lines().nth(1).unwrap();

        assert!(row.starts_with("undated.pdf"));
        assert!(row.contains(&format!(" {:<10} ", MISSING_DATE)));
        assert!(row.ends_with("http://host/uploads/undated.pdf"));
    }

    #[test]
    fn courses_are_numbered_from_one() {
        let text = render_courses(StaticContentCatalog::global());
        assert!(text.starts_with("1. Design and Implementation"));
        assert!(text.contains("6. Course 6"));
    }

    #[test]
    fn week_view_lists_topics() {
        let text = render_week("Course 3", "Week 2", &["A".to_string(), "B".to_string()]);
        assert_eq!(text, "Course 3 - Week 2\n  - A\n  - B\n");
    }
}
