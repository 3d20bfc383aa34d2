//! Printable HTML documents: result sheets, merit lists, admit cards, and
//! seat plans. Rendered server-side as standalone pages with inline print
//! CSS; all user-supplied text is escaped.

use std::fmt::Write;

use crate::entities::{class_config, exam, student};
use crate::services::results::{BehaviorSheet, ClassResults};

/// Minimal HTML escaping for text nodes and attribute values.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const PRINT_CSS: &str = "\
body { font-family: 'Times New Roman', serif; margin: 24px; color: #000; }\n\
h1 { font-size: 20px; text-align: center; margin: 0 0 4px 0; }\n\
h2 { font-size: 15px; text-align: center; margin: 0 0 16px 0; font-weight: normal; }\n\
table { border-collapse: collapse; width: 100%; font-size: 12px; }\n\
th, td { border: 1px solid #444; padding: 4px 6px; text-align: left; }\n\
th { background: #eee; }\n\
.num { text-align: right; }\n\
.card { border: 1px solid #444; padding: 16px; margin-bottom: 16px; page-break-inside: avoid; }\n\
.card h3 { margin: 0 0 8px 0; font-size: 14px; text-align: center; }\n\
.card p { margin: 2px 0; font-size: 12px; }\n\
.seat { display: inline-block; border: 1px solid #444; padding: 12px 18px; margin: 6px; text-align: center; }\n\
@media print { body { margin: 0; } }\n";

fn document(title: &str, subtitle: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>{title}</title>\n<style>\n{css}</style>\n</head>\n<body>\n\
<h1>{title}</h1>\n<h2>{subtitle}</h2>\n{body}</body>\n</html>\n",
        title = html_escape(title),
        subtitle = html_escape(subtitle),
        css = PRINT_CSS,
        body = body,
    )
}

fn class_label(class: &class_config::Model) -> String {
    match &class.section {
        Some(section) => format!("{} ({})", class.class_name, section),
        None => class.class_name.clone(),
    }
}

fn cohort_subtitle(exam: &exam::Model, class: &class_config::Model) -> String {
    format!("{} — {}", exam.name, class_label(class))
}

/// Full result sheet: one row per student, one column per subject, then
/// totals, percentage, grade, and merit position.
pub fn result_sheet_document(school_name: &str, sheet: &ClassResults) -> String {
    let mut body = String::from("<table>\n<thead><tr><th>Roll</th><th>Name</th>");
    let subjects: Vec<&str> = sheet
        .results
        .first()
        .map(|r| r.subjects.iter().map(|s| s.subject_name.as_str()).collect())
        .unwrap_or_default();
    for subject in &subjects {
        let _ = write!(body, "<th class=\"num\">{}</th>", html_escape(subject));
    }
    body.push_str(
        "<th class=\"num\">Total</th><th class=\"num\">%</th><th>Grade</th>\
<th class=\"num\">Merit</th></tr></thead>\n<tbody>\n",
    );

    for row in &sheet.results {
        let _ = write!(
            body,
            "<tr><td class=\"num\">{}</td><td>{}</td>",
            row.roll_no,
            html_escape(&row.name)
        );
        for subject in &row.subjects {
            if subject.is_absent {
                body.push_str("<td class=\"num\">AB</td>");
            } else {
                let _ = write!(body, "<td class=\"num\">{}</td>", subject.obtained);
            }
        }
        let _ = write!(
            body,
            "<td class=\"num\">{}</td><td class=\"num\">{}</td><td>{}</td>\
<td class=\"num\">{}</td></tr>\n",
            row.total_obtained,
            row.percentage,
            html_escape(row.grade.as_deref().unwrap_or("N/A")),
            row.merit_position,
        );
    }
    body.push_str("</tbody>\n</table>\n");

    document(
        &format!("{} — Result Sheet", school_name),
        &cohort_subtitle(&sheet.exam, &sheet.class_config),
        &body,
    )
}

/// Merit list ordered by rank.
pub fn merit_list_document(school_name: &str, sheet: &ClassResults) -> String {
    let mut rows: Vec<_> = sheet.results.iter().collect();
    rows.sort_by_key(|r| r.merit_position);

    let mut body = String::from(
        "<table>\n<thead><tr><th class=\"num\">Merit</th><th class=\"num\">Roll</th>\
<th>Name</th><th class=\"num\">Total</th><th class=\"num\">%</th><th>Grade</th></tr></thead>\n<tbody>\n",
    );
    for row in rows {
        let _ = write!(
            body,
            "<tr><td class=\"num\">{}</td><td class=\"num\">{}</td><td>{}</td>\
<td class=\"num\">{}</td><td class=\"num\">{}</td><td>{}</td></tr>\n",
            row.merit_position,
            row.roll_no,
            html_escape(&row.name),
            row.total_obtained,
            row.percentage,
            html_escape(row.grade.as_deref().unwrap_or("N/A")),
        );
    }
    body.push_str("</tbody>\n</table>\n");

    document(
        &format!("{} — Merit List", school_name),
        &cohort_subtitle(&sheet.exam, &sheet.class_config),
        &body,
    )
}

/// One admit card per student of the cohort.
pub fn admit_cards_document(
    school_name: &str,
    year_label: &str,
    exam: &exam::Model,
    class: &class_config::Model,
    students: &[student::Model],
) -> String {
    let mut body = String::new();
    for student in students {
        let _ = write!(
            body,
            "<div class=\"card\">\n<h3>Admit Card</h3>\n\
<p><strong>Name:</strong> {}</p>\n<p><strong>Roll No:</strong> {}</p>\n\
<p><strong>Class:</strong> {}</p>\n<p><strong>Exam:</strong> {}</p>\n\
<p><strong>Academic Year:</strong> {}</p>\n</div>\n",
            html_escape(&student.name),
            student.roll_no,
            html_escape(&class_label(class)),
            html_escape(&exam.name),
            html_escape(year_label),
        );
    }

    document(
        &format!("{} — Admit Cards", school_name),
        &cohort_subtitle(exam, class),
        &body,
    )
}

/// Seat labels, one per student.
pub fn seat_plan_document(
    school_name: &str,
    exam: &exam::Model,
    class: &class_config::Model,
    students: &[student::Model],
) -> String {
    let mut body = String::new();
    for student in students {
        let _ = write!(
            body,
            "<div class=\"seat\"><strong>Roll {}</strong><br>{}<br>{}</div>\n",
            student.roll_no,
            html_escape(&student.name),
            html_escape(&class_label(class)),
        );
    }

    document(
        &format!("{} — Seat Plan", school_name),
        &cohort_subtitle(exam, class),
        &body,
    )
}

/// Behavior report with one column per mark type.
pub fn behavior_sheet_document(school_name: &str, sheet: &BehaviorSheet) -> String {
    let mut body = String::from("<table>\n<thead><tr><th class=\"num\">Roll</th><th>Name</th>");
    for mark_type in &sheet.mark_types {
        let _ = write!(body, "<th class=\"num\">{}</th>", html_escape(&mark_type.name));
    }
    body.push_str("<th class=\"num\">Total</th></tr></thead>\n<tbody>\n");

    for row in &sheet.rows {
        let _ = write!(
            body,
            "<tr><td class=\"num\">{}</td><td>{}</td>",
            row.roll_no,
            html_escape(&row.name)
        );
        for cell in &row.cells {
            let _ = write!(body, "<td class=\"num\">{}</td>", cell.mark);
        }
        let _ = write!(body, "<td class=\"num\">{}</td></tr>\n", row.total);
    }
    body.push_str("</tbody>\n</table>\n");

    document(
        &format!("{} — Behavior Report", school_name),
        &cohort_subtitle(&sheet.exam, &sheet.class_config),
        &body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::results::{StudentResult, SubjectResult};
    use rust_decimal_macros::dec;

    fn sample_exam() -> exam::Model {
        exam::Model {
            id: 1,
            name: "First Terminal".to_string(),
            academic_year_id: 1,
            start_date: None,
        }
    }

    fn sample_class() -> class_config::Model {
        class_config::Model {
            id: 1,
            class_name: "Class Five".to_string(),
            section: Some("A".to_string()),
            academic_year_id: 1,
        }
    }

    fn sample_sheet() -> ClassResults {
        ClassResults {
            exam: sample_exam(),
            class_config: sample_class(),
            results: vec![StudentResult {
                student_id: 10,
                name: "Rahim <script>".to_string(),
                roll_no: 7,
                subjects: vec![SubjectResult {
                    subject_config_id: 1,
                    subject_name: "Arabic".to_string(),
                    max_mark: dec!(100),
                    pass_mark: dec!(33),
                    is_compulsory: true,
                    obtained: dec!(85),
                    is_absent: false,
                    passed: true,
                }],
                total_obtained: dec!(85),
                total_max: dec!(100),
                percentage: dec!(85.00),
                failed: false,
                grade: Some("A+".to_string()),
                grade_point: Some(dec!(5.00)),
                merit_position: 1,
            }],
        }
    }

    #[test]
    fn escapes_markup_in_text() {
        assert_eq!(html_escape("a & b < c"), "a &amp; b &lt; c");
        assert_eq!(html_escape("\"x\"'y'"), "&quot;x&quot;&#39;y&#39;");
    }

    #[test]
    fn result_sheet_contains_rows_and_escapes_names() {
        let html = result_sheet_document("Dar Al Noor", &sample_sheet());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Rahim &lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("Arabic"));
        assert!(html.contains("A+"));
        assert!(html.contains("First Terminal"));
        assert!(html.contains("Class Five (A)"));
    }

    #[test]
    fn merit_list_orders_by_rank() {
        let mut sheet = sample_sheet();
        let mut second = sheet.results[0].clone();
        second.name = "Karim".to_string();
        second.roll_no = 2;
        second.merit_position = 2;
        sheet.results.insert(0, second);

        let html = merit_list_document("Dar Al Noor", &sheet);
        let first = html.find("Rahim").unwrap();
        let second = html.find("Karim").unwrap();
        assert!(first < second);
    }

    #[test]
    fn admit_cards_render_one_card_per_student() {
        let students = vec![
            student::Model {
                id: 1,
                name: "Rahim".to_string(),
                roll_no: 1,
                class_config_id: 1,
                academic_year_id: 1,
            },
            student::Model {
                id: 2,
                name: "Karim".to_string(),
                roll_no: 2,
                class_config_id: 1,
                academic_year_id: 1,
            },
        ];
        let html = admit_cards_document(
            "Dar Al Noor",
            "2025",
            &sample_exam(),
            &sample_class(),
            &students,
        );
        assert_eq!(html.matches("Admit Card</h3>").count(), 2);
        assert!(html.contains("Academic Year:</strong> 2025"));
    }

    #[test]
    fn seat_plan_renders_roll_labels() {
        let students = vec![student::Model {
            id: 1,
            name: "Rahim".to_string(),
            roll_no: 9,
            class_config_id: 1,
            academic_year_id: 1,
        }];
        let html = seat_plan_document("Dar Al Noor", &sample_exam(), &sample_class(), &students);
        assert!(html.contains("Roll 9"));
        assert!(html.contains("Seat Plan"));
    }
}
