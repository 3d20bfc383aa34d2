//! Grade band boundary cases against a standard grading ladder.

use std::collections::HashMap;

use rstest::rstest;
use rust_decimal::Decimal;

use madrasa_api::entities::{grade_rule, subject_mark_config};
use madrasa_api::services::results::{compute_results, MarkEntry, StudentInput};

fn ladder() -> Vec<grade_rule::Model> {
    let band = |id, name: &str, min: &str, max: &str| grade_rule::Model {
        id,
        grade_name: name.to_string(),
        min_mark: min.parse().unwrap(),
        max_mark: max.parse().unwrap(),
        grade_point: None,
        remarks: None,
    };
    vec![
        band(1, "A+", "80", "100"),
        band(2, "A", "70", "79.99"),
        band(3, "B", "60", "69.99"),
        band(4, "C", "33", "59.99"),
        band(5, "F", "0", "32.99"),
    ]
}

fn one_subject_cohort(obtained: &str) -> (Vec<subject_mark_config::Model>, Vec<StudentInput>) {
    let configs = vec![subject_mark_config::Model {
        id: 1,
        exam_id: 1,
        class_config_id: 1,
        subject_name: "Arabic".to_string(),
        max_mark: Decimal::from(100),
        pass_mark: Decimal::from(33),
        is_compulsory: true,
    }];
    let students = vec![StudentInput {
        student_id: 1,
        name: "Student".to_string(),
        roll_no: 1,
        marks: HashMap::from([(
            1,
            MarkEntry {
                obtained: obtained.parse().unwrap(),
                is_absent: false,
            },
        )]),
    }];
    (configs, students)
}

#[rstest]
#[case("100", "A+")]
#[case("80", "A+")]
#[case("79.99", "A")]
#[case("70", "A")]
#[case("69.99", "B")]
#[case("60", "B")]
#[case("59.99", "C")]
#[case("33", "C")]
fn band_edges_resolve_to_expected_grade(#[case] obtained: &str, #[case] expected: &str) {
    let (configs, students) = one_subject_cohort(obtained);
    let results = compute_results(&configs, &ladder(), &students);
    assert_eq!(results[0].grade.as_deref(), Some(expected));
    assert!(!results[0].failed);
}

#[rstest]
#[case("32.99")]
#[case("0")]
fn below_pass_mark_is_fail_regardless_of_band(#[case] obtained: &str) {
    let (configs, students) = one_subject_cohort(obtained);
    let results = compute_results(&configs, &ladder(), &students);
    assert!(results[0].failed);
    assert_eq!(results[0].grade.as_deref(), Some("Fail"));
}
