//! Result, grade, and merit computation.
//!
//! The arithmetic lives in [`compute_results`], a pure function over a
//! cohort's subject configs, grade bands, and per-student marks. The async
//! functions below only assemble its inputs from the database.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;

use crate::entities::{
    behavior_mark, class_config, exam, grade_rule, mark_type, student, subject_mark,
    subject_mark_config,
};
use crate::errors::ServiceError;

/// One recorded mark, keyed by subject config id in [`StudentInput::marks`].
#[derive(Debug, Clone, Copy)]
pub struct MarkEntry {
    pub obtained: Decimal,
    pub is_absent: bool,
}

#[derive(Debug, Clone)]
pub struct StudentInput {
    pub student_id: i64,
    pub name: String,
    pub roll_no: i32,
    pub marks: HashMap<i64, MarkEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectResult {
    pub subject_config_id: i64,
    pub subject_name: String,
    pub max_mark: Decimal,
    pub pass_mark: Decimal,
    pub is_compulsory: bool,
    pub obtained: Decimal,
    pub is_absent: bool,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentResult {
    pub student_id: i64,
    pub name: String,
    pub roll_no: i32,
    pub subjects: Vec<SubjectResult>,
    pub total_obtained: Decimal,
    pub total_max: Decimal,
    pub percentage: Decimal,
    pub failed: bool,
    /// `None` when the percentage falls in a gap between grade bands;
    /// rendered as "N/A".
    pub grade: Option<String>,
    pub grade_point: Option<Decimal>,
    /// 1-based rank by descending total_obtained.
    pub merit_position: u32,
}

/// Computed rows for a whole exam/class cohort, returned in roll order.
#[derive(Debug, Serialize)]
pub struct ClassResults {
    pub exam: exam::Model,
    pub class_config: class_config::Model,
    pub results: Vec<StudentResult>,
}

/// First band whose inclusive [min_mark, max_mark] range contains the
/// percentage.
pub fn grade_for_percentage(
    rules: &[grade_rule::Model],
    percentage: Decimal,
) -> Option<&grade_rule::Model> {
    rules.iter().find(|r| r.contains(percentage))
}

/// Compute per-student totals, percentage, pass/fail, grade, and merit
/// position. Marks missing from a student's map and absences both count as
/// zero obtained; a student fails when any compulsory subject is absent or
/// below its pass mark. Results come back in the order students were given.
pub fn compute_results(
    configs: &[subject_mark_config::Model],
    grade_rules: &[grade_rule::Model],
    students: &[StudentInput],
) -> Vec<StudentResult> {
    let total_max: Decimal = configs.iter().map(|c| c.max_mark).sum();

    let mut results: Vec<StudentResult> = students
        .iter()
        .map(|student| {
            let mut subjects = Vec::with_capacity(configs.len());
            let mut total_obtained = Decimal::ZERO;
            let mut failed = false;

            for config in configs {
                let entry = student.marks.get(&config.id);
                let is_absent = entry.map(|e| e.is_absent).unwrap_or(false);
                let obtained = match entry {
                    Some(e) if !e.is_absent => e.obtained,
                    _ => Decimal::ZERO,
                };
                let passed = !is_absent && obtained >= config.pass_mark;
                if config.is_compulsory && !passed {
                    failed = true;
                }
                total_obtained += obtained;
                subjects.push(SubjectResult {
                    subject_config_id: config.id,
                    subject_name: config.subject_name.clone(),
                    max_mark: config.max_mark,
                    pass_mark: config.pass_mark,
                    is_compulsory: config.is_compulsory,
                    obtained,
                    is_absent,
                    passed,
                });
            }

            let mut percentage = if total_max.is_zero() {
                Decimal::ZERO
            } else {
                (total_obtained * Decimal::ONE_HUNDRED / total_max).round_dp(2)
            };
            // Fixed two-decimal scale so "80" serializes as "80.00".
            percentage.rescale(2);

            let (grade, grade_point) = if failed {
                (Some("Fail".to_string()), None)
            } else {
                match grade_for_percentage(grade_rules, percentage) {
                    Some(rule) => (Some(rule.grade_name.clone()), rule.grade_point),
                    None => (None, None),
                }
            };

            StudentResult {
                student_id: student.student_id,
                name: student.name.clone(),
                roll_no: student.roll_no,
                subjects,
                total_obtained,
                total_max,
                percentage,
                failed,
                grade,
                grade_point,
                merit_position: 0,
            }
        })
        .collect();

    // Merit rank: descending total, stable sort keeps input order on ties.
    let mut order: Vec<usize> = (0..results.len()).collect();
    order.sort_by(|&a, &b| results[b].total_obtained.cmp(&results[a].total_obtained));
    for (rank, idx) in order.into_iter().enumerate() {
        results[idx].merit_position = rank as u32 + 1;
    }

    results
}

async fn load_exam(db: &DatabaseConnection, exam_id: i64) -> Result<exam::Model, ServiceError> {
    exam::Entity::find_by_id(exam_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Exam {} not found", exam_id)))
}

async fn load_class_config(
    db: &DatabaseConnection,
    class_config_id: i64,
) -> Result<class_config::Model, ServiceError> {
    class_config::Entity::find_by_id(class_config_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Class config {} not found", class_config_id)))
}

/// Compute the full result sheet for an exam/class cohort. Students are
/// ordered by roll number, so ties in merit rank resolve in roll order.
pub async fn class_results(
    db: &DatabaseConnection,
    exam_id: i64,
    class_config_id: i64,
) -> Result<ClassResults, ServiceError> {
    let exam = load_exam(db, exam_id).await?;
    let class = load_class_config(db, class_config_id).await?;

    let configs = subject_mark_config::Entity::find()
        .filter(subject_mark_config::Column::ExamId.eq(exam_id))
        .filter(subject_mark_config::Column::ClassConfigId.eq(class_config_id))
        .order_by_asc(subject_mark_config::Column::Id)
        .all(db)
        .await?;

    let students = student::Entity::find()
        .filter(student::Column::ClassConfigId.eq(class_config_id))
        .order_by_asc(student::Column::RollNo)
        .all(db)
        .await?;

    let grade_rules = grade_rule::Entity::find()
        .order_by_asc(grade_rule::Column::MinMark)
        .all(db)
        .await?;

    let marks = subject_mark::Entity::find()
        .filter(subject_mark::Column::ExamId.eq(exam_id))
        .filter(
            subject_mark::Column::StudentId.is_in(students.iter().map(|s| s.id).collect::<Vec<_>>()),
        )
        .all(db)
        .await?;

    let mut by_student: HashMap<i64, HashMap<i64, MarkEntry>> = HashMap::new();
    for mark in marks {
        by_student.entry(mark.student_id).or_default().insert(
            mark.subject_config_id,
            MarkEntry {
                obtained: mark.obtained_mark,
                is_absent: mark.is_absent,
            },
        );
    }

    let inputs: Vec<StudentInput> = students
        .into_iter()
        .map(|s| StudentInput {
            marks: by_student.remove(&s.id).unwrap_or_default(),
            student_id: s.id,
            name: s.name,
            roll_no: s.roll_no,
        })
        .collect();

    let results = compute_results(&configs, &grade_rules, &inputs);
    Ok(ClassResults {
        exam,
        class_config: class,
        results,
    })
}

/// One student's subject-by-subject breakdown plus computed summary.
pub async fn student_mark_sheet(
    db: &DatabaseConnection,
    exam_id: i64,
    class_config_id: i64,
    student_id: i64,
) -> Result<StudentResult, ServiceError> {
    let sheet = class_results(db, exam_id, class_config_id).await?;
    sheet
        .results
        .into_iter()
        .find(|r| r.student_id == student_id)
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Student {} has no results for exam {}",
                student_id, exam_id
            ))
        })
}

#[derive(Debug, Serialize)]
pub struct BehaviorCell {
    pub mark_type_id: i64,
    pub mark_type_name: String,
    pub max_mark: Decimal,
    pub mark: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BehaviorRow {
    pub student_id: i64,
    pub name: String,
    pub roll_no: i32,
    pub cells: Vec<BehaviorCell>,
    pub total: Decimal,
    pub total_max: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BehaviorSheet {
    pub exam: exam::Model,
    pub class_config: class_config::Model,
    pub mark_types: Vec<mark_type::Model>,
    pub rows: Vec<BehaviorRow>,
}

/// Per-student behavior marks with totals, one column per mark type.
/// Students with no recorded mark for a type get zero.
pub async fn behavior_sheet(
    db: &DatabaseConnection,
    exam_id: i64,
    class_config_id: i64,
) -> Result<BehaviorSheet, ServiceError> {
    let exam = load_exam(db, exam_id).await?;
    let class = load_class_config(db, class_config_id).await?;

    let mark_types = mark_type::Entity::find()
        .order_by_asc(mark_type::Column::Id)
        .all(db)
        .await?;
    let total_max: Decimal = mark_types.iter().map(|t| t.max_mark).sum();

    let students = student::Entity::find()
        .filter(student::Column::ClassConfigId.eq(class_config_id))
        .order_by_asc(student::Column::RollNo)
        .all(db)
        .await?;

    let marks = behavior_mark::Entity::find()
        .filter(behavior_mark::Column::ExamId.eq(exam_id))
        .filter(
            behavior_mark::Column::StudentId
                .is_in(students.iter().map(|s| s.id).collect::<Vec<_>>()),
        )
        .all(db)
        .await?;

    let mut by_student: HashMap<i64, HashMap<i64, Decimal>> = HashMap::new();
    for mark in marks {
        by_student
            .entry(mark.student_id)
            .or_default()
            .insert(mark.mark_type_id, mark.mark);
    }

    let rows = students
        .into_iter()
        .map(|s| {
            let student_marks = by_student.remove(&s.id).unwrap_or_default();
            let cells: Vec<BehaviorCell> = mark_types
                .iter()
                .map(|t| BehaviorCell {
                    mark_type_id: t.id,
                    mark_type_name: t.name.clone(),
                    max_mark: t.max_mark,
                    mark: student_marks.get(&t.id).copied().unwrap_or(Decimal::ZERO),
                })
                .collect();
            let total = cells.iter().map(|c| c.mark).sum();
            BehaviorRow {
                student_id: s.id,
                name: s.name,
                roll_no: s.roll_no,
                cells,
                total,
                total_max,
            }
        })
        .collect();

    Ok(BehaviorSheet {
        exam,
        class_config: class,
        mark_types,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config(
        id: i64,
        subject: &str,
        max: Decimal,
        pass: Decimal,
        compulsory: bool,
    ) -> subject_mark_config::Model {
        subject_mark_config::Model {
            id,
            exam_id: 1,
            class_config_id: 1,
            subject_name: subject.to_string(),
            max_mark: max,
            pass_mark: pass,
            is_compulsory: compulsory,
        }
    }

    fn rule(name: &str, min: Decimal, max: Decimal, point: Decimal) -> grade_rule::Model {
        grade_rule::Model {
            id: 0,
            grade_name: name.to_string(),
            min_mark: min,
            max_mark: max,
            grade_point: Some(point),
            remarks: None,
        }
    }

    fn standard_rules() -> Vec<grade_rule::Model> {
        vec![
            rule("A+", dec!(80), dec!(100), dec!(5.00)),
            rule("A", dec!(70), dec!(79.99), dec!(4.00)),
            rule("B", dec!(60), dec!(69.99), dec!(3.50)),
            rule("C", dec!(40), dec!(59.99), dec!(2.00)),
        ]
    }

    fn student(id: i64, name: &str, roll: i32, marks: &[(i64, Decimal)]) -> StudentInput {
        StudentInput {
            student_id: id,
            name: name.to_string(),
            roll_no: roll,
            marks: marks
                .iter()
                .map(|&(cfg, obtained)| {
                    (
                        cfg,
                        MarkEntry {
                            obtained,
                            is_absent: false,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn totals_percentage_and_grade() {
        let configs = vec![
            config(1, "Arabic", dec!(100), dec!(33), true),
            config(2, "Mathematics", dec!(100), dec!(33), true),
        ];
        let students = vec![student(10, "Rahim", 1, &[(1, dec!(85)), (2, dec!(75))])];

        let results = compute_results(&configs, &standard_rules(), &students);
        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.total_obtained, dec!(160));
        assert_eq!(r.total_max, dec!(200));
        assert_eq!(r.percentage, dec!(80.00));
        assert!(!r.failed);
        assert_eq!(r.grade.as_deref(), Some("A+"));
        assert_eq!(r.grade_point, Some(dec!(5.00)));
        assert_eq!(r.merit_position, 1);
    }

    #[test]
    fn compulsory_fail_marks_student_failed() {
        let configs = vec![
            config(1, "Arabic", dec!(100), dec!(33), true),
            config(2, "Drawing", dec!(50), dec!(17), false),
        ];
        // Below pass in the compulsory subject.
        let students = vec![student(10, "Karim", 1, &[(1, dec!(20)), (2, dec!(45))])];

        let results = compute_results(&configs, &standard_rules(), &students);
        assert!(results[0].failed);
        assert_eq!(results[0].grade.as_deref(), Some("Fail"));
        assert_eq!(results[0].grade_point, None);
    }

    #[test]
    fn optional_subject_fail_does_not_fail_student() {
        let configs = vec![
            config(1, "Arabic", dec!(100), dec!(33), true),
            config(2, "Drawing", dec!(50), dec!(17), false),
        ];
        let students = vec![student(10, "Karim", 1, &[(1, dec!(90)), (2, dec!(5))])];

        let results = compute_results(&configs, &standard_rules(), &students);
        assert!(!results[0].failed);
        assert!(!results[0].subjects[1].passed);
    }

    #[test]
    fn absent_compulsory_subject_fails_even_with_recorded_mark() {
        let configs = vec![config(1, "Arabic", dec!(100), dec!(33), true)];
        let mut s = student(10, "Salma", 1, &[]);
        s.marks.insert(
            1,
            MarkEntry {
                obtained: dec!(70),
                is_absent: true,
            },
        );

        let results = compute_results(&configs, &standard_rules(), &[s]);
        assert!(results[0].failed);
        // Absence zeroes the obtained mark.
        assert_eq!(results[0].subjects[0].obtained, Decimal::ZERO);
        assert_eq!(results[0].total_obtained, Decimal::ZERO);
    }

    #[test]
    fn missing_mark_counts_as_zero() {
        let configs = vec![
            config(1, "Arabic", dec!(100), dec!(33), true),
            config(2, "Mathematics", dec!(100), dec!(33), true),
        ];
        let students = vec![student(10, "Rahim", 1, &[(1, dec!(50))])];

        let results = compute_results(&configs, &standard_rules(), &students);
        assert_eq!(results[0].total_obtained, dec!(50));
        assert!(results[0].failed);
        assert_eq!(results[0].percentage, dec!(25.00));
    }

    #[test]
    fn percentage_always_carries_two_decimal_places() {
        let configs = vec![
            config(1, "Arabic", dec!(100), dec!(33), true),
            config(2, "Mathematics", dec!(100), dec!(33), true),
        ];
        // 160/200 divides exactly; the scale must still be padded.
        let students = vec![
            student(10, "Rahim", 1, &[(1, dec!(85)), (2, dec!(75))]),
            student(11, "Karim", 2, &[(1, dec!(33)), (2, dec!(34))]),
        ];

        let results = compute_results(&configs, &standard_rules(), &students);
        assert_eq!(results[0].percentage.to_string(), "80.00");
        assert_eq!(results[1].percentage.to_string(), "33.50");

        let empty = compute_results(&[], &standard_rules(), &students);
        assert_eq!(empty[0].percentage.to_string(), "0.00");
    }

    #[test]
    fn percentage_is_zero_when_nothing_configured() {
        let students = vec![student(10, "Rahim", 1, &[])];
        let results = compute_results(&[], &standard_rules(), &students);
        assert_eq!(results[0].percentage, Decimal::ZERO);
        assert_eq!(results[0].total_max, Decimal::ZERO);
        assert!(!results[0].failed);
    }

    #[test]
    fn gap_between_bands_yields_no_grade() {
        let configs = vec![config(1, "Arabic", dec!(100), dec!(10), true)];
        // Band list with a hole between 39.99 and 50.
        let rules = vec![
            rule("A", dec!(50), dec!(100), dec!(4.00)),
            rule("B", dec!(0), dec!(39.99), dec!(2.00)),
        ];
        let students = vec![student(10, "Rahim", 1, &[(1, dec!(45))])];

        let results = compute_results(&configs, &rules, &students);
        assert!(!results[0].failed);
        assert_eq!(results[0].grade, None);
    }

    #[test]
    fn merit_ranks_by_total_with_stable_ties() {
        let configs = vec![config(1, "Arabic", dec!(100), dec!(33), true)];
        let students = vec![
            student(1, "First", 1, &[(1, dec!(70))]),
            student(2, "Second", 2, &[(1, dec!(90))]),
            student(3, "Third", 3, &[(1, dec!(70))]),
        ];

        let results = compute_results(&configs, &standard_rules(), &students);
        // Output stays in input (roll) order; positions reflect totals.
        assert_eq!(results[0].merit_position, 2);
        assert_eq!(results[1].merit_position, 1);
        assert_eq!(results[2].merit_position, 3);
    }
}
