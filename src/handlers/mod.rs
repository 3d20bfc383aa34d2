pub mod academic_years;
pub mod account_categories;
pub mod behavior_marks;
pub mod class_configs;
pub mod common;
pub mod contras;
pub mod exams;
pub mod grade_rules;
pub mod journals;
pub mod ledgers;
pub mod mark_types;
pub mod payments;
pub mod reports;
pub mod students;
pub mod subject_mark_configs;
pub mod subject_marks;
