pub mod academic_year;
pub mod account_group_category;
pub mod account_subcategory;
pub mod behavior_mark;
pub mod class_config;
pub mod contra;
pub mod exam;
pub mod grade_rule;
pub mod journal;
pub mod journal_line;
pub mod ledger;
pub mod mark_type;
pub mod payment;
pub mod student;
pub mod subject_mark;
pub mod subject_mark_config;
pub mod user;

pub use ledger::BalanceSide;
