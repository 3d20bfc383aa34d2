//! Property tests over the pure computation layer.

use std::collections::HashMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use madrasa_api::entities::{grade_rule, subject_mark_config, BalanceSide};
use madrasa_api::services::results::{compute_results, MarkEntry, StudentInput};
use madrasa_api::services::vouchers::{check_journal_balanced, NewJournalLine};

fn subject_config(id: i64, max_mark: u32, pass_mark: u32) -> subject_mark_config::Model {
    subject_mark_config::Model {
        id,
        exam_id: 1,
        class_config_id: 1,
        subject_name: format!("Subject {id}"),
        max_mark: Decimal::from(max_mark),
        pass_mark: Decimal::from(pass_mark),
        is_compulsory: true,
    }
}

/// (max_mark, obtained) pairs with obtained <= max, as write-time
/// validation guarantees.
fn subjects_strategy() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec(
        (1u32..=200).prop_flat_map(|max| (Just(max), 0u32..=max)),
        1..8,
    )
}

proptest! {
    /// With every mark bounded by its subject maximum, the computed
    /// percentage always lands in [0, 100] and totals are consistent.
    #[test]
    fn percentage_is_bounded(subjects in subjects_strategy()) {
        let configs: Vec<_> = subjects
            .iter()
            .enumerate()
            .map(|(i, (max, _))| subject_config(i as i64 + 1, *max, max / 3))
            .collect();
        let marks: HashMap<i64, MarkEntry> = subjects
            .iter()
            .enumerate()
            .map(|(i, (_, obtained))| {
                (
                    i as i64 + 1,
                    MarkEntry {
                        obtained: Decimal::from(*obtained),
                        is_absent: false,
                    },
                )
            })
            .collect();
        let students = vec![StudentInput {
            student_id: 1,
            name: "Student".to_string(),
            roll_no: 1,
            marks,
        }];

        let results = compute_results(&configs, &[], &students);
        let r = &results[0];
        prop_assert!(r.percentage >= Decimal::ZERO);
        prop_assert!(r.percentage <= Decimal::ONE_HUNDRED);
        prop_assert!(r.total_obtained <= r.total_max);
    }

    /// Merit positions are a permutation of 1..=n and never rank a lower
    /// total above a higher one.
    #[test]
    fn merit_positions_are_a_consistent_ranking(totals in prop::collection::vec(0u32..=100, 1..10)) {
        let configs = vec![subject_config(1, 100, 33)];
        let students: Vec<StudentInput> = totals
            .iter()
            .enumerate()
            .map(|(i, obtained)| StudentInput {
                student_id: i as i64 + 1,
                name: format!("S{i}"),
                roll_no: i as i32 + 1,
                marks: HashMap::from([(
                    1,
                    MarkEntry {
                        obtained: Decimal::from(*obtained),
                        is_absent: false,
                    },
                )]),
            })
            .collect();

        let results = compute_results(&configs, &[], &students);

        let mut positions: Vec<u32> = results.iter().map(|r| r.merit_position).collect();
        positions.sort_unstable();
        let expected: Vec<u32> = (1..=results.len() as u32).collect();
        prop_assert_eq!(positions, expected);

        for a in &results {
            for b in &results {
                if a.total_obtained > b.total_obtained {
                    prop_assert!(a.merit_position < b.merit_position);
                }
            }
        }
    }

    /// A journal whose Debit and Credit totals are built to match always
    /// passes the balance check; skewing one side beyond the tolerance
    /// always fails it.
    #[test]
    fn journal_balance_check_tracks_totals(amounts in prop::collection::vec(1u32..=10_000, 1..6)) {
        let mut lines: Vec<NewJournalLine> = amounts
            .iter()
            .map(|a| NewJournalLine {
                ledger_id: 1,
                entry_type: BalanceSide::Debit,
                amount: Decimal::from(*a) / Decimal::ONE_HUNDRED,
            })
            .collect();
        let debit_total: Decimal = lines.iter().map(|l| l.amount).sum();
        lines.push(NewJournalLine {
            ledger_id: 2,
            entry_type: BalanceSide::Credit,
            amount: debit_total,
        });
        prop_assert!(check_journal_balanced(&lines).is_ok());

        lines.push(NewJournalLine {
            ledger_id: 3,
            entry_type: BalanceSide::Credit,
            amount: Decimal::ONE,
        });
        prop_assert!(check_journal_balanced(&lines).is_err());
    }

    /// Grade lookup respects inclusive band bounds.
    #[test]
    fn grade_bands_are_inclusive(pct in 0u32..=100) {
        let rule = grade_rule::Model {
            id: 1,
            grade_name: "G".to_string(),
            min_mark: Decimal::from(30),
            max_mark: Decimal::from(70),
            grade_point: None,
            remarks: None,
        };
        let inside = pct >= 30 && pct <= 70;
        prop_assert_eq!(rule.contains(Decimal::from(pct)), inside);
    }
}
