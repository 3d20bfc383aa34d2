//! Voucher bookkeeping: contra transfers, double-entry journals, payments.
//!
//! Every create/update/delete runs in a single database transaction that
//! also applies (or reverses) the voucher's effect on the referenced
//! ledgers' running balances.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{contra, journal, journal_line, ledger, payment, BalanceSide};
use crate::errors::ServiceError;

/// Debit/Credit totals may differ by at most this much before a journal is
/// rejected.
pub const JOURNAL_BALANCE_TOLERANCE: Decimal = dec!(0.01);

pub const UNBALANCED_JOURNAL_MESSAGE: &str = "Debit and Credit totals must be equal";

#[derive(Debug, Clone)]
pub struct NewContra {
    pub date: NaiveDate,
    pub from_ledger_id: i64,
    pub to_ledger_id: i64,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewJournalLine {
    pub ledger_id: i64,
    pub entry_type: BalanceSide,
    pub amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewJournal {
    pub date: NaiveDate,
    pub description: Option<String>,
    pub lines: Vec<NewJournalLine>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub date: NaiveDate,
    pub paid_from_ledger_id: i64,
    pub paid_to_ledger_id: i64,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// Journal with its Debit/Credit line items.
#[derive(Debug, serde::Serialize)]
pub struct JournalWithLines {
    #[serde(flatten)]
    pub journal: journal::Model,
    pub lines: Vec<journal_line::Model>,
}

/// Check the double-entry invariant: sum(Debit) == sum(Credit) within
/// tolerance.
pub fn check_journal_balanced(lines: &[NewJournalLine]) -> Result<(), ServiceError> {
    let mut debit_total = Decimal::ZERO;
    let mut credit_total = Decimal::ZERO;
    for line in lines {
        match line.entry_type {
            BalanceSide::Debit => debit_total += line.amount,
            BalanceSide::Credit => credit_total += line.amount,
        }
    }

    if (debit_total - credit_total).abs() > JOURNAL_BALANCE_TOLERANCE {
        return Err(ServiceError::ValidationError(
            UNBALANCED_JOURNAL_MESSAGE.to_string(),
        ));
    }
    Ok(())
}

fn validate_amount(amount: Decimal) -> Result<(), ServiceError> {
    if amount <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_journal(input: &NewJournal) -> Result<(), ServiceError> {
    if input.lines.len() < 2 {
        return Err(ServiceError::ValidationError(
            "A journal requires at least two line items".to_string(),
        ));
    }
    for line in &input.lines {
        validate_amount(line.amount)?;
    }
    check_journal_balanced(&input.lines)
}

/// Direction a line moves a ledger: an entry on the ledger's own side
/// increases it, the opposite side decreases it.
fn line_delta(balance_type: BalanceSide, entry_type: BalanceSide, amount: Decimal) -> Decimal {
    if balance_type == entry_type {
        amount
    } else {
        -amount
    }
}

async fn fetch_ledger<C: ConnectionTrait>(
    conn: &C,
    ledger_id: i64,
) -> Result<ledger::Model, ServiceError> {
    ledger::Entity::find_by_id(ledger_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Ledger {} not found", ledger_id)))
}

async fn adjust_ledger_balance<C: ConnectionTrait>(
    conn: &C,
    ledger_id: i64,
    delta: Decimal,
) -> Result<(), ServiceError> {
    let account = fetch_ledger(conn, ledger_id).await?;
    let new_balance = account.current_balance + delta;
    let mut active: ledger::ActiveModel = account.into();
    active.current_balance = Set(new_balance);
    active.updated_at = Set(Utc::now());
    active.update(conn).await?;
    Ok(())
}

/// Apply one journal line to its ledger. `sign` is 1 when posting and -1
/// when reversing.
async fn apply_journal_line<C: ConnectionTrait>(
    conn: &C,
    ledger_id: i64,
    entry_type: BalanceSide,
    amount: Decimal,
    sign: Decimal,
) -> Result<(), ServiceError> {
    let account = fetch_ledger(conn, ledger_id).await?;
    let delta = line_delta(account.balance_type, entry_type, amount) * sign;
    let new_balance = account.current_balance + delta;
    let mut active: ledger::ActiveModel = account.into();
    active.current_balance = Set(new_balance);
    active.updated_at = Set(Utc::now());
    active.update(conn).await?;
    Ok(())
}

/// Server-assigned voucher numbers are sequential per voucher type,
/// derived from the highest persisted row id.
pub fn format_voucher_no(prefix: &str, last_id: Option<i64>) -> String {
    format!("{}-{:06}", prefix, last_id.unwrap_or(0) + 1)
}

fn map_txn_err(e: sea_orm::TransactionError<ServiceError>) -> ServiceError {
    match e {
        sea_orm::TransactionError::Connection(e) => ServiceError::DatabaseError(e),
        sea_orm::TransactionError::Transaction(e) => e,
    }
}

// ---- contra ----

pub async fn create_contra(
    db: &DatabaseConnection,
    input: NewContra,
) -> Result<contra::Model, ServiceError> {
    validate_amount(input.amount)?;
    if input.from_ledger_id == input.to_ledger_id {
        return Err(ServiceError::ValidationError(
            "Contra must transfer between two different ledgers".to_string(),
        ));
    }

    let created = db
        .transaction::<_, contra::Model, ServiceError>(|txn| {
            Box::pin(async move {
                let last = contra::Entity::find()
                    .order_by_desc(contra::Column::Id)
                    .one(txn)
                    .await?;
                let voucher_no = format_voucher_no("CV", last.map(|m| m.id));

                adjust_ledger_balance(txn, input.from_ledger_id, -input.amount).await?;
                adjust_ledger_balance(txn, input.to_ledger_id, input.amount).await?;

                let model = contra::ActiveModel {
                    voucher_no: Set(voucher_no),
                    date: Set(input.date),
                    from_ledger_id: Set(input.from_ledger_id),
                    to_ledger_id: Set(input.to_ledger_id),
                    amount: Set(input.amount),
                    description: Set(input.description),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                };
                Ok(model.insert(txn).await?)
            })
        })
        .await
        .map_err(map_txn_err)?;

    info!(voucher_no = %created.voucher_no, amount = %created.amount, "contra voucher created");
    Ok(created)
}

pub async fn update_contra(
    db: &DatabaseConnection,
    id: i64,
    input: NewContra,
) -> Result<contra::Model, ServiceError> {
    validate_amount(input.amount)?;
    if input.from_ledger_id == input.to_ledger_id {
        return Err(ServiceError::ValidationError(
            "Contra must transfer between two different ledgers".to_string(),
        ));
    }

    db.transaction::<_, contra::Model, ServiceError>(|txn| {
        Box::pin(async move {
            let existing = contra::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Contra {} not found", id)))?;

            // Reverse the old transfer, then apply the new one.
            adjust_ledger_balance(txn, existing.from_ledger_id, existing.amount).await?;
            adjust_ledger_balance(txn, existing.to_ledger_id, -existing.amount).await?;
            adjust_ledger_balance(txn, input.from_ledger_id, -input.amount).await?;
            adjust_ledger_balance(txn, input.to_ledger_id, input.amount).await?;

            let mut active: contra::ActiveModel = existing.into();
            active.date = Set(input.date);
            active.from_ledger_id = Set(input.from_ledger_id);
            active.to_ledger_id = Set(input.to_ledger_id);
            active.amount = Set(input.amount);
            active.description = Set(input.description);
            Ok(active.update(txn).await?)
        })
    })
    .await
    .map_err(map_txn_err)
}

pub async fn delete_contra(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
    db.transaction::<_, (), ServiceError>(|txn| {
        Box::pin(async move {
            let existing = contra::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Contra {} not found", id)))?;

            adjust_ledger_balance(txn, existing.from_ledger_id, existing.amount).await?;
            adjust_ledger_balance(txn, existing.to_ledger_id, -existing.amount).await?;

            existing.delete(txn).await?;
            Ok(())
        })
    })
    .await
    .map_err(map_txn_err)
}

// ---- journal ----

pub async fn create_journal(
    db: &DatabaseConnection,
    input: NewJournal,
) -> Result<JournalWithLines, ServiceError> {
    validate_journal(&input)?;

    let created = db
        .transaction::<_, JournalWithLines, ServiceError>(|txn| {
            Box::pin(async move {
                let last = journal::Entity::find()
                    .order_by_desc(journal::Column::Id)
                    .one(txn)
                    .await?;
                let voucher_no = format_voucher_no("JV", last.map(|m| m.id));

                let header = journal::ActiveModel {
                    voucher_no: Set(voucher_no),
                    date: Set(input.date),
                    description: Set(input.description),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                };
                let header = header.insert(txn).await?;

                let mut lines = Vec::with_capacity(input.lines.len());
                for line in input.lines {
                    apply_journal_line(txn, line.ledger_id, line.entry_type, line.amount, dec!(1))
                        .await?;

                    let saved = journal_line::ActiveModel {
                        journal_id: Set(header.id),
                        ledger_id: Set(line.ledger_id),
                        entry_type: Set(line.entry_type),
                        amount: Set(line.amount),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    lines.push(saved);
                }

                Ok(JournalWithLines {
                    journal: header,
                    lines,
                })
            })
        })
        .await
        .map_err(map_txn_err)?;

    info!(voucher_no = %created.journal.voucher_no, lines = created.lines.len(), "journal voucher created");
    Ok(created)
}

pub async fn update_journal(
    db: &DatabaseConnection,
    id: i64,
    input: NewJournal,
) -> Result<JournalWithLines, ServiceError> {
    validate_journal(&input)?;

    db.transaction::<_, JournalWithLines, ServiceError>(|txn| {
        Box::pin(async move {
            let existing = journal::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Journal {} not found", id)))?;

            let old_lines = journal_line::Entity::find()
                .filter(journal_line::Column::JournalId.eq(existing.id))
                .all(txn)
                .await?;

            for line in &old_lines {
                apply_journal_line(txn, line.ledger_id, line.entry_type, line.amount, dec!(-1))
                    .await?;
            }
            journal_line::Entity::delete_many()
                .filter(journal_line::Column::JournalId.eq(existing.id))
                .exec(txn)
                .await?;

            let mut lines = Vec::with_capacity(input.lines.len());
            for line in input.lines {
                apply_journal_line(txn, line.ledger_id, line.entry_type, line.amount, dec!(1))
                    .await?;
                let saved = journal_line::ActiveModel {
                    journal_id: Set(existing.id),
                    ledger_id: Set(line.ledger_id),
                    entry_type: Set(line.entry_type),
                    amount: Set(line.amount),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                lines.push(saved);
            }

            let mut active: journal::ActiveModel = existing.into();
            active.date = Set(input.date);
            active.description = Set(input.description);
            let header = active.update(txn).await?;

            Ok(JournalWithLines {
                journal: header,
                lines,
            })
        })
    })
    .await
    .map_err(map_txn_err)
}

pub async fn delete_journal(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
    db.transaction::<_, (), ServiceError>(|txn| {
        Box::pin(async move {
            let existing = journal::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Journal {} not found", id)))?;

            let lines = journal_line::Entity::find()
                .filter(journal_line::Column::JournalId.eq(existing.id))
                .all(txn)
                .await?;
            for line in &lines {
                apply_journal_line(txn, line.ledger_id, line.entry_type, line.amount, dec!(-1))
                    .await?;
            }

            journal_line::Entity::delete_many()
                .filter(journal_line::Column::JournalId.eq(existing.id))
                .exec(txn)
                .await?;
            existing.delete(txn).await?;
            Ok(())
        })
    })
    .await
    .map_err(map_txn_err)
}

pub async fn load_journal(
    db: &DatabaseConnection,
    id: i64,
) -> Result<JournalWithLines, ServiceError> {
    let header = journal::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Journal {} not found", id)))?;
    let lines = journal_line::Entity::find()
        .filter(journal_line::Column::JournalId.eq(header.id))
        .all(db)
        .await?;
    Ok(JournalWithLines {
        journal: header,
        lines,
    })
}

// ---- payment ----

pub async fn create_payment(
    db: &DatabaseConnection,
    input: NewPayment,
) -> Result<payment::Model, ServiceError> {
    validate_amount(input.amount)?;

    let created = db
        .transaction::<_, payment::Model, ServiceError>(|txn| {
            Box::pin(async move {
                let last = payment::Entity::find()
                    .order_by_desc(payment::Column::Id)
                    .one(txn)
                    .await?;
                let voucher_no = format_voucher_no("PV", last.map(|m| m.id));

                adjust_ledger_balance(txn, input.paid_from_ledger_id, -input.amount).await?;
                adjust_ledger_balance(txn, input.paid_to_ledger_id, input.amount).await?;

                let model = payment::ActiveModel {
                    voucher_no: Set(voucher_no),
                    date: Set(input.date),
                    paid_from_ledger_id: Set(input.paid_from_ledger_id),
                    paid_to_ledger_id: Set(input.paid_to_ledger_id),
                    amount: Set(input.amount),
                    description: Set(input.description),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                };
                Ok(model.insert(txn).await?)
            })
        })
        .await
        .map_err(map_txn_err)?;

    info!(voucher_no = %created.voucher_no, amount = %created.amount, "payment voucher created");
    Ok(created)
}

pub async fn update_payment(
    db: &DatabaseConnection,
    id: i64,
    input: NewPayment,
) -> Result<payment::Model, ServiceError> {
    validate_amount(input.amount)?;

    db.transaction::<_, payment::Model, ServiceError>(|txn| {
        Box::pin(async move {
            let existing = payment::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Payment {} not found", id)))?;

            adjust_ledger_balance(txn, existing.paid_from_ledger_id, existing.amount).await?;
            adjust_ledger_balance(txn, existing.paid_to_ledger_id, -existing.amount).await?;
            adjust_ledger_balance(txn, input.paid_from_ledger_id, -input.amount).await?;
            adjust_ledger_balance(txn, input.paid_to_ledger_id, input.amount).await?;

            let mut active: payment::ActiveModel = existing.into();
            active.date = Set(input.date);
            active.paid_from_ledger_id = Set(input.paid_from_ledger_id);
            active.paid_to_ledger_id = Set(input.paid_to_ledger_id);
            active.amount = Set(input.amount);
            active.description = Set(input.description);
            Ok(active.update(txn).await?)
        })
    })
    .await
    .map_err(map_txn_err)
}

pub async fn delete_payment(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
    db.transaction::<_, (), ServiceError>(|txn| {
        Box::pin(async move {
            let existing = payment::Entity::find_by_id(id)
                .one(txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Payment {} not found", id)))?;

            adjust_ledger_balance(txn, existing.paid_from_ledger_id, existing.amount).await?;
            adjust_ledger_balance(txn, existing.paid_to_ledger_id, -existing.amount).await?;

            existing.delete(txn).await?;
            Ok(())
        })
    })
    .await
    .map_err(map_txn_err)
}
