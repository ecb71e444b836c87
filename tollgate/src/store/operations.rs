//! Store operations for the ledger.
//!
//! Implements initialization of the frozen ledger parameters, snapshot
//! loading, transactional persistence of executed plans, and audit
//! history queries.

use std::fmt;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use rusqlite::{params, Transaction, TransactionBehavior};

use crate::account::AccountId;
use crate::error::{Error, Result};
use crate::funds::Amount;
use crate::ledger::{Ledger, LedgerParams, LedgerTotals};
use crate::operations::plan::LedgerAction;
use crate::operations::settlement::Disposition;
use crate::reservation::{Reservation, SlotIndex};

use super::schema::{
    DELETE_RESERVATION, INSERT_RESERVATION, INSERT_SETTLEMENT, LIST_RESERVATIONS,
    LIST_SETTLEMENTS, META_ESCROW, META_FORFEITED, META_MATURITY_SECONDS, META_MAX_SLOTS,
    META_OPERATOR, META_PRICE, META_REVENUE, META_SERVICE_NAME, META_STAKE_DUE, SELECT_METADATA,
    UPSERT_METADATA,
};
use super::Store;

/// Converts a `SystemTime` to Unix epoch seconds for storage.
///
/// # Errors
///
/// Returns an error if the time is before the Unix epoch.
#[allow(clippy::cast_possible_wrap)]
pub(super) fn systemtime_to_unix_secs(time: SystemTime) -> Result<i64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| Error::Validation {
            field: "timestamp".into(),
            message: format!("invalid timestamp: {e}"),
        })
        .map(|d| d.as_secs() as i64)
}

/// Converts Unix epoch seconds from the store to a `SystemTime`.
#[allow(clippy::cast_sign_loss)]
pub(super) fn unix_secs_to_systemtime(secs: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs as u64)
}

/// One row of the append-only settlement history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementRow {
    /// The slot the settled reservation occupied.
    pub slot: SlotIndex,
    /// The requester that had funded it.
    pub requester: AccountId,
    /// The settled deposit amount.
    pub amount: Amount,
    /// How the deposit was disposed of.
    pub disposition: Disposition,
    /// When the reservation was admitted.
    pub reserved_at: SystemTime,
    /// When it was settled.
    pub settled_at: SystemTime,
}

impl fmt::Display for SettlementRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settled: DateTime<Utc> = self.settled_at.into();
        write!(
            f,
            "slot={} requester={} amount={} disposition={} settled_at={}",
            self.slot,
            self.requester,
            self.amount,
            self.disposition,
            settled.to_rfc3339()
        )
    }
}

fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let slot: i64 = row.get(0)?;
    let requester: String = row.get(1)?;
    let deposit: String = row.get(2)?;
    let staked: i64 = row.get(3)?;
    let shortfall: String = row.get(4)?;
    let created_secs: i64 = row.get(5)?;

    let requester = AccountId::new(requester)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let deposit: Amount = deposit
        .parse()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let shortfall: Amount = shortfall
        .parse()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Reservation::builder(SlotIndex::from(slot as u32), requester, deposit)
        .staked(staked != 0)
        .shortfall(shortfall)
        .created_at(unix_secs_to_systemtime(created_secs))
        .build()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn row_to_settlement(row: &rusqlite::Row<'_>) -> rusqlite::Result<SettlementRow> {
    let slot: i64 = row.get(0)?;
    let requester: String = row.get(1)?;
    let amount: String = row.get(2)?;
    let disposition: String = row.get(3)?;
    let reserved_secs: i64 = row.get(4)?;
    let settled_secs: i64 = row.get(5)?;

    let requester = AccountId::new(requester)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let amount: Amount = amount
        .parse()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let disposition: Disposition = disposition.parse().map_err(|e: String| {
        rusqlite::Error::ToSqlConversionFailure(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e,
        )))
    })?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(SettlementRow {
        slot: SlotIndex::from(slot as u32),
        requester,
        amount,
        disposition,
        reserved_at: unix_secs_to_systemtime(reserved_secs),
        settled_at: unix_secs_to_systemtime(settled_secs),
    })
}

fn get_meta(conn: &rusqlite::Connection, key: &str) -> Result<Option<String>> {
    match conn.query_row(SELECT_METADATA, [key], |row| row.get::<_, String>(0)) {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn require_meta(conn: &rusqlite::Connection, key: &str) -> Result<String> {
    get_meta(conn, key)?.ok_or(Error::LedgerNotInitialized)
}

fn parse_meta<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| Error::LedgerCorruption {
        details: format!("metadata value for '{key}' is invalid: {value}"),
    })
}

fn set_meta(tx: &Transaction<'_>, key: &str, value: &str) -> Result<()> {
    tx.execute(UPSERT_METADATA, params![key, value])?;
    Ok(())
}

fn write_totals(tx: &Transaction<'_>, totals: LedgerTotals) -> Result<()> {
    set_meta(tx, META_ESCROW, &totals.escrow.to_string())?;
    set_meta(tx, META_STAKE_DUE, &totals.stake_due.to_string())?;
    set_meta(tx, META_REVENUE, &totals.revenue.to_string())?;
    set_meta(tx, META_FORFEITED, &totals.forfeited.to_string())?;
    Ok(())
}

impl Store {
    /// Returns `true` when the ledger parameters have been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata table cannot be read.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(get_meta(self.connection(), META_OPERATOR)?.is_some())
    }

    /// Writes the frozen ledger parameters into a fresh store.
    ///
    /// Re-initializing with identical parameters is an idempotent no-op.
    /// The operator identity and admission parameters are immutable after
    /// creation, so re-initializing with different parameters is refused.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an invalid parameter set, or
    /// `AlreadyInitialized` when the store already carries different
    /// parameters.
    pub fn init_ledger(&mut self, params: &LedgerParams) -> Result<()> {
        params.validate()?;

        if self.is_initialized()? {
            let existing = self.load_params()?;
            if &existing == params {
                return Ok(());
            }
            let details = if existing.operator != params.operator {
                format!(
                    "operator is {} and cannot be changed",
                    existing.operator
                )
            } else {
                "admission parameters differ from the frozen ones".to_string()
            };
            return Err(Error::AlreadyInitialized { details });
        }

        let tx = self.transaction()?;
        set_meta(&tx, META_SERVICE_NAME, &params.service_name)?;
        set_meta(&tx, META_OPERATOR, params.operator.as_str())?;
        set_meta(&tx, META_PRICE, &params.price.to_string())?;
        set_meta(&tx, META_MAX_SLOTS, &params.max_slots.to_string())?;
        set_meta(
            &tx,
            META_MATURITY_SECONDS,
            &params.maturity_window.as_secs().to_string(),
        )?;
        write_totals(&tx, LedgerTotals::default())?;
        tx.commit()?;

        log::debug!(
            "initialized ledger: {} slots at price {}",
            params.max_slots,
            params.price
        );
        Ok(())
    }

    /// Loads the frozen ledger parameters.
    ///
    /// # Errors
    ///
    /// Returns `LedgerNotInitialized` when the store has never been
    /// initialized, or `LedgerCorruption` for unparseable metadata.
    pub fn load_params(&self) -> Result<LedgerParams> {
        let conn = self.connection();
        let service_name = require_meta(conn, META_SERVICE_NAME)?;
        let operator = require_meta(conn, META_OPERATOR)?;
        let price = require_meta(conn, META_PRICE)?;
        let max_slots = require_meta(conn, META_MAX_SLOTS)?;
        let maturity_seconds = require_meta(conn, META_MATURITY_SECONDS)?;

        Ok(LedgerParams {
            service_name,
            operator: AccountId::new(operator).map_err(|e| Error::LedgerCorruption {
                details: format!("stored operator identity is invalid: {e}"),
            })?,
            price: parse_meta(META_PRICE, &price)?,
            max_slots: parse_meta(META_MAX_SLOTS, &max_slots)?,
            maturity_window: Duration::from_secs(parse_meta(
                META_MATURITY_SECONDS,
                &maturity_seconds,
            )?),
        })
    }

    /// Reconstructs the ledger snapshot from the store.
    ///
    /// # Errors
    ///
    /// Returns `LedgerNotInitialized` for a fresh store, or
    /// `LedgerCorruption` when the persisted totals disagree with the
    /// persisted reservations.
    pub fn load_ledger(&self) -> Result<Ledger> {
        let params = self.load_params()?;
        let conn = self.connection();

        let mut stmt = conn.prepare(LIST_RESERVATIONS)?;
        let reservations = stmt
            .query_map([], row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let totals = LedgerTotals {
            escrow: parse_meta(META_ESCROW, &require_meta(conn, META_ESCROW)?)?,
            stake_due: parse_meta(META_STAKE_DUE, &require_meta(conn, META_STAKE_DUE)?)?,
            revenue: parse_meta(META_REVENUE, &require_meta(conn, META_REVENUE)?)?,
            forfeited: parse_meta(META_FORFEITED, &require_meta(conn, META_FORFEITED)?)?,
        };

        Ledger::restore(params, reservations, totals)
    }

    /// Persists an executed plan's actions and the updated balances in a
    /// single transaction.
    ///
    /// `ledger` must be the post-application snapshot; its totals are
    /// written alongside the row changes so a reader never observes
    /// balances out of step with the reservations.
    ///
    /// # Errors
    ///
    /// Returns `LockTimeout` when another writer holds the store past the
    /// busy timeout, or a database error on failure; nothing is committed
    /// in either case.
    pub fn apply_actions(
        &mut self,
        actions: &[LedgerAction],
        ledger: &Ledger,
        now: SystemTime,
    ) -> Result<()> {
        let settled_secs = systemtime_to_unix_secs(now)?;
        let totals = ledger.totals();
        let tx = self.transaction()?;

        for action in actions {
            match action {
                LedgerAction::Admit(reservation) => {
                    tx.execute(
                        INSERT_RESERVATION,
                        params![
                            i64::from(reservation.slot().value()),
                            reservation.requester().as_str(),
                            reservation.deposit().to_string(),
                            i64::from(reservation.staked()),
                            reservation.shortfall().to_string(),
                            systemtime_to_unix_secs(reservation.created_at())?,
                        ],
                    )?;
                }
                LedgerAction::Collect {
                    slot,
                    requester,
                    amount,
                } => {
                    settle_row(&tx, *slot, requester, *amount, Disposition::Collected, settled_secs)?;
                }
                LedgerAction::Refund {
                    slot,
                    requester,
                    amount,
                } => {
                    settle_row(&tx, *slot, requester, *amount, Disposition::Refunded, settled_secs)?;
                }
                LedgerAction::Forfeit {
                    slot,
                    requester,
                    amount,
                    ..
                } => {
                    settle_row(&tx, *slot, requester, *amount, Disposition::Forfeited, settled_secs)?;
                }
            }
        }

        write_totals(&tx, totals)?;
        tx.commit()?;
        Ok(())
    }

    /// Lists the append-only settlement history in settlement order.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read.
    pub fn list_settlements(&self) -> Result<Vec<SettlementRow>> {
        let mut stmt = self.connection().prepare(LIST_SETTLEMENTS)?;
        let rows = stmt
            .query_map([], row_to_settlement)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Starts an immediate transaction, mapping lock contention to
    /// `LockTimeout`.
    fn transaction(&mut self) -> Result<Transaction<'_>> {
        let seconds = self.busy_timeout().as_secs();
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(f, _)
                    if f.code == rusqlite::ErrorCode::DatabaseBusy =>
                {
                    Error::LockTimeout { seconds }
                }
                other => other.into(),
            })
    }
}

/// Deletes an active reservation row and appends its audit record.
fn settle_row(
    tx: &Transaction<'_>,
    slot: SlotIndex,
    requester: &AccountId,
    amount: Amount,
    disposition: Disposition,
    settled_secs: i64,
) -> Result<()> {
    let reserved_at: i64 = tx
        .query_row(
            "SELECT created_at FROM reservations WHERE slot = ?",
            [i64::from(slot.value())],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Error::LedgerCorruption {
                details: format!("no stored reservation for settled slot {slot}"),
            },
            other => other.into(),
        })?;
    tx.execute(DELETE_RESERVATION, [i64::from(slot.value())])?;
    tx.execute(
        INSERT_SETTLEMENT,
        params![
            i64::from(slot.value()),
            requester.as_str(),
            amount.to_string(),
            disposition.to_string(),
            reserved_at,
            settled_secs,
        ],
    )?;
    Ok(())
}
