use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::dates;
use super::money::Money;
use super::registry::PaymentMethodRegistry;

/// One validated expense entry. Constructed only by [`parse_expense`]; a record
/// either exists with all four fields well-formed or it does not exist at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub amount: Money,
    pub description: String,
    pub payment_method: String,
    pub date: NaiveDate,
}

/// Why a raw input line could not become an [`ExpenseRecord`].
///
/// Every malformed input maps to exactly one of these; the parser never panics
/// on user text. Checks stop at the first failure, so a line that is wrong in
/// several ways reports only the earliest reason.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected 3 or 4 comma-separated fields, got {0}")]
    MalformedInput(usize),
    #[error("amount '{0}' is not a number")]
    InvalidAmount(String),
    #[error("payment method '{0}' is not recognized")]
    UnknownPaymentMethod(String),
    #[error("date '{0}' is not a valid DD/MM/YYYY date")]
    InvalidDateFormat(String),
}

/// Parses one chat line into an expense record.
///
/// Expected shape: `amount,description,payment_method[,date]`. Fields are
/// trimmed; the description is otherwise taken verbatim, and the payment
/// method must match a registry label exactly. An explicit date must be
/// `DD/MM/YYYY`; when absent the record is dated `today`.
///
/// `today` is a parameter rather than a clock read so the function stays pure:
/// the same line at the same date always yields the same record.
pub fn parse_expense(
    line: &str,
    registry: &PaymentMethodRegistry,
    today: NaiveDate,
) -> Result<ExpenseRecord, ParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    if fields.len() != 3 && fields.len() != 4 {
        return Err(ParseError::MalformedInput(fields.len()));
    }

    let amount: Money = fields[0]
        .parse()
        .map_err(|_| ParseError::InvalidAmount(fields[0].to_string()))?;

    let description = fields[1].to_string();

    let payment_method = fields[2];
    if !registry.contains(payment_method) {
        return Err(ParseError::UnknownPaymentMethod(payment_method.to_string()));
    }

    let date = match fields.get(3) {
        Some(raw) => dates::parse_ddmmyyyy(raw)
            .ok_or_else(|| ParseError::InvalidDateFormat(raw.to_string()))?,
        None => today,
    };

    Ok(ExpenseRecord {
        amount,
        description,
        payment_method: payment_method.to_string(),
        date,
    })
}
