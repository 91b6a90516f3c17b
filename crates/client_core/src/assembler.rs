//! Builds the bill record from the form fields and the stored attachment.

use shared::domain::{Bill, BillId, BillStatus, ExpenseType, DEFAULT_VAT_PCT};

use crate::{
    error::{FieldError, SubmissionError},
    upload::PendingUpload,
};

pub const FIELD_EXPENSE_TYPE: &str = "expense-type";
pub const FIELD_EXPENSE_NAME: &str = "expense-name";
pub const FIELD_DATE: &str = "datepicker";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_VAT: &str = "vat";
pub const FIELD_PCT: &str = "pct";
pub const FIELD_COMMENTARY: &str = "commentary";

/// Raw values of the new-bill form, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillFormFields {
    pub expense_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

impl BillFormFields {
    /// Collects values keyed by form field identifier; unknown ids are ignored.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut fields = Self::default();
        for (id, value) in pairs {
            let slot = match id {
                FIELD_EXPENSE_TYPE => &mut fields.expense_type,
                FIELD_EXPENSE_NAME => &mut fields.name,
                FIELD_DATE => &mut fields.date,
                FIELD_AMOUNT => &mut fields.amount,
                FIELD_VAT => &mut fields.vat,
                FIELD_PCT => &mut fields.pct,
                FIELD_COMMENTARY => &mut fields.commentary,
                _ => continue,
            };
            *slot = value.to_string();
        }
        fields
    }
}

/// Parses the leading integer of `value`, ignoring surrounding whitespace
/// and any trailing non-digit text (`"380.50"` gives 380).
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, digits) = match value.as_bytes().first() {
        Some(b'-') => (-1, &value[1..]),
        Some(b'+') => (1, &value[1..]),
        _ => (1, value),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, FieldError> {
    if value.trim().is_empty() {
        Err(FieldError::Missing { field })
    } else {
        Ok(value)
    }
}

pub fn assemble_bill(
    fields: &BillFormFields,
    pending: Option<&PendingUpload>,
    owner_email: &str,
) -> Result<Bill, SubmissionError> {
    let pending = pending.ok_or(SubmissionError::MissingAttachment)?;

    let expense_type: ExpenseType = required(&fields.expense_type, FIELD_EXPENSE_TYPE)?
        .parse()
        .map_err(FieldError::from)?;
    let name = required(&fields.name, FIELD_EXPENSE_NAME)?;
    let date = required(&fields.date, FIELD_DATE)?;
    let amount = parse_leading_int(required(&fields.amount, FIELD_AMOUNT)?).ok_or_else(|| {
        FieldError::InvalidAmount {
            value: fields.amount.clone(),
        }
    })?;
    let pct = parse_leading_int(&fields.pct).unwrap_or(DEFAULT_VAT_PCT);

    Ok(Bill {
        id: Some(BillId(pending.file_id.0.clone())),
        email: owner_email.to_string(),
        expense_type,
        name: name.to_string(),
        date: date.to_string(),
        amount,
        vat: fields.vat.clone(),
        pct,
        commentary: fields.commentary.clone(),
        file_url: pending.file_url.clone(),
        file_name: pending.file_name.clone(),
        status: BillStatus::Pending,
    })
}
