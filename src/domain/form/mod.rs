//! Form domain — user-entered trade terms and their validation.
//!
//! Every setter re-runs [`FormModel::validate`], so `is_valid()` and
//! `errors()` always describe the current field values. Invalid input is
//! reported through that signal, never as an error value.

use crate::domain::trade::TradeTerms;
use crate::error::ConversionError;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

pub const BUYER_REQUIRED: &str = "Buyer field is required.";
pub const SELLER_REQUIRED: &str = "Seller field is required.";
pub const INSTRUMENT_REQUIRED: &str = "Instrument field is required.";
pub const QUANTITY_INVALID: &str = "Quantity must be a valid number.";
pub const PRICE_INVALID: &str = "Price must be a valid number.";

// ─── FormField ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Buyer,
    Seller,
    Instrument,
    Quantity,
    Price,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Buyer,
        FormField::Seller,
        FormField::Instrument,
        FormField::Quantity,
        FormField::Price,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Buyer => "Buyer",
            FormField::Seller => "Seller",
            FormField::Instrument => "Instrument",
            FormField::Quantity => "Quantity",
            FormField::Price => "Price",
        }
    }

    /// Message reported when this field's rule is violated.
    pub fn error_message(&self) -> &'static str {
        match self {
            FormField::Buyer => BUYER_REQUIRED,
            FormField::Seller => SELLER_REQUIRED,
            FormField::Instrument => INSTRUMENT_REQUIRED,
            FormField::Quantity => QUANTITY_INVALID,
            FormField::Price => PRICE_INVALID,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ─── FormValidation ──────────────────────────────────────────────────────────

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValidation {
    pub is_valid: bool,
    /// One message per violated rule, in rule order.
    pub errors: Vec<String>,
}

// ─── FormModel ───────────────────────────────────────────────────────────────

/// Raw trade-entry fields plus the current validity verdict.
///
/// Field contents are taken literally: whitespace is not trimmed, so `" "`
/// satisfies a required-text rule but fails a numeric one.
#[derive(Debug, Clone, PartialEq)]
pub struct FormModel {
    buyer: String,
    seller: String,
    instrument: String,
    quantity: String,
    price: String,
    is_valid: bool,
    errors: Vec<String>,
}

impl Default for FormModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FormModel {
    /// An empty form, already validated (and therefore invalid).
    pub fn new() -> Self {
        let mut form = Self {
            buyer: String::new(),
            seller: String::new(),
            instrument: String::new(),
            quantity: String::new(),
            price: String::new(),
            is_valid: false,
            errors: Vec::new(),
        };
        form.validate();
        form
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Buyer => &self.buyer,
            FormField::Seller => &self.seller,
            FormField::Instrument => &self.instrument,
            FormField::Quantity => &self.quantity,
            FormField::Price => &self.price,
        }
    }

    /// Replace one field and revalidate. Returns the new validity.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> bool {
        *self.slot_mut(field) = value.into();
        self.validate().is_valid
    }

    pub fn set_buyer(&mut self, value: impl Into<String>) -> bool {
        self.set(FormField::Buyer, value)
    }

    pub fn set_seller(&mut self, value: impl Into<String>) -> bool {
        self.set(FormField::Seller, value)
    }

    pub fn set_instrument(&mut self, value: impl Into<String>) -> bool {
        self.set(FormField::Instrument, value)
    }

    pub fn set_quantity(&mut self, value: impl Into<String>) -> bool {
        self.set(FormField::Quantity, value)
    }

    pub fn set_price(&mut self, value: impl Into<String>) -> bool {
        self.set(FormField::Price, value)
    }

    /// Empty every field and revalidate.
    pub fn clear(&mut self) {
        for field in FormField::ALL {
            self.slot_mut(field).clear();
        }
        self.validate();
    }

    /// Run every rule, refresh the validity signal, and return the verdict.
    ///
    /// Rules are evaluated independently; all violations are collected.
    pub fn validate(&mut self) -> FormValidation {
        let errors: Vec<String> = FormField::ALL
            .iter()
            .filter(|field| !self.satisfies(**field))
            .map(|field| field.error_message().to_string())
            .collect();

        self.is_valid = errors.is_empty();
        self.errors = errors;

        FormValidation {
            is_valid: self.is_valid,
            errors: self.errors.clone(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Convert the numeric fields. Independent of the validity signal.
    pub fn to_terms(&self) -> Result<TradeTerms, ConversionError> {
        let quantity = parse_quantity(&self.quantity)
            .ok_or_else(|| ConversionError::Quantity(self.quantity.clone()))?;
        let price =
            parse_price(&self.price).ok_or_else(|| ConversionError::Price(self.price.clone()))?;

        Ok(TradeTerms {
            buyer: self.buyer.clone(),
            seller: self.seller.clone(),
            instrument: self.instrument.clone(),
            quantity,
            price,
        })
    }

    fn satisfies(&self, field: FormField) -> bool {
        let value = self.get(field);
        if value.is_empty() {
            return false;
        }
        match field {
            FormField::Buyer | FormField::Seller | FormField::Instrument => true,
            FormField::Quantity => parse_quantity(value).is_some(),
            FormField::Price => parse_price(value).is_some(),
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Buyer => &mut self.buyer,
            FormField::Seller => &mut self.seller,
            FormField::Instrument => &mut self.instrument,
            FormField::Quantity => &mut self.quantity,
            FormField::Price => &mut self.price,
        }
    }

    /// Overwrite a field without revalidating, leaving the signal stale.
    #[cfg(test)]
    pub(crate) fn set_unvalidated(&mut self, field: FormField, value: &str) {
        *self.slot_mut(field) = value.to_string();
    }
}

/// Strictly positive integer quantity.
fn parse_quantity(s: &str) -> Option<u64> {
    s.parse::<u64>().ok().filter(|q| *q > 0)
}

/// Plain decimal notation only: an optional sign, digits, and one point.
/// Exponents and `_` separators are rejected before `Decimal` sees them.
fn parse_price(s: &str) -> Option<Decimal> {
    let digits = s.strip_prefix(|c| c == '+' || c == '-').unwrap_or(s);
    if !digits.chars().any(|c| c.is_ascii_digit())
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }
    Decimal::from_str(s).ok()
}
