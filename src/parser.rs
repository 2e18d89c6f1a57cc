use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

const SECTIONS_KEY: &str = "gains_and_losses_section";
const UNKNOWN_NAME: &str = "Unknown";

/// Asset class of a statement section.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Crypto,
    Equities,
    Funds,
    Bonds,
}

impl AssetClass {
    pub fn from_label(label: &str) -> Option<AssetClass> {
        match label {
            "Crypto Currency" => Some(AssetClass::Crypto),
            "Equities" => Some(AssetClass::Equities),
            "Funds" => Some(AssetClass::Funds),
            "Bonds" => Some(AssetClass::Bonds),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransactionKind {
    Buy,
    Sell,
    Other(String),
}

impl TransactionKind {
    pub fn from_label(label: &str) -> TransactionKind {
        match label {
            "Trading Buy" => TransactionKind::Buy,
            "Trading Sell" => TransactionKind::Sell,
            other => TransactionKind::Other(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub isin: String,
    pub isin_name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Transactions of one asset class grouped by ISIN, in statement order.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub transactions: BTreeMap<String, Vec<Transaction>>,
    /// records dropped for missing or mistyped fields
    pub skipped: usize,
}

impl Extraction {
    pub fn transaction_count(&self) -> usize {
        self.transactions.values().map(Vec::len).sum()
    }
}

pub fn parse_json(asset_class: AssetClass, json: &Value) -> Result<Extraction> {
    let sections = json
        .get(SECTIONS_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Structure(format!("'{}' must be an array", SECTIONS_KEY)))?;

    let mut extraction = Extraction::default();
    let mut matched = 0;

    for section in sections {
        let transactions = match section.get("transactions").and_then(Value::as_array) {
            Some(transactions) => transactions,
            None => continue,
        };

        // go just with the desired asset class
        let class = section
            .get("asset_type")
            .and_then(Value::as_str)
            .and_then(AssetClass::from_label);
        if class != Some(asset_class) {
            continue;
        }
        matched += 1;

        for tx in transactions {
            match parse_transaction(tx)? {
                Some(transaction) => extraction
                    .transactions
                    .entry(transaction.isin.clone())
                    .or_insert_with(Vec::new)
                    .push(transaction),
                None => extraction.skipped += 1,
            }
        }
    }

    info!(
        "extracted {} {:?} transaction(s) for {} security(ies) from {} section(s), skipped {}",
        extraction.transaction_count(),
        asset_class,
        extraction.transactions.len(),
        matched,
        extraction.skipped
    );
    Ok(extraction)
}

/// `Ok(None)` means the record is skipped; only a malformed date is fatal.
fn parse_transaction(tx: &Value) -> Result<Option<Transaction>> {
    let tx = match tx.as_object() {
        Some(tx) => tx,
        None => {
            debug!("skipping transaction: not an object");
            return Ok(None);
        }
    };

    let (isin_field, date_field, kind_field, quantity) = match (
        tx.get("isin").and_then(Value::as_str),
        tx.get("transaction_date").and_then(Value::as_str),
        tx.get("transaction_type").and_then(Value::as_str),
        tx.get("amount_of_units").and_then(Value::as_f64),
    ) {
        (Some(isin), Some(date), Some(kind), Some(quantity)) => (isin, date, kind, quantity),
        _ => {
            debug!("skipping transaction with missing or mistyped fields: {:?}", tx.get("isin"));
            return Ok(None);
        }
    };

    let date = parse_date(date_field)?;
    let quantity = quantity.abs();

    let unit_price = match unit_price(tx, quantity) {
        Some(price) => price,
        None => {
            debug!("skipping {} transaction of {}: no price information", date, isin_field);
            return Ok(None);
        }
    };

    let (isin, isin_name) = parse_isin(isin_field);
    Ok(Some(Transaction {
        date,
        kind: TransactionKind::from_label(kind_field),
        isin,
        isin_name,
        quantity,
        unit_price,
    }))
}

/// Prefers `unit_price`, falls back to `market_value / quantity`.
/// A `null` field counts as absent; a non-finite price as unparsable.
fn unit_price(tx: &Map<String, Value>, quantity: f64) -> Option<f64> {
    let field = |key: &str| tx.get(key).filter(|v| !v.is_null());

    let price = match field("unit_price") {
        Some(price) => price.as_f64()?,
        None => {
            let market_value = field("market_value")?.as_f64()?;
            if quantity == 0f64 {
                0f64
            } else {
                market_value / quantity
            }
        }
    };

    if price.is_finite() {
        Some(price)
    } else {
        None
    }
}

/// Parses a statement date in `DD.MM.YYYY` form.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let shape_ok = date.len() == 10
        && date.bytes().enumerate().all(|(i, b)| match i {
            2 | 5 => b == b'.',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(Error::DateFormat(date.to_string()));
    }
    NaiveDate::parse_from_str(date, "%d.%m.%Y").map_err(|_| Error::DateFormat(date.to_string()))
}

/// Splits `"CODE - Name"` on the first separator.
pub fn parse_isin(isin: &str) -> (String, String) {
    match isin.find(" - ") {
        Some(pos) => (isin[..pos].to_string(), isin[pos + 3..].to_string()),
        None => (isin.to_string(), UNKNOWN_NAME.to_string()),
    }
}
