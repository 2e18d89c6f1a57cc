//! Typed model of the Doh_KDVP capital-gains declaration.
//!
//! Field comments name the schema element each field is rendered into.

mod codes;
pub mod xml;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use self::codes::{DocWorkflowId, GainType, InventoryListType};

/// Acquisition side of an inventory row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowPurchase {
    pub acquired_on: Option<NaiveDate>,    // F1
    pub gain_type: Option<GainType>,       // F2
    pub quantity: Option<f64>,             // F3
    pub unit_value: Option<f64>,           // F4
    pub inheritance_tax: Option<f64>,      // F5
    pub reduced_value: Option<f64>,        // F11
}

/// Disposal side of an inventory row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowSale {
    pub disposed_on: Option<NaiveDate>,    // F6
    pub quantity: Option<f64>,             // F7
    pub value: Option<f64>,                // F9
    // losses only offset gains if the security is not bought back within 30 days
    pub loss_rule: Option<bool>,           // F10
}

#[derive(Clone, Debug, PartialEq)]
pub enum RowEntry {
    Purchase(RowPurchase),
    Sale(RowSale),
}

impl RowEntry {
    /// Signed change in held quantity caused by this entry.
    pub fn stock_delta(&self) -> f64 {
        match self {
            RowEntry::Purchase(p) => p.quantity.unwrap_or(0f64),
            RowEntry::Sale(s) => -s.quantity.unwrap_or(0f64),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InventoryRow {
    pub id: u32,
    pub entry: RowEntry,
    /// Holding right after this row is applied (F8); may be negative.
    pub stock: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SecuritiesPlvp {
    pub isin: Option<String>,
    pub code: Option<String>,  // ticker
    pub name: String,
    pub is_fund: bool,
    pub resolution: Option<String>,
    pub resolution_date: Option<String>,
    pub rows: Vec<InventoryRow>,
}

/// Ledger of a share in a company (PLD). Kept in the model, not rendered yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shares {
    pub name: String,
    pub rows: Vec<InventoryRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ItemHoldings {
    Securities(SecuritiesPlvp),
    Shares(Shares),
}

/// Tax already paid abroad on an item's gains.
#[derive(Clone, Debug, PartialEq)]
pub struct ForeignTax {
    pub amount: f64,
    pub country_id: String,
    pub country_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KdvpItem {
    pub item_id: Option<u32>,
    pub list_type: InventoryListType,
    pub foreign_tax: Option<ForeignTax>,
    pub holdings: ItemHoldings,
}

impl KdvpItem {
    pub fn securities(securities: SecuritiesPlvp) -> KdvpItem {
        KdvpItem {
            item_id: None,
            list_type: InventoryListType::Plvp,
            foreign_tax: None,
            holdings: ItemHoldings::Securities(securities),
        }
    }

    pub fn shares(shares: Shares) -> KdvpItem {
        KdvpItem {
            list_type: InventoryListType::Pld,
            holdings: ItemHoldings::Shares(shares),
            ..KdvpItem::securities(SecuritiesPlvp::default())
        }
    }

    pub fn with_foreign_tax(mut self, amount: f64, country_id: &str, country_name: &str) -> KdvpItem {
        self.foreign_tax = Some(ForeignTax {
            amount,
            country_id: country_id.to_string(),
            country_name: country_name.to_string(),
        });
        self
    }
}

/// Metadata shared by every form: chosen by the user, not read from the statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    pub doc_id: DocWorkflowId,
    pub year: i32,
    pub is_resident: bool,
    pub telephone_number: Option<String>,
    pub email: Option<String>,
}

impl FormData {
    pub fn new(year: i32) -> FormData {
        FormData {
            doc_id: DocWorkflowId::Original,
            year,
            is_resident: true,
            telephone_number: None,
            email: None,
        }
    }

    pub fn period_start(&self) -> String {
        format!("{}-01-01", self.year)
    }

    pub fn period_end(&self) -> String {
        format!("{}-12-31", self.year)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DohKdvpData {
    pub form: FormData,
    items: Vec<KdvpItem>,
}

impl DohKdvpData {
    pub fn new(form: FormData) -> DohKdvpData {
        DohKdvpData {
            form,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[KdvpItem] {
        &self.items
    }

    /// Id the next pushed item receives; ids run 1..=N in insertion order.
    pub fn next_item_id(&self) -> u32 {
        self.items.len() as u32 + 1
    }

    pub fn push_item(&mut self, mut item: KdvpItem) -> u32 {
        let id = self.next_item_id();
        item.item_id = Some(id);
        self.items.push(item);
        id
    }

    pub fn security_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.list_type == InventoryListType::Plvp)
            .count()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TaxPayer {
    tax_number: String,
    pub resident: bool,
}

impl TaxPayer {
    pub fn new(tax_number: &str, resident: bool) -> Result<TaxPayer> {
        let tax_number = tax_number.trim();
        if tax_number.len() != 8 || !tax_number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidTaxNumber(tax_number.to_string()));
        }
        Ok(TaxPayer {
            tax_number: tax_number.to_string(),
            resident,
        })
    }

    pub fn tax_number(&self) -> &str {
        &self.tax_number
    }
}
