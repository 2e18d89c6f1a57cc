use std::io;
use std::path::Path;

use chrono::NaiveDate;
use csv::Writer;
use serde::Serialize;

use crate::error::Result;
use crate::kdvp::{DohKdvpData, ItemHoldings, RowEntry};

/// One inventory row flattened for the audit ledger.
#[derive(Debug, PartialEq, Serialize)]
pub struct LedgerRecord {
    item_id: Option<u32>,
    isin: Option<String>,
    name: String,
    row_id: u32,
    side: &'static str,
    date: Option<NaiveDate>,
    quantity: Option<f64>,
    unit_value: Option<f64>,
    stock: Option<f64>,
}

pub fn ledger_records(data: &DohKdvpData) -> Vec<LedgerRecord> {
    let mut records = Vec::new();

    for item in data.items() {
        let sec = match &item.holdings {
            ItemHoldings::Securities(sec) => sec,
            ItemHoldings::Shares(_) => continue,
        };
        for row in sec.rows.iter() {
            let (side, date, quantity, unit_value) = match &row.entry {
                RowEntry::Purchase(p) => ("purchase", p.acquired_on, p.quantity, p.unit_value),
                RowEntry::Sale(s) => ("sale", s.disposed_on, s.quantity, s.value),
            };
            records.push(LedgerRecord {
                item_id: item.item_id,
                isin: sec.isin.clone(),
                name: sec.name.clone(),
                row_id: row.id,
                side,
                date,
                quantity,
                unit_value,
                stock: row.stock,
            });
        }
    }

    records
}

pub fn write_ledger<W: io::Write>(data: &DohKdvpData, out: W) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    for record in ledger_records(data) {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_ledger_file(data: &DohKdvpData, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_ledger(data, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdvp::{FormData, InventoryRow, KdvpItem, RowPurchase, RowSale, SecuritiesPlvp, Shares};

    #[test]
    fn one_line_per_row() {
        let mut data = DohKdvpData::new(FormData::new(2024));
        data.push_item(KdvpItem::securities(SecuritiesPlvp {
            isin: Some("AE0000000001".to_string()),
            name: "Fund".to_string(),
            rows: vec![
                InventoryRow {
                    id: 0,
                    entry: RowEntry::Purchase(RowPurchase {
                        acquired_on: NaiveDate::from_ymd_opt(2024, 3, 15),
                        quantity: Some(10.0),
                        unit_value: Some(100.0),
                        ..RowPurchase::default()
                    }),
                    stock: Some(10.0),
                },
                InventoryRow {
                    id: 1,
                    entry: RowEntry::Sale(RowSale {
                        disposed_on: NaiveDate::from_ymd_opt(2024, 8, 9),
                        quantity: Some(2.5),
                        value: Some(120.0),
                        loss_rule: Some(true),
                    }),
                    stock: Some(7.5),
                },
            ],
            ..SecuritiesPlvp::default()
        }));
        data.push_item(KdvpItem::shares(Shares::default()));

        let mut out = Vec::new();
        write_ledger(&data, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                "item_id,isin,name,row_id,side,date,quantity,unit_value,stock",
                "1,AE0000000001,Fund,0,purchase,2024-03-15,10.0,100.0,10.0",
                "1,AE0000000001,Fund,1,sale,2024-08-09,2.5,120.0,7.5",
            ]
        );
    }
}
