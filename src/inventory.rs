use std::collections::BTreeMap;

use log::{debug, info};

use crate::kdvp::{
    DohKdvpData, FormData, GainType, InventoryRow, KdvpItem, RowEntry, RowPurchase, RowSale,
    SecuritiesPlvp,
};
use crate::parser::{Transaction, TransactionKind};

/// Running ledger of a single security while its transactions are replayed.
pub struct Inventory {
    isin: String,
    name: String,
    stock: f64,
    rows: Vec<InventoryRow>,
}

impl Inventory {
    pub fn new(isin: String, name: String) -> Inventory {
        Inventory {
            isin,
            name,
            stock: 0f64,
            rows: Vec::new(),
        }
    }

    pub fn deposit(&mut self, tx: &Transaction) {
        self.push(RowEntry::Purchase(RowPurchase {
            acquired_on: Some(tx.date),
            gain_type: Some(GainType::A),
            quantity: Some(tx.quantity),
            unit_value: Some(tx.unit_price),
            inheritance_tax: Some(0f64),
            reduced_value: None,
        }));
    }

    pub fn withdraw(&mut self, tx: &Transaction) {
        self.push(RowEntry::Sale(RowSale {
            disposed_on: Some(tx.date),
            quantity: Some(tx.quantity),
            value: Some(tx.unit_price),
            loss_rule: Some(true),
        }));
    }

    fn push(&mut self, entry: RowEntry) {
        self.stock += entry.stock_delta();
        self.rows.push(InventoryRow {
            id: self.rows.len() as u32,
            entry,
            stock: Some(self.stock),
        });
    }

    pub fn stock(&self) -> f64 {
        self.stock
    }

    /// `None` when no transaction produced a row.
    pub fn into_item(self) -> Option<KdvpItem> {
        if self.rows.is_empty() {
            return None;
        }
        Some(KdvpItem::securities(SecuritiesPlvp {
            isin: Some(self.isin),
            name: self.name,
            rows: self.rows,
            ..SecuritiesPlvp::default()
        }))
    }
}

/// Replays every security's transactions in date order and returns one item
/// per security that produced rows, numbered from `next_item_id`, together
/// with the id following the last one used.
pub fn aggregate(
    transactions: BTreeMap<String, Vec<Transaction>>,
    mut next_item_id: u32,
) -> (Vec<KdvpItem>, u32) {
    let mut items = Vec::new();

    for (isin, mut txs) in transactions {
        // stable: same-day transactions keep statement order
        txs.sort_by_key(|tx| tx.date);

        let name = match txs.first() {
            Some(tx) => tx.isin_name.clone(),
            None => continue,
        };
        let mut inventory = Inventory::new(isin.clone(), name);

        for tx in txs.iter() {
            match &tx.kind {
                TransactionKind::Buy => inventory.deposit(tx),
                TransactionKind::Sell => inventory.withdraw(tx),
                TransactionKind::Other(kind) => {
                    debug!("skipping '{}' transaction of {} on {}", kind, isin, tx.date);
                }
            }
        }

        let stock = inventory.stock();
        if let Some(mut item) = inventory.into_item() {
            item.item_id = Some(next_item_id);
            next_item_id += 1;
            debug!("{}: closing stock {}", isin, stock);
            items.push(item);
        }
    }

    info!("built {} inventory item(s)", items.len());
    (items, next_item_id)
}

pub fn prepare_kdvp_data(
    transactions: BTreeMap<String, Vec<Transaction>>,
    form: FormData,
) -> DohKdvpData {
    let mut data = DohKdvpData::new(form);
    let (items, _) = aggregate(transactions, data.next_item_id());
    for item in items {
        data.push_item(item);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdvp::{InventoryListType, ItemHoldings};
    use chrono::NaiveDate;

    fn tx(isin: &str, date: (i32, u32, u32), kind: TransactionKind, quantity: f64, price: f64) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            kind,
            isin: isin.to_string(),
            isin_name: format!("{} name", isin),
            quantity,
            unit_price: price,
        }
    }

    fn securities(item: &KdvpItem) -> &SecuritiesPlvp {
        match &item.holdings {
            ItemHoldings::Securities(sec) => sec,
            ItemHoldings::Shares(_) => panic!("expected securities"),
        }
    }

    fn stocks(item: &KdvpItem) -> Vec<f64> {
        securities(item).rows.iter().map(|r| r.stock.unwrap()).collect()
    }

    #[test]
    fn sorts_by_date_and_tracks_stock() {
        let mut map = BTreeMap::new();
        map.insert(
            "AE0000000001".to_string(),
            vec![
                tx("AE0000000001", (2024, 5, 2), TransactionKind::Buy, 5.0, 110.0),
                tx("AE0000000001", (2024, 8, 9), TransactionKind::Sell, 0.1099, 120.0),
                tx("AE0000000001", (2024, 3, 15), TransactionKind::Buy, 10.0, 100.0),
            ],
        );

        let (items, next) = aggregate(map, 1);
        assert_eq!(next, 2);
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.item_id, Some(1));
        assert_eq!(item.list_type, InventoryListType::Plvp);

        let sec = securities(item);
        assert_eq!(sec.isin.as_deref(), Some("AE0000000001"));
        assert_eq!(sec.name, "AE0000000001 name");
        assert!(!sec.is_fund);

        let ids: Vec<u32> = sec.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        let s = stocks(item);
        assert_eq!(s[0], 10.0);
        assert_eq!(s[1], 15.0);
        assert!((s[2] - 14.8901).abs() < 1e-9);

        match &sec.rows[2].entry {
            RowEntry::Sale(sale) => {
                assert_eq!(sale.quantity, Some(0.1099));
                assert_eq!(sale.value, Some(120.0));
                assert_eq!(sale.loss_rule, Some(true));
            }
            RowEntry::Purchase(_) => panic!("expected sale"),
        }
        match &sec.rows[0].entry {
            RowEntry::Purchase(p) => {
                assert_eq!(p.gain_type, Some(GainType::A));
                assert_eq!(p.inheritance_tax, Some(0.0));
                assert_eq!(p.unit_value, Some(100.0));
            }
            RowEntry::Sale(_) => panic!("expected purchase"),
        }
    }

    #[test]
    fn stock_is_prefix_sum_of_deltas() {
        let kinds = [
            (TransactionKind::Buy, 3.0),
            (TransactionKind::Sell, 5.0),
            (TransactionKind::Buy, 0.25),
            (TransactionKind::Sell, 0.5),
            (TransactionKind::Buy, 7.0),
        ];
        let txs = kinds
            .iter()
            .enumerate()
            .map(|(i, (kind, q))| tx("X", (2024, 1, i as u32 + 1), kind.clone(), *q, 1.0))
            .collect();
        let mut map = BTreeMap::new();
        map.insert("X".to_string(), txs);

        let (items, _) = aggregate(map, 1);
        let mut sum = 0f64;
        for row in securities(&items[0]).rows.iter() {
            sum += row.entry.stock_delta();
            assert_eq!(row.stock, Some(sum));
        }
        assert!(sum < 4.75 + 1e-9 && sum > 4.75 - 1e-9);
    }

    #[test]
    fn unknown_kinds_do_not_consume_row_ids() {
        let mut map = BTreeMap::new();
        map.insert(
            "X".to_string(),
            vec![
                tx("X", (2024, 1, 1), TransactionKind::Buy, 1.0, 1.0),
                tx("X", (2024, 1, 2), TransactionKind::Other("Dividend".to_string()), 9.0, 1.0),
                tx("X", (2024, 1, 3), TransactionKind::Sell, 1.0, 1.0),
            ],
        );

        let (items, _) = aggregate(map, 1);
        let rows = &securities(&items[0]).rows;
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(rows[1].stock, Some(0.0));
    }

    #[test]
    fn same_day_transactions_keep_order() {
        let mut map = BTreeMap::new();
        map.insert(
            "X".to_string(),
            vec![
                tx("X", (2024, 1, 2), TransactionKind::Sell, 1.0, 1.0),
                tx("X", (2024, 1, 2), TransactionKind::Buy, 4.0, 1.0),
                tx("X", (2024, 1, 1), TransactionKind::Buy, 2.0, 1.0),
            ],
        );

        let (items, _) = aggregate(map, 1);
        assert_eq!(stocks(&items[0]), vec![2.0, 1.0, 5.0]);
    }

    #[test]
    fn ids_are_dense_and_skip_empty_securities() {
        let mut map = BTreeMap::new();
        map.insert("C".to_string(), vec![tx("C", (2024, 1, 1), TransactionKind::Buy, 1.0, 1.0)]);
        map.insert(
            "B".to_string(),
            vec![tx("B", (2024, 1, 1), TransactionKind::Other("Fee".to_string()), 1.0, 1.0)],
        );
        map.insert("A".to_string(), vec![tx("A", (2024, 1, 1), TransactionKind::Buy, 1.0, 1.0)]);
        map.insert("D".to_string(), Vec::new());

        let (items, next) = aggregate(map, 5);
        assert_eq!(next, 7);
        let isins: Vec<&str> = items
            .iter()
            .map(|i| securities(i).isin.as_deref().unwrap())
            .collect();
        assert_eq!(isins, vec!["A", "C"]);
        assert_eq!(items.iter().map(|i| i.item_id).collect::<Vec<_>>(), vec![Some(5), Some(6)]);
    }

    #[test]
    fn prepare_kdvp_data_starts_at_one() {
        let mut map = BTreeMap::new();
        map.insert("B".to_string(), vec![tx("B", (2024, 1, 1), TransactionKind::Buy, 1.0, 1.0)]);
        map.insert("A".to_string(), vec![tx("A", (2024, 1, 1), TransactionKind::Buy, 1.0, 1.0)]);

        let data = prepare_kdvp_data(map, FormData::new(2024));
        assert_eq!(data.form.year, 2024);
        assert_eq!(data.items().iter().map(|i| i.item_id).collect::<Vec<_>>(), vec![Some(1), Some(2)]);
        assert_eq!(data.security_count(), 2);
        assert_eq!(data.next_item_id(), 3);
    }
}
