//! Rendering of [`DohKdvpData`] into the eDavki envelope.
//!
//! Element names, nesting and order are fixed by the Doh_KDVP and
//! EDP-Common schemas.

use chrono::NaiveDate;
use log::{info, warn};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::decimal::to_xml_decimal;
use crate::error::Result;
use crate::kdvp::{
    DocWorkflowId, DohKdvpData, InventoryRow, ItemHoldings, KdvpItem, RowEntry, RowPurchase,
    RowSale, SecuritiesPlvp, TaxPayer,
};

pub const NS_DOH: &str = "http://edavki.durs.si/Documents/Schemas/Doh_KDVP_9.xsd";
pub const NS_EDP: &str = "http://edavki.durs.si/Documents/Schemas/EDP-Common-1.xsd";

const WORKFLOW_NAME: &str = "Doh_KDVP";

const QUANTITY_PRECISION: usize = 8;
const VALUE_PRECISION: usize = 8;
const TAX_PRECISION: usize = 4;

/// Builds the complete `<Envelope>` document, declaration included.
pub fn generate_envelope(data: &DohKdvpData, tp: &TaxPayer) -> Result<String> {
    let mut w = XmlWriter::new();
    w.declaration()?;

    w.start_with_attrs("Envelope", &[("xmlns", NS_DOH), ("xmlns:edp", NS_EDP)])?;
    write_edp_header(&mut w, tp, data.form.doc_id)?;
    w.empty("edp:Signatures")?;

    w.start("body")?;
    w.empty("edp:bodyContent")?;
    write_doh_kdvp(&mut w, data)?;
    w.end("body")?;

    w.end("Envelope")?;

    let xml = w.finish()?;
    info!(
        "rendered Doh_KDVP for {} with {} item(s)",
        data.form.year,
        data.items().len()
    );
    Ok(xml)
}

/// Renders only the `<Doh_KDVP>` body element.
pub fn generate_doh_kdvp(data: &DohKdvpData) -> Result<String> {
    let mut w = XmlWriter::new();
    write_doh_kdvp(&mut w, data)?;
    w.finish()
}

fn write_edp_header(w: &mut XmlWriter, tp: &TaxPayer, doc_id: DocWorkflowId) -> Result<()> {
    w.start("edp:Header")?;

    w.start("edp:taxpayer")?;
    w.text("edp:taxNumber", tp.tax_number())?;
    w.boolean("edp:resident", tp.resident)?;
    w.end("edp:taxpayer")?;

    w.start("edp:Workflow")?;
    w.text("edp:DocumentWorkflowID", doc_id.code())?;
    w.text("edp:DocumentWorkflowName", WORKFLOW_NAME)?;
    w.end("edp:Workflow")?;

    w.end("edp:Header")
}

fn write_doh_kdvp(w: &mut XmlWriter, data: &DohKdvpData) -> Result<()> {
    let form = &data.form;
    w.start("Doh_KDVP")?;

    w.start("KDVP")?;
    w.text("DocumentWorkflowID", form.doc_id.code())?;
    w.text("DocumentWorkflowName", WORKFLOW_NAME)?;
    w.text("Year", &form.year.to_string())?;
    w.text("PeriodStart", &form.period_start())?;
    w.text("PeriodEnd", &form.period_end())?;
    w.boolean("IsResident", form.is_resident)?;
    w.opt_text("TelephoneNumber", form.telephone_number.as_deref())?;
    w.opt_text("Email", form.email.as_deref())?;
    w.text("SecurityCount", &data.security_count().to_string())?;
    // short, contract and share lists are never produced
    w.text("SecurityShortCount", "0")?;
    w.text("SecurityWithContractCount", "0")?;
    w.text("SecurityWithContractShortCount", "0")?;
    w.text("ShareCount", "0")?;
    w.end("KDVP")?;

    for item in data.items() {
        write_item(w, item)?;
    }

    w.end("Doh_KDVP")
}

fn write_item(w: &mut XmlWriter, item: &KdvpItem) -> Result<()> {
    w.start("KDVPItem")?;

    if let Some(id) = item.item_id {
        w.text("ItemID", &id.to_string())?;
    }
    w.text("InventoryListType", item.list_type.code())?;

    if let Some(tax) = &item.foreign_tax {
        w.boolean("HasForeignTax", true)?;
        w.decimal("ForeignTax", tax.amount, TAX_PRECISION)?;
        w.text("FTCountryID", &tax.country_id)?;
    }

    match &item.holdings {
        ItemHoldings::Securities(sec) => write_securities(w, sec)?,
        ItemHoldings::Shares(shares) => {
            warn!("share ledger '{}' is not rendered, only its item header", shares.name);
        }
    }

    w.end("KDVPItem")
}

fn write_securities(w: &mut XmlWriter, sec: &SecuritiesPlvp) -> Result<()> {
    w.start("Securities")?;

    w.opt_text("ISIN", sec.isin.as_deref())?;
    w.opt_text("Code", sec.code.as_deref())?;
    w.text("Name", &sec.name)?;
    w.boolean("IsFond", sec.is_fund)?;
    w.opt_text("Resolution", sec.resolution.as_deref())?;
    w.opt_text("ResolutionDate", sec.resolution_date.as_deref())?;

    for row in sec.rows.iter() {
        write_row(w, row)?;
    }

    w.end("Securities")
}

fn write_row(w: &mut XmlWriter, row: &InventoryRow) -> Result<()> {
    w.start("Row")?;
    w.text("ID", &row.id.to_string())?;

    match &row.entry {
        RowEntry::Purchase(purchase) => write_purchase(w, purchase)?,
        RowEntry::Sale(sale) => write_sale(w, sale)?,
    }

    if let Some(stock) = row.stock {
        w.decimal("F8", stock, QUANTITY_PRECISION)?;
    }

    w.end("Row")
}

fn write_purchase(w: &mut XmlWriter, p: &RowPurchase) -> Result<()> {
    w.start("Purchase")?;
    w.opt_date("F1", p.acquired_on)?;
    if let Some(gain_type) = p.gain_type {
        w.text("F2", gain_type.code())?;
    }
    w.opt_decimal("F3", p.quantity, QUANTITY_PRECISION)?;
    w.opt_decimal("F4", p.unit_value, VALUE_PRECISION)?;
    w.opt_decimal("F5", p.inheritance_tax, TAX_PRECISION)?;
    w.opt_decimal("F11", p.reduced_value, VALUE_PRECISION)?;
    w.end("Purchase")
}

fn write_sale(w: &mut XmlWriter, s: &RowSale) -> Result<()> {
    w.start("Sale")?;
    w.opt_date("F6", s.disposed_on)?;
    w.opt_decimal("F7", s.quantity, QUANTITY_PRECISION)?;
    w.opt_decimal("F9", s.value, VALUE_PRECISION)?;
    if let Some(flag) = s.loss_rule {
        w.boolean("F10", flag)?;
    }
    w.end("Sale")
}

/// Thin element-level layer over `quick_xml::Writer`; every value goes
/// through it as text so numbers never reach a default float format.
struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn new() -> XmlWriter {
        XmlWriter {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn declaration(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    fn start_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.write(Event::Start(start))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str) -> Result<()> {
        self.write(Event::Empty(BytesStart::new(name)))
    }

    fn text(&mut self, name: &str, value: &str) -> Result<()> {
        self.start(name)?;
        self.write(Event::Text(BytesText::new(value)))?;
        self.end(name)
    }

    fn opt_text(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.text(name, value),
            None => Ok(()),
        }
    }

    fn boolean(&mut self, name: &str, value: bool) -> Result<()> {
        self.text(name, if value { "true" } else { "false" })
    }

    fn decimal(&mut self, name: &str, value: f64, precision: usize) -> Result<()> {
        self.text(name, &to_xml_decimal(value, precision))
    }

    fn opt_decimal(&mut self, name: &str, value: Option<f64>, precision: usize) -> Result<()> {
        match value {
            Some(value) => self.decimal(name, value, precision),
            None => Ok(()),
        }
    }

    fn opt_date(&mut self, name: &str, value: Option<NaiveDate>) -> Result<()> {
        match value {
            Some(date) => self.text(name, &date.format("%Y-%m-%d").to_string()),
            None => Ok(()),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.inner.write_event(event)?;
        Ok(())
    }

    fn finish(self) -> Result<String> {
        Ok(String::from_utf8(self.inner.into_inner())?)
    }
}
