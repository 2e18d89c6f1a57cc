use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::kdvp::{DocWorkflowId, FormData, TaxPayer};
use crate::parser::AssetClass;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub(crate) tax_number: String,
    #[serde(default = "default_resident")]
    pub(crate) resident: bool,
    pub(crate) year: i32,
    #[serde(default)]
    pub(crate) telephone_number: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) workflow: DocWorkflowId,
    #[serde(default = "default_asset_class")]
    pub(crate) asset_class: AssetClass,
}

fn default_resident() -> bool {
    true
}

fn default_asset_class() -> AssetClass {
    AssetClass::Funds
}

impl Config {
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Config> {
        let file = std::fs::File::open(config_path)?;
        let config: Config = ::serde_yaml::from_reader(file)?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Config> {
        Ok(::serde_yaml::from_str(yaml)?)
    }

    pub fn asset_class(&self) -> AssetClass {
        self.asset_class
    }

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
    }

    pub fn form_data(&self) -> FormData {
        FormData {
            doc_id: self.workflow,
            year: self.year,
            is_resident: self.resident,
            telephone_number: self.telephone_number.clone(),
            email: self.email.clone(),
        }
    }

    pub fn taxpayer(&self) -> Result<TaxPayer> {
        TaxPayer::new(&self.tax_number, self.resident)
    }
}
