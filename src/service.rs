use std::fs::File;
use std::path::{Path, PathBuf};

use log::info;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::inventory::prepare_kdvp_data;
use crate::kdvp::xml::generate_envelope;
use crate::kdvp::{FormData, TaxPayer};
use crate::ledger::write_ledger_file;
use crate::parser::{parse_json, AssetClass};

pub const INTERMEDIATE_FILE: &str = "intermediate_data.json";
pub const KDVP_FILE: &str = "Doh_KDVP.xml";
pub const LEDGER_FILE: &str = "Doh_KDVP_ledger.csv";

#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub input_file: PathBuf,
    pub output_directory: PathBuf,
    pub taxpayer: TaxPayer,
    pub form: FormData,
    pub asset_class: AssetClass,
    /// stop after writing the extracted transactions
    pub json_only: bool,
    pub write_ledger: bool,
}

#[derive(Debug, Default, PartialEq)]
pub struct GenerationResult {
    pub created_files: Vec<PathBuf>,
}

/// Builds the Doh_KDVP envelope for `json` in memory.
pub fn generate_kdvp_xml(
    json: &Value,
    asset_class: AssetClass,
    form: FormData,
    taxpayer: &TaxPayer,
) -> Result<String> {
    let extraction = parse_json(asset_class, json)?;
    let data = prepare_kdvp_data(extraction.transactions, form);
    generate_envelope(&data, taxpayer)
}

pub fn process_request(request: &GenerationRequest) -> Result<GenerationResult> {
    let json = load_json(&request.input_file)?;
    let extraction = parse_json(request.asset_class, &json)?;

    std::fs::create_dir_all(&request.output_directory)?;
    let mut result = GenerationResult::default();

    if request.json_only {
        let path = request.output_directory.join(INTERMEDIATE_FILE);
        serde_json::to_writer_pretty(File::create(&path)?, &extraction.transactions)?;
        info!("wrote {}", path.display());
        result.created_files.push(path);
        return Ok(result);
    }

    let data = prepare_kdvp_data(extraction.transactions, request.form.clone());
    let xml = generate_envelope(&data, &request.taxpayer)?;

    let path = request.output_directory.join(KDVP_FILE);
    std::fs::write(&path, xml)?;
    info!("wrote {}", path.display());
    result.created_files.push(path);

    if request.write_ledger {
        let path = request.output_directory.join(LEDGER_FILE);
        write_ledger_file(&data, &path)?;
        info!("wrote {}", path.display());
        result.created_files.push(path);
    }

    Ok(result)
}

fn load_json(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    if extension.as_deref() != Some("json") {
        return Err(Error::UnsupportedFormat(path.display().to_string()));
    }

    let file = File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}
