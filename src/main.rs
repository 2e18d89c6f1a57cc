mod app;

use std::path::PathBuf;
use std::process;

use kdvp_tax::config::Config;
use kdvp_tax::service::{process_request, GenerationRequest};

use crate::app::App;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = App::new();

    let mut config = Config::new(app.get_config_path()).unwrap_or_else(|err| {
        println!("Unable to read config file \"{}\": {}", app.get_config_path(), err);
        process::exit(1);
    });
    if let Some(year) = app.get_year() {
        config.set_year(year);
    }

    let taxpayer = config.taxpayer().unwrap_or_else(|err| {
        println!("{}", err);
        process::exit(1);
    });

    let request = GenerationRequest {
        input_file: PathBuf::from(app.get_input_path()),
        output_directory: PathBuf::from(app.get_output_dir()),
        taxpayer,
        form: config.form_data(),
        asset_class: config.asset_class(),
        json_only: app.get_json_only(),
        write_ledger: app.get_ledger(),
    };

    match process_request(&request) {
        Ok(result) => {
            println!("Created:");
            for file in result.created_files.iter() {
                println!("{}", file.display());
            }
        }
        Err(err) => {
            println!("Failed to generate XML: {}", err);
            process::exit(1);
        }
    }
}
