use clap::{Arg};

pub struct App {
    input_path: String,
    output_dir: String,
    conf_path: String,
    year: Option<i32>,
    json_only: bool,
    ledger: bool,
}

impl App {
    pub fn new() -> App {
        let matches = clap::App::new("kdvp")
            .version("0.1.0")
            .about("Turns a broker's gains and losses statement into an eDavki Doh_KDVP declaration")
            .arg(Arg::with_name("input_path")
                .short("i")
                .long("input")
                .takes_value(true)
                .help("Statement JSON to process"))
            .arg(Arg::with_name("output_dir")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Directory the generated files are written to"))
            .arg(Arg::with_name("config_path")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("Config file"))
            .arg(Arg::with_name("year")
                .short("y")
                .long("year")
                .takes_value(true)
                .validator(|v| v.parse::<i32>().map(|_| ()).map_err(|e| e.to_string()))
                .help("Tax year, overrides the config file"))
            .arg(Arg::with_name("json_only")
                .long("json-only")
                .takes_value(false)
                .help("Only writes the extracted transactions"))
            .arg(Arg::with_name("ledger")
                .long("ledger")
                .takes_value(false)
                .help("Also writes a CSV ledger of all inventory rows"))
            .get_matches();

        App {
            input_path: matches.value_of("input_path")
                .unwrap_or("transactions.json")
                .to_string(),
            output_dir: matches.value_of("output_dir")
                .unwrap_or(".")
                .to_string(),
            conf_path: matches.value_of("config_path")
                .unwrap_or("config.yaml")
                .to_string(),
            year: matches.value_of("year").and_then(|y| y.parse().ok()),
            json_only: matches.is_present("json_only"),
            ledger: matches.is_present("ledger"),
        }
    }

    pub fn get_config_path(&self) -> &str { &self.conf_path }
    pub fn get_input_path(&self) -> &str { &self.input_path }
    pub fn get_output_dir(&self) -> &str { &self.output_dir }
    pub fn get_year(&self) -> Option<i32> { self.year }
    pub fn get_json_only(&self) -> bool { self.json_only }
    pub fn get_ledger(&self) -> bool { self.ledger }
}
