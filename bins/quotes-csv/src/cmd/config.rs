use clap::Args;
use serde::Deserialize;

use csvrec::DecodeOptions;

use super::error::QuotesCsvError;

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub input: Option<String>,
    pub output: Option<String>,
    pub header: Option<bool>,
    pub strict: Option<bool>,
    #[serde(default)]
    pub decode: DecodeOptions,
}

pub fn load_config(path: &str) -> Result<Config, QuotesCsvError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| QuotesCsvError::Config(format!("cannot read config {path}: {e}")))?;
    parse_config(&content).map_err(|e| QuotesCsvError::Config(format!("bad config {path}: {e}")))
}

fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug, Default)]
pub struct NormalizeArgs {
    /// Path to the TOML config
    #[arg(long, default_value = "quotes-csv.toml", env = "QUOTES_CSV_CONFIG")]
    pub config: String,

    /// Input CSV file (symbol,bid,ask,ts)
    #[arg(long)]
    pub input: Option<String>,

    /// Output CSV file (stdout when absent)
    #[arg(long)]
    pub output: Option<String>,

    /// Accept rows with missing trailing columns (filled with zero values)
    #[arg(long)]
    pub allow_missing: bool,

    /// Stop at the first malformed row
    #[arg(long)]
    pub stop_on_error: bool,

    /// Skip the first row if it is the column header
    #[arg(long)]
    pub skip_header: bool,

    /// Write a header row before the records
    #[arg(long)]
    pub header: bool,

    /// Exit with an error if any row was rejected
    #[arg(long)]
    pub strict: bool,
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Final configuration after merging: config file < env/CLI.
#[derive(Debug)]
pub struct Effective {
    pub input: String,
    pub output: Option<String>,
    pub header: bool,
    pub strict: bool,
    pub decode: DecodeOptions,
}

impl Effective {
    pub fn new(args: &NormalizeArgs) -> Result<Self, QuotesCsvError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => c,
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e);
                }
                Config::default()
            }
        };
        Self::merge(args, cfg)
    }

    fn merge(args: &NormalizeArgs, cfg: Config) -> Result<Self, QuotesCsvError> {
        let input = args
            .input
            .clone()
            .or(cfg.input)
            .ok_or_else(|| QuotesCsvError::Config("--input is required".into()))?;

        let decode = DecodeOptions::default()
            .allow_missing_trailing_fields(
                args.allow_missing || cfg.decode.allow_missing_trailing_fields,
            )
            .stop_on_first_error(args.stop_on_error || cfg.decode.stop_on_first_error)
            .skip_matching_header_row(args.skip_header || cfg.decode.skip_matching_header_row);

        Ok(Self {
            input,
            output: args.output.clone().or(cfg.output),
            header: args.header || cfg.header.unwrap_or(false),
            strict: args.strict || cfg.strict.unwrap_or(false),
            decode,
        })
    }
}
