use clap::{Arg, Command};
use lac_fmmseg::dictionary_lib::Customization;
use lac_fmmseg::errors::LacError;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    const BLUE: &str = "\x1B[1;34m"; // Bold Blue
    const RESET: &str = "\x1B[0m"; // Reset color

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = Command::new("Dictionary Compiler")
        .about(format!(
            "{BLUE}Dict Compile: precompile a LAC user dictionary into a binary artifact{RESET}"
        ))
        .after_help(
            "Examples:\n\
         \n\
         dict-compile --input custom.dic --format zstd --output user_dict.zstd\n\
         dict-compile --input custom.dic --format cbor --output user_dict.cbor\n\
         \n\
         The ZSTD artifact can be loaded with Customization::load_compressed()\n\
         or referenced as `compiled_dict` in the TOML configuration.\n",
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("filename")
                .required(true)
                .help("User dictionary text file (`word` or `word/POS` fields per line)."),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("format")
                .default_value("zstd")
                .value_parser(["zstd", "cbor"])
                .help("Dictionary format: [zstd|cbor]"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("filename")
                .help("Write compiled dictionary to <filename>. If not specified, a default filename is used."),
        )
        .get_matches();

    let input_file = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or_default();

    let dict_format = matches.get_one::<String>("format").map(String::as_str);
    let default_output = match dict_format {
        Some("cbor") => "user_dict.cbor",
        _ => "user_dict.zstd",
    };
    let output_file = matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or(default_output);

    compile(input_file, dict_format, output_file)?;
    match dict_format {
        Some("cbor") => eprintln!("{BLUE}Dictionary saved in CBOR format at: {output_file}{RESET}"),
        _ => eprintln!("{BLUE}Dictionary saved in ZSTD format at: {output_file}{RESET}"),
    }

    Ok(())
}

/// Parses `input_file` and writes it as CBOR or zstd-compressed CBOR.
fn compile(input_file: &str, dict_format: Option<&str>, output_file: &str) -> Result<(), LacError> {
    let custom = Customization::from_file(input_file)?;
    info!(entries = custom.len(), "dictionary parsed");

    match dict_format {
        Some("cbor") => custom.serialize_to_cbor(output_file),
        _ => custom.save_compressed(output_file),
    }
}
