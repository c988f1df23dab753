use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};

use clap::{Arg, Command};
use tracing::{info, warn};

use lac_fmmseg::config::Config;
use lac_fmmseg::dictionary_lib::Customization;
use lac_fmmseg::segment::Segments;
use lac_fmmseg::tag::{parse_tags, Tag};
use lac_fmmseg::Lac;

const FORMAT_LIST: [&str; 2] = ["plain", "json"];

/// Splits an input line `text<TAB>TAG TAG ...` into the text and its tags.
fn parse_line(line: &str) -> Option<(String, Vec<Tag>)> {
    let (text, labels) = line.split_once('\t')?;
    Some((text.to_string(), parse_tags(labels)))
}

/// Reads every usable `text<TAB>tags` line.
///
/// Lines without a tab, or whose tag count differs from the text's char
/// count, are skipped with a warning naming the 1-based line number.
fn read_batch(input: impl BufRead) -> io::Result<(Vec<String>, Vec<Vec<Tag>>)> {
    let mut texts = Vec::new();
    let mut tags = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some((text, line_tags)) = parse_line(&line) else {
            warn!(line = i + 1, "skipping line without a tab separator");
            continue;
        };
        let text_len = text.chars().count();
        if text_len != line_tags.len() {
            warn!(
                line = i + 1,
                text_len,
                tags_len = line_tags.len(),
                "skipping line whose tag count does not match its text"
            );
            continue;
        }
        texts.push(text);
        tags.push(line_tags);
    }
    Ok((texts, tags))
}

fn write_plain(segments: &Segments, output: &mut dyn Write) -> io::Result<()> {
    let line: Vec<String> = segments
        .iter()
        .map(|s| format!("{}/{}", s.word, s.pos))
        .collect();
    writeln!(output, "{}", line.join(" "))
}

fn write_json(segments: &Segments, output: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer(&mut *output, segments).map_err(io::Error::other)?;
    writeln!(output)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    const BLUE: &str = "\x1B[1;34m";
    const RESET: &str = "\x1B[0m";

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let matches = Command::new("LAC Rust")
        .about(format!(
            "{BLUE}LAC Rust: word segments and POS from per-char tags, with user-dictionary overrides{RESET}"
        ))
        .after_help(
            "Input lines are `text<TAB>TAG TAG ...`, one tag per char, e.g.\n\
             \n\
             春天的花开\tTIME-B TIME-I u-B n-B v-I\n",
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("file")
                .help("Read tagged text from <file>."),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("file")
                .help("Write segments to <file>."),
        )
        .arg(
            Arg::new("dict")
                .short('d')
                .long("dict")
                .value_name("file")
                .help("User dictionary (`word` or `word/POS` fields per line)."),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("file")
                .help("TOML configuration naming dictionaries and vocabularies."),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("format")
                .default_value("plain")
                .value_parser(FORMAT_LIST)
                .help("Output format: [plain|json]"),
        )
        .get_matches();

    let input_file = matches.get_one::<String>("input");
    let output_file = matches.get_one::<String>("output");
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("plain");

    let config = match matches.get_one::<String>("config") {
        Some(path) => Config::load_toml(path)?,
        None => Config::default(),
    };
    let mut lac = Lac::from_config(&config)?;
    if let Some(dict) = matches.get_one::<String>("dict") {
        lac = lac.with_customization(Customization::from_file(dict)?);
    }

    let input: Box<dyn BufRead> = match input_file {
        Some(file_name) => Box::new(BufReader::new(File::open(file_name)?)),
        None => {
            if io::stdin().is_terminal() {
                eprintln!("{BLUE}Input `text<TAB>tags` lines, <ctrl-z> or <ctrl-d> to submit:{RESET}");
            }
            Box::new(io::stdin().lock())
        }
    };

    let (texts, tags) = read_batch(input)?;
    let results = lac.lac_tags(&texts, tags)?;

    let mut output = BufWriter::new(match output_file {
        Some(file_name) => Box::new(File::create(file_name)?) as Box<dyn Write>,
        None => Box::new(io::stdout()) as Box<dyn Write>,
    });
    for segments in &results {
        match format {
            "json" => write_json(segments, &mut output)?,
            _ => write_plain(segments, &mut output)?,
        }
    }
    output.flush()?;

    info!(
        texts = results.len(),
        dict_entries = lac.customization().len(),
        output = output_file.map_or("stdout", String::as_str),
        "analysis completed"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_splits_text_and_tags() {
        let (text, tags) = parse_line("我的\tr-B u-B").unwrap();
        assert_eq!(text, "我的");
        assert_eq!(tags.len(), 2);
        assert!(parse_line("no tags here").is_none());
    }

    #[test]
    fn read_batch_skips_mismatched_lines() {
        let input = "我的\tr-B u-B\n想法\tn-B\nno tab\n\n书\tn-B\n";
        let (texts, tags) = read_batch(input.as_bytes()).unwrap();
        assert_eq!(texts, vec!["我的", "书"]);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1], parse_tags("n-B"));

        let results = Lac::new().lac_tags(&texts, tags).unwrap();
        assert_eq!(results[1].words(), vec!["书"]);
    }

    #[test]
    fn plain_output_joins_word_pos_pairs() {
        let segments = Lac::new()
            .analyze("我的想法", parse_tags("r-B u-B n-B n-I"))
            .unwrap();
        let mut out = Vec::new();
        write_plain(&segments, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "我/r 的/u 想法/n\n");
    }
}
