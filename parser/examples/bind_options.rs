//! Binding a mutable options struct and formatting it back.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p command-bind-parser --example bind_options -- -v --jobs 8 -- src tests
//! ```

use std::path::PathBuf;

use command_bind_core::{SchemaBuilder, Specification, ValueType};
use command_bind_parser::{Parser, ParserResult, Unparser, UnparserSettings};

#[derive(Debug, Default)]
struct BuildOptions {
    verbose: bool,
    jobs: u32,
    features: Vec<String>,
    paths: Vec<PathBuf>,
}

fn main() {
    let schema = match SchemaBuilder::mutable("BuildOptions", BuildOptions::default)
        .field("verbose", Specification::switch(Some('v'), Some("verbose")), |o| &o.verbose, |o| &mut o.verbose)
        .field(
            "jobs",
            Specification::scalar(Some('j'), Some("jobs"), ValueType::Integer).with_default(4),
            |o| &o.jobs,
            |o| &mut o.jobs,
        )
        .field(
            "features",
            Specification::sequence(None, Some("features"), ValueType::String).with_separator(','),
            |o| &o.features,
            |o| &mut o.features,
        )
        .field("paths", Specification::value_sequence(0, ValueType::String), |o| &o.paths, |o| &mut o.paths)
        .build()
    {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("invalid schema: {err}");
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match Parser::default().parse_arguments(&schema, &args) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("invalid schema: {err}");
            std::process::exit(1);
        }
    };

    match result {
        ParserResult::Parsed(parsed) => {
            println!("Bound: {:?}", parsed.value);
            let unparser = Unparser::new(UnparserSettings::with_group_switches_only());
            println!("Command line: {}", unparser.format_command_line(&schema, &parsed.value));
        }
        ParserResult::NotParsed(not_parsed) => {
            eprintln!("{not_parsed}");
            for err in &not_parsed.errors {
                eprintln!("  - {err}");
            }
            std::process::exit(2);
        }
    }
}
