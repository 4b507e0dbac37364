//! Dispatching on a leading verb.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p command-bind-parser --example verbs -- push --force origin
//! ```

use command_bind_core::{SchemaBuilder, SchemaError, Specification, ValueType, VerbSpecification};
use command_bind_parser::{Parser, ParserResult, VerbSet};

#[derive(Debug, Default)]
struct Push {
    force: bool,
    remote: Option<String>,
}

#[derive(Debug, Default)]
struct Fetch {
    all: bool,
    depth: Option<i64>,
}

#[derive(Debug)]
enum Command {
    Push(Push),
    Fetch(Fetch),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("invalid schema: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), SchemaError> {
    let mut push_verb = VerbSpecification::new("push");
    push_verb.help_text = Some("Update remote refs".into());
    let push = SchemaBuilder::mutable("Push", Push::default)
        .verb(push_verb)
        .field("force", Specification::switch(Some('f'), Some("force")), |p| &p.force, |p| &mut p.force)
        .field("remote", Specification::value(0, ValueType::String), |p| &p.remote, |p| &mut p.remote)
        .build()?;

    let fetch = SchemaBuilder::mutable("Fetch", Fetch::default)
        .verb(VerbSpecification::new("fetch"))
        .field("all", Specification::switch(None, Some("all")), |f| &f.all, |f| &mut f.all)
        .field(
            "depth",
            Specification::scalar(None, Some("depth"), ValueType::Integer),
            |f| &f.depth,
            |f| &mut f.depth,
        )
        .build()?;

    let verbs = VerbSet::new()
        .register(&push, Command::Push)?
        .register(&fetch, Command::Fetch)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match verbs.parse(&Parser::default(), &args)? {
        ParserResult::Parsed(parsed) => println!("{:?}", parsed.value),
        ParserResult::NotParsed(not_parsed) => {
            let names: Vec<&str> = verbs.verbs().map(|v| v.name.as_str()).collect();
            eprintln!("available verbs: {}", names.join(", "));
            for err in &not_parsed.errors {
                eprintln!("error: {err}");
            }
        }
    }
    Ok(())
}
