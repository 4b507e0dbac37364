//! Binding a type built through its constructor.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p command-bind-parser --example immutable_options -- --host example.org -p 8443
//! ```

use command_bind_core::{SchemaBuilder, Specification, ValueType};
use command_bind_parser::Parser;

#[derive(Debug)]
struct Endpoint {
    host: String,
    port: u16,
    secure: bool,
}

impl Endpoint {
    fn new(host: String, port: u16, secure: bool) -> Self {
        Self { host, port, secure }
    }
}

fn main() {
    let schema = SchemaBuilder::immutable("Endpoint", |args| {
        Ok(Endpoint::new(args.take("host")?, args.take("port")?, args.take("secure")?))
    })
    .member(
        "host",
        Specification::scalar(None, Some("host"), ValueType::String).as_required(),
        |e: &Endpoint| &e.host,
    )
    .member(
        "port",
        Specification::scalar(Some('p'), Some("port"), ValueType::Integer).with_default(443),
        |e: &Endpoint| &e.port,
    )
    .member("secure", Specification::switch(Some('s'), Some("secure")), |e: &Endpoint| &e.secure)
    .build();

    let schema = match schema {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("invalid schema: {err}");
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    match Parser::default().parse_arguments(&schema, &args).map(|r| r.into_result()) {
        Ok(Ok(parsed)) => println!("{:?}", parsed.value),
        Ok(Err(not_parsed)) => {
            for err in &not_parsed.errors {
                eprintln!("error: {err}");
            }
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("invalid schema: {err}");
            std::process::exit(1);
        }
    }
}
