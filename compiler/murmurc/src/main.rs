//! Murmur CLI
//!
//! Thin front end over the library crates: parse, render, evaluate.

use murmur_eval::Runtime;
use murmur_ir::MsgArena;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "run" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: murmurc run <file.mur>");
                std::process::exit(1);
            };
            let source = read_source(path);
            evaluate(&source, path);
        }
        "parse" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: murmurc parse <file.mur>");
                std::process::exit(1);
            };
            let source = read_source(path);
            let mut arena = MsgArena::new();
            match murmur_parse::from_text(&mut arena, &source, path) {
                Ok(head) => println!("{}", murmur_fmt::code(&arena, head)),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        "fmt" => {
            let Some(path) = args.get(2) else {
                eprintln!("Usage: murmurc fmt <file.mur>");
                std::process::exit(1);
            };
            let source = read_source(path);
            let mut arena = MsgArena::new();
            match murmur_parse::from_text(&mut arena, &source, path) {
                Ok(head) => println!("{}", murmur_fmt::formatted_code(&arena, head, 0)),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        "-e" | "eval" => {
            let Some(snippet) = args.get(2) else {
                eprintln!("Usage: murmurc -e <code>");
                std::process::exit(1);
            };
            evaluate(snippet, "<eval>");
        }
        "help" | "--help" => print_usage(),
        other => {
            eprintln!("error: unknown command `{other}`");
            print_usage();
            std::process::exit(1);
        }
    }
}

fn evaluate(source: &str, file: &str) {
    let mut arena = MsgArena::new();
    let mut runtime = Runtime::new(&arena);
    match runtime.do_text(&mut arena, source, file) {
        Ok(value) => println!("{}", value.render(arena.interner())),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn read_source(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::from_default_env())
        .init();
}

fn print_usage() {
    eprintln!("Usage: murmurc <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <file.mur>     Evaluate a file and print the result");
    eprintln!("  parse <file.mur>   Print the parsed chain as compact code");
    eprintln!("  fmt <file.mur>     Print the parsed chain as formatted code");
    eprintln!("  -e <code>          Evaluate a snippet");
    eprintln!("  help               Show this message");
}
