//! CLI tool to check, dump, and highlight Weft source files.

use std::fs;
use std::process::ExitCode;

use weft_syntax::{Highlighter, ParseOptions, parse_tree_with, parse_with};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: weft <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  check      Report syntax errors");
        eprintln!("  tree       Print the syntax tree");
        eprintln!("  highlight  Print the source as highlighted HTML");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --no-whitespace-calls  Reject calls written without parentheses");
        eprintln!();
        eprintln!("Set RUST_LOG=debug (or trace) for parser diagnostics.");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    if !matches!(command, "check" | "tree" | "highlight") {
        eprintln!("Unknown command: {command}");
        return ExitCode::from(2);
    }

    let mut whitespace_calls = true;
    let mut files = Vec::new();
    for arg in &args[2..] {
        match arg.as_str() {
            "--no-whitespace-calls" => whitespace_calls = false,
            flag if flag.starts_with("--") => {
                eprintln!("Unknown option: {flag}");
                return ExitCode::from(2);
            }
            path => files.push(path),
        }
    }

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };
        let options = ParseOptions::new()
            .file(path)
            .whitespace_calls(whitespace_calls);

        let errors = match command {
            "highlight" => {
                let mut highlighter = Highlighter::new();
                parse_with(&options, &content, &mut highlighter);
                let errors = highlighter.errors().to_vec();
                println!("{}", highlighter.into_html());
                errors
            }
            _ => {
                let tree = parse_tree_with(&options, &content);
                if let (Some(root), "tree") = (&tree.root, command) {
                    print!("{root}");
                }
                if command == "check" && tree.errors.is_empty() {
                    eprintln!("{path}: ok");
                }
                tree.errors
            }
        };

        for error in &errors {
            eprintln!("{error}");
        }
        had_error |= !errors.is_empty();
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
