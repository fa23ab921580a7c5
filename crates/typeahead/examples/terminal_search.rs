//! Typeahead Terminal Example
//!
//! Drives a search input from the terminal. Every line read from stdin is
//! treated as the new content of the input; the render model is printed
//! whenever the visible state changes.
//!
//! Commands:
//! - `:select N` - pick the N-th shown result
//! - `:submit` - look the current text up without waiting
//! - `:clear` - empty the input
//! - `:quit` - exit
//!
//! An optional first argument names a TOML config file (`placeholder`,
//! `debounce_ms`).
//!
//! Run with: cargo run -p typeahead --example terminal_search [config.toml]

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use typeahead::{MatchMode, SearchInput, SearchInputConfig, StaticSearchProvider};

const LANGUAGES: &[&str] = &[
    "Ada", "C", "C++", "Clojure", "Crystal", "Elixir", "Erlang", "F#", "Gleam", "Go", "Haskell",
    "Java", "JavaScript", "Julia", "Kotlin", "Lua", "Nim", "OCaml", "Odin", "Perl", "PHP",
    "Python", "Racket", "Ruby", "Rust", "Scala", "Swift", "TypeScript", "Zig",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("typeahead=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SearchInputConfig::load_toml(path)?,
        None => SearchInputConfig::new()
            .with_placeholder("Search programming languages")
            .with_debounce(Duration::from_millis(500)),
    };

    let provider = StaticSearchProvider::new(LANGUAGES.iter().copied())
        .with_match_mode(MatchMode::Contains)
        .with_latency(Duration::from_millis(250));

    let input = SearchInput::with_on_select(config, provider, |item| {
        println!("> selected {item}");
    })?;

    input.controller().state_changed().connect(|state| {
        let view = state.view().to_string();
        if view.is_empty() {
            println!("[{}]", state.text);
        } else {
            println!("[{}]\n{view}", state.text);
        }
    });

    if let Some(placeholder) = input.placeholder() {
        println!("({placeholder})");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim_end() {
            ":quit" => break,
            ":clear" => input.clear()?,
            ":submit" => {
                if !input.submit() {
                    println!("(nothing pending)");
                }
            }
            command if command.starts_with(":select") => {
                let index = command[":select".len()..].trim().parse::<usize>();
                match index.ok().and_then(|i| input.select_item(i)) {
                    Some(_) => {}
                    None => println!("(no such result)"),
                }
            }
            text => input.set_text(text)?,
        }
    }

    input.dispose();
    Ok(())
}
