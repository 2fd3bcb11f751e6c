/// Preview — generate a batch of questions against a live SPARQL endpoint.
///
/// Usage: preview --templates <file.ron> [--config <file.ron>] [--count <n>]
///                [--seed <n>] [--endpoint <url>]
///
/// Prints the batch as JSON. Set RUST_LOG=debug to trace each query.

use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use trivia_engine::core::pipeline::QuestionGenerator;
use trivia_engine::core::store::InMemoryTemplateStore;
use trivia_engine::core::wikidata::WikidataClient;

const USAGE: &str = "Usage: preview --templates <file.ron> [--config <file.ron>] [--count <n>] [--seed <n>] [--endpoint <url>]";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut templates_path = None;
    let mut config_path = None;
    let mut endpoint = None;
    let mut seed: Option<u64> = None;
    let mut count = 5usize;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--templates" if i + 1 < args.len() => {
                i += 1;
                templates_path = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--endpoint" if i + 1 < args.len() => {
                i += 1;
                endpoint = Some(args[i].clone());
            }
            "--count" if i + 1 < args.len() => {
                i += 1;
                count = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --count must be a positive integer");
                    process::exit(1);
                });
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = Some(args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --seed must be an unsigned integer");
                    process::exit(1);
                }));
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        }
        i += 1;
    }

    let templates_path = templates_path.unwrap_or_else(|| {
        eprintln!("Error: --templates is required");
        eprintln!("{}", USAGE);
        process::exit(1);
    });

    let store = InMemoryTemplateStore::load_from_ron(Path::new(&templates_path)).unwrap_or_else(|e| {
        eprintln!("Error loading templates from '{}': {}", templates_path, e);
        process::exit(1);
    });
    eprintln!("Loaded {} templates", store.len());

    let mut client = WikidataClient::new().unwrap_or_else(|e| {
        eprintln!("Error creating SPARQL client: {}", e);
        process::exit(1);
    });
    if let Some(ref url) = endpoint {
        client = client.with_endpoint(url);
    }

    let mut builder = QuestionGenerator::builder()
        .template_store(Arc::new(store))
        .knowledge_graph(Arc::new(client));
    if let Some(ref path) = config_path {
        builder = builder.config_path(path);
    }
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }

    let mut generator = builder.build().unwrap_or_else(|e| {
        eprintln!("Error building generator: {}", e);
        process::exit(1);
    });

    match generator.generate_questions(count).await {
        Ok(questions) => match serde_json::to_string_pretty(&questions) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing questions: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    }
}
