// Copyright (c) 2026 Pagelift Oy. All rights reserved.
// This software is proprietary and confidential.

//! Pagelift CLI - Headless Page Fetcher and Extractor
//!
//! Example usage and demonstration of the pagelift library.

use std::env;
use std::path::Path;
use std::process::ExitCode;

use pagelift::{
    extract_all, extract_attribute, FieldSpec, ResourceKind, RouteRule, Session, SessionConfig,
    Settle,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pagelift=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "fetch" => {
            if args.len() < 3 {
                eprintln!("Usage: pagelift fetch <url> [--no-media]");
                return ExitCode::from(1);
            }
            let no_media = args.iter().any(|a| a == "--no-media");
            fetch_url(&args[2], no_media).await
        }
        "extract" => {
            if args.len() < 5 {
                eprintln!("Usage: pagelift extract <url> <container> <name=selector>...");
                return ExitCode::from(1);
            }
            extract_records(&args[2], &args[3], &args[4..]).await
        }
        "images" => {
            if args.len() < 3 {
                eprintln!("Usage: pagelift images <url> [dir]");
                return ExitCode::from(1);
            }
            let dir = args.get(3).map(String::as_str).unwrap_or(".");
            download_images(&args[2], dir).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("pagelift {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Pagelift - Headless Page Fetcher and Structured Extractor

USAGE:
    pagelift <COMMAND> [OPTIONS]

COMMANDS:
    fetch <url> [--no-media]                  Fetch a URL and display page information
    extract <url> <container> <name=sel>...   Extract records as JSON
    images <url> [dir]                        Download every <img> on a page
    help                                      Show this help message
    version                                   Show version information

EXAMPLES:
    pagelift fetch https://example.com
    pagelift fetch https://example.com --no-media
    pagelift extract https://books.toscrape.com .product_pod name=h3 price=.price_color
    pagelift images https://books.toscrape.com ./covers
"#
    );
}

async fn launch() -> Option<Session> {
    match Session::launch(SessionConfig::default()).await {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("Failed to launch session: {}", e);
            None
        }
    }
}

async fn fetch_url(url: &str, no_media: bool) -> ExitCode {
    println!("Fetching: {}", url);

    let session = match launch().await {
        Some(s) => s,
        None => return ExitCode::from(1),
    };

    if no_media {
        let rule = match RouteRule::abort(r"\.(png|jpe?g|gif|svg|webp|css|woff2?)(\?|$)") {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Invalid route pattern: {}", e);
                return ExitCode::from(1);
            }
        };
        if let Err(e) = session.route(rule) {
            eprintln!("Failed to register route: {}", e);
            return ExitCode::from(1);
        }
    }

    match session.navigate(url, Settle::default()).await {
        Ok(response) => {
            println!("\n=== Response ===");
            println!("Status: {}", response.status);
            println!("URL: {}", response.url);
            println!("Content-Type: {:?}", response.content_type());
            println!("Size: {} bytes", response.body_len());
            println!("Time: {}ms", response.response_time_ms);

            let page = session.page();
            if let Some(title) = page.title() {
                println!("\n=== Page ===");
                println!("Title: {}", title);
            }

            let links = page.links();
            if !links.is_empty() {
                println!("\n=== Links ({}) ===", links.len());
                for link in links.iter().take(10) {
                    println!("  - {}", link);
                }
                if links.len() > 10 {
                    println!("  ... and {} more", links.len() - 10);
                }
            }

            if no_media {
                let aborted = session
                    .network_log()
                    .iter()
                    .filter(|e| e.disposition == pagelift::Disposition::Aborted)
                    .count();
                println!("\nAborted {} media requests", aborted);
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to fetch URL: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn extract_records(url: &str, container: &str, specs: &[String]) -> ExitCode {
    let mut fields = Vec::with_capacity(specs.len());
    for spec in specs {
        match spec.split_once('=') {
            Some((name, selector)) if !name.is_empty() && !selector.is_empty() => {
                fields.push(FieldSpec::new(name, selector));
            }
            _ => {
                eprintln!("Invalid field spec (expected name=selector): {}", spec);
                return ExitCode::from(1);
            }
        }
    }

    let session = match launch().await {
        Some(s) => s,
        None => return ExitCode::from(1),
    };

    if let Err(e) = session.navigate(url, Settle::DomReady).await {
        eprintln!("Failed to fetch URL: {}", e);
        return ExitCode::from(1);
    }

    let doc = match session.page().require_document() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    match extract_all(&doc, container, &fields) {
        Ok(records) => {
            match serde_json::to_string_pretty(&records) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Failed to serialize records: {}", e);
                    return ExitCode::from(1);
                }
            }
            eprintln!("{} records", records.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Extraction failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn download_images(url: &str, dir: &str) -> ExitCode {
    println!("Harvesting images from: {}", url);

    let session = match launch().await {
        Some(s) => s,
        None => return ExitCode::from(1),
    };

    if let Err(e) = session.navigate(url, Settle::DomReady).await {
        eprintln!("Failed to fetch URL: {}", e);
        return ExitCode::from(1);
    }

    let page = session.page();
    let doc = match page.require_document() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let sources = match extract_attribute(&doc, "img", "src") {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Extraction failed: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Failed to create {}: {}", dir, e);
        return ExitCode::from(1);
    }

    let mut saved = 0usize;
    for (index, src) in sources.iter().enumerate() {
        if src.is_empty() {
            continue;
        }
        match page.fetch_bytes(src).await {
            Ok(bytes) => {
                let name = format!("image_{}.{}", index, file_extension(src));
                let path = Path::new(dir).join(&name);
                match std::fs::write(&path, &bytes) {
                    Ok(()) => {
                        println!("  {} ({} bytes)", path.display(), bytes.len());
                        saved += 1;
                    }
                    Err(e) => eprintln!("  Failed to write {}: {}", path.display(), e),
                }
            }
            Err(e) => eprintln!("  Failed to fetch {}: {}", src, e),
        }
    }

    let document_fetches = session
        .network_log()
        .iter()
        .filter(|e| e.kind == ResourceKind::Document)
        .count();
    println!(
        "\nSaved {} of {} images ({} document fetch)",
        saved,
        sources.len(),
        document_fetches
    );
    ExitCode::SUCCESS
}

/// Extension from the URL path, `bin` when there is none
fn file_extension(src: &str) -> &str {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    match path.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && !ext.contains('/') && ext.len() <= 5 => ext,
        _ => "bin",
    }
}
