use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use bodh::Config;

#[derive(Parser)]
#[command(name = "bodh")]
#[command(about = "Convert Markdown slide decks to HTML fragments, LaTeX and PDF")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Configuration file (defaults to config.toml next to the input)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write HTML slide fragments to this file
    #[arg(long)]
    html: Option<PathBuf>,

    /// Write the LaTeX document to this file
    #[arg(long)]
    tex: Option<PathBuf>,

    /// Compile the LaTeX document to this PDF file
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(&cli);

    let markdown = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    // Without an explicit target, write LaTeX next to the input
    let tex = match (&cli.html, &cli.tex, &cli.pdf) {
        (None, None, None) => Some(cli.input.with_extension("tex")),
        _ => cli.tex.clone(),
    };

    let conversion = match bodh::convert(&markdown, &config) {
        Ok(conversion) => conversion,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = &cli.html {
        write_output(path, html_document(&conversion.html).as_bytes());
    }

    if let Some(path) = &tex {
        write_output(path, conversion.latex.as_bytes());
    }

    if let Some(path) = &cli.pdf {
        let pdf_bytes = match bodh::markdown_to_pdf_with_config(&markdown, &config) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        write_output(path, &pdf_bytes);
    }
}

fn load_config(cli: &Cli) -> Config {
    let path = match &cli.config {
        Some(path) if !path.exists() => {
            eprintln!("Error: config file {} does not exist", path.display());
            std::process::exit(1);
        }
        Some(path) => path.clone(),
        None => cli.input.with_file_name("config.toml"),
    };

    match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

/// Fragments as consecutive slide sections.
fn html_document(fragments: &[String]) -> String {
    let mut out = String::new();
    for (i, fragment) in fragments.iter().enumerate() {
        out.push_str(&format!(
            "<section class=\"slide\" data-slide=\"{}\">\n{}</section>\n",
            i + 1,
            fragment
        ));
    }
    out
}

fn write_output(path: &Path, bytes: &[u8]) {
    if let Err(e) = fs::write(path, bytes) {
        eprintln!("Error writing {}: {}", path.display(), e);
        std::process::exit(1);
    }
    println!("Created {}", path.display());
}
