use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::Parser;

use typeref_common::manifest::{self, ManifestError, TyperefManifest};
use typeref_core::docs::{self, DocError, Qualifier, Signature};
use typeref_core::{parse_type, render, ParseError, SymbolTable};

/// Type annotation cross-reference tool.
#[derive(Parser)]
#[command(
    name = "typeref",
    version,
    about,
    long_about = "Type annotation cross-reference tool.\n\nParses textual type annotations and renders them as reStructuredText\ncross-references, using roles declared in Typeref.toml.\n\nExamples:\n  typeref parse 'dict[str, list[int | None]]'          Show the parsed tree\n  typeref parse 'Tuple[int, ...]' --json               Show the tree as JSON\n  typeref render 'Mapping[str, Path]'                  Print the cross-reference\n  typeref render 'Vector' --qualify                    Use fully qualified alias names\n  typeref doc signature.json                           Print docstring field lines"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Parse an annotation and print its structure
    Parse {
        /// The type annotation text
        annotation: String,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render an annotation as a cross-reference
    Render {
        /// The type annotation text
        annotation: String,

        /// Path to Typeref.toml (default: search upwards from the current directory)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Rewrite references to aliases with their fully qualified names
        #[arg(short, long)]
        qualify: bool,
    },

    /// Print docstring field lines for a signature described in JSON
    Doc {
        /// Path to the signature JSON file
        signature: PathBuf,

        /// Path to Typeref.toml (default: search upwards from the current directory)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Rewrite references to aliases with their fully qualified names
        #[arg(short, long)]
        qualify: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Parse { annotation, json } => {
            let parsed = match parse_type(&annotation) {
                Ok(t) => t,
                Err(e) => {
                    print_parse_error(&e);
                    process::exit(1);
                }
            };
            if json {
                match serde_json::to_string_pretty(&parsed) {
                    Ok(j) => println!("{}", j),
                    Err(e) => {
                        eprintln!("error: failed to serialize type: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                println!("{}", parsed.pretty());
            }
        }

        Command::Render {
            annotation,
            manifest,
            qualify,
        } => {
            let manifest = load_manifest_or_exit(manifest.as_deref());
            let symbols = symbols_for(manifest.as_ref());
            let parsed = match parse_type(&annotation) {
                Ok(t) => t,
                Err(e) => {
                    print_parse_error(&e);
                    process::exit(1);
                }
            };
            let mut lines = match render(&parsed, &symbols) {
                Ok(xref) => vec![xref],
                Err(e) => {
                    eprintln!("error: {}", e);
                    process::exit(1);
                }
            };
            if qualify {
                qualifier_or_exit(manifest.as_ref()).qualify_lines(&mut lines);
            }
            for line in lines {
                println!("{}", line);
            }
        }

        Command::Doc {
            signature,
            manifest,
            qualify,
        } => {
            let manifest = load_manifest_or_exit(manifest.as_deref());
            let symbols = symbols_for(manifest.as_ref());
            let json = match fs::read_to_string(&signature) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("error: could not read '{}': {}", signature.display(), e);
                    process::exit(1);
                }
            };
            let sig = match Signature::from_json(&json) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("error: invalid signature '{}': {}", signature.display(), e);
                    process::exit(1);
                }
            };
            let mut lines = Vec::new();
            if let Err(e) = docs::document_signature(&sig, &symbols, &mut lines) {
                print_doc_error(&e);
                process::exit(1);
            }
            if qualify {
                qualifier_or_exit(manifest.as_ref()).qualify_lines(&mut lines);
            }
            for line in lines {
                println!("{}", line);
            }
        }
    }
}

/// Load the manifest from an explicit path, or search upwards from the current
/// directory. A missing manifest is only an error when a path was given.
fn load_manifest_or_exit(path: Option<&Path>) -> Option<TyperefManifest> {
    let result = match path {
        Some(path) => manifest::load_manifest(path),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            manifest::find_and_load_manifest(&cwd)
        }
    };
    match result {
        Ok(m) => Some(m),
        Err(ManifestError::NotFound(_)) => None,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn symbols_for(manifest: Option<&TyperefManifest>) -> SymbolTable {
    manifest.map(SymbolTable::from_manifest).unwrap_or_default()
}

fn qualifier_or_exit(manifest: Option<&TyperefManifest>) -> Qualifier {
    let result = match manifest {
        Some(m) => Qualifier::from_manifest(m),
        None => Qualifier::new(Vec::<(String, String)>::new()),
    };
    match result {
        Ok(q) => q,
        Err(e) => {
            eprintln!("error: invalid alias pattern: {}", e);
            process::exit(1);
        }
    }
}

fn print_doc_error(err: &DocError) {
    let source = match err {
        DocError::Param { source, .. }
        | DocError::Return(source)
        | DocError::Attribute(source) => source,
    };
    eprintln!("error: {}", err);
    if let typeref_core::Error::Parse(e) = source {
        print_parse_error(e);
    }
}

fn print_parse_error(err: &ParseError) {
    let diag = err.to_diagnostic();
    let source = err.annotation.as_str();
    let name = "<annotation>";

    let Some(span) = diag.span else {
        eprintln!("error: {}", diag.message);
        return;
    };
    // Zero-width spans still need one column to point at.
    let start = span.start.min(source.len());
    let end = span.stop.max(start + 1);

    let mut report = Report::build(ReportKind::Error, name, start)
        .with_message(&diag.message)
        .with_label(
            Label::new((name, start..end))
                .with_message(&diag.message)
                .with_color(Color::Red),
        );

    for related in &diag.related {
        let rs = related.span.start;
        let re = related.span.stop.max(rs + 1);
        report = report.with_label(
            Label::new((name, rs..re))
                .with_message(&related.message)
                .with_color(Color::Blue),
        );
    }

    if let Some(ref help) = diag.help {
        report = report.with_help(help);
    }

    if report.finish().eprint((name, Source::from(source))).is_err() {
        eprintln!("{}", diag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_flags_parse() {
        let args = ["typeref", "render", "list[int]", "-m", "Typeref.toml", "-q"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Render {
                annotation,
                manifest,
                qualify,
            } => {
                assert_eq!(annotation, "list[int]");
                assert_eq!(manifest, Some(PathBuf::from("Typeref.toml")));
                assert!(qualify);
            }
            _ => panic!("expected render subcommand"),
        }
    }
}
