use weft_compiler::Diagnostic;

use super::pipeline::compile_sources;
use super::source_loader::load_rule_sources;
use crate::cli::{CheckArgs, OutputFormat};

#[derive(serde::Serialize)]
struct Report<'a> {
    ok: bool,
    diagnostics: Vec<ReportEntry<'a>>,
}

#[derive(serde::Serialize)]
struct ReportEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
}

pub fn run(args: CheckArgs) -> i32 {
    let sources = match load_rule_sources(&args.source.files, args.source.expr.as_deref()) {
        Ok(sources) => sources,
        Err(msg) => {
            eprintln!("error: {msg}");
            return 1;
        }
    };

    let outcome = compile_sources(&sources);
    let failed =
        !outcome.ok || outcome.diagnostics.has_errors() || (args.strict && outcome.diagnostics.warning_count() > 0);

    match args.format {
        OutputFormat::Text => {
            for (diagnostic, origin) in outcome.diagnostics.iter().zip(&outcome.origins) {
                match origin {
                    Some(file) => eprintln!("{file}: {diagnostic}"),
                    None => eprintln!("{diagnostic}"),
                }
            }
        }
        OutputFormat::Json => {
            let report = Report {
                ok: !failed,
                diagnostics: outcome
                    .diagnostics
                    .iter()
                    .zip(&outcome.origins)
                    .map(|(diagnostic, origin)| ReportEntry {
                        file: origin.as_deref(),
                        diagnostic,
                    })
                    .collect(),
            };
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: failed to serialize report: {e}");
                    return 1;
                }
            }
        }
    }

    if failed { 1 } else { 0 }
}
