use super::pipeline::compile_sources;
use super::source_loader::load_rule_sources;
use crate::cli::DumpArgs;

pub fn run(args: DumpArgs) -> i32 {
    let sources = match load_rule_sources(&args.source.files, args.source.expr.as_deref()) {
        Ok(sources) => sources,
        Err(msg) => {
            eprintln!("error: {msg}");
            return 1;
        }
    };

    let outcome = compile_sources(&sources);
    if !outcome.ok || outcome.diagnostics.has_errors() {
        for diagnostic in outcome.diagnostics.iter() {
            eprintln!("{diagnostic}");
        }
        return 1;
    }
    // Warnings still dump, but go to stderr.
    for diagnostic in outcome.diagnostics.iter() {
        eprintln!("{diagnostic}");
    }

    println!("# lexer");
    print!("{}", outcome.lexer);
    println!("# matcher");
    print!("{}", outcome.matcher);
    0
}
