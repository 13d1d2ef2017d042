use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// One named rule source fragment.
pub struct RuleSource {
    pub name: String,
    pub text: String,
}

/// Resolve the command-line inputs into named source fragments, in load
/// order. `-e` text wins over positionals; a `-` positional reads stdin.
pub fn load_rule_sources(files: &[PathBuf], expr: Option<&str>) -> Result<Vec<RuleSource>, String> {
    if let Some(text) = expr {
        return Ok(vec![RuleSource {
            name: "<expr>".to_string(),
            text: text.to_string(),
        }]);
    }

    if files.is_empty() {
        return Err("rule source is required: pass one or more files, or -e/--expr".to_string());
    }

    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        if path.as_os_str() == "-" {
            sources.push(load_stdin()?);
            continue;
        }
        let text = fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
        sources.push(RuleSource {
            name: path.display().to_string(),
            text,
        });
    }
    Ok(sources)
}

fn load_stdin() -> Result<RuleSource, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(RuleSource {
        name: "<stdin>".to_string(),
        text: buf,
    })
}
