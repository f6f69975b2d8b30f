use lazyenv_bind::{EnvView, Source};
use serde::Serialize;

use crate::cmd::CheckArgs;
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Debug, Serialize)]
struct KeyStatus {
    key: String,
    set: bool,
}

#[derive(Debug, Serialize)]
struct IssueOutput {
    path: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    schema: String,
    valid: bool,
    keys: Vec<KeyStatus>,
    issues: Vec<IssueOutput>,
}

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let schema = args.schema.load()?;
    let env = args.schema.environment(&schema);
    let keys: Vec<KeyStatus> = schema
        .property_names()
        .into_iter()
        .map(|key| KeyStatus {
            set: env.get(&key).is_some(),
            key,
        })
        .collect();

    let view = EnvView::with_source(schema, env);
    let issues: Vec<IssueOutput> = view
        .error()
        .map(|failure| {
            failure
                .into_issues()
                .into_iter()
                .map(|issue| IssueOutput {
                    path: issue.path.join("."),
                    message: issue.message,
                })
                .collect()
        })
        .unwrap_or_default();

    let output = CheckOutput {
        schema: args.schema.schema.display().to_string(),
        valid: view.valid(),
        keys,
        issues,
    };
    tracing::debug!(valid = output.valid, issues = output.issues.len(), "environment checked");

    print_check(&output, format);
    Ok(if output.valid { SUCCESS } else { DATA_INVALID })
}

// Values are never printed: they may be secrets.
fn print_check(output: &CheckOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            let rows = output
                .keys
                .iter()
                .map(|status| {
                    vec![
                        status.key.clone(),
                        if status.set { "set" } else { "unset" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["KEY", "STATUS"], rows);
            print_issues(output);
        }
        OutputFormat::Pretty => {
            println!("lazyenv check {}\n", output.schema);
            for status in &output.keys {
                println!(
                    "  {:<24} {}",
                    status.key,
                    if status.set { "set" } else { "unset" }
                );
            }
            print_issues(output);
        }
        OutputFormat::Raw => println!("{}", if output.valid { "valid" } else { "invalid" }),
    }
}

fn print_issues(output: &CheckOutput) {
    if output.valid {
        println!("\n  Result: environment is valid");
        return;
    }
    println!("\n  Result: environment is invalid");
    for issue in &output.issues {
        if issue.path.is_empty() {
            println!("    - {}", issue.message);
        } else {
            println!("    - {}: {}", issue.path, issue.message);
        }
    }
}
