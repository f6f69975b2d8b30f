use lazyenv_bind::EnvView;
use serde::Serialize;

use crate::cmd::GetArgs;
use crate::exit::{env_error, CliError, CliResult, FAILURE, SUCCESS};
use crate::output::{print_json, print_table, value_text, OutputFormat};

#[derive(Debug, Serialize)]
struct GetOutput<'a> {
    key: &'a str,
    value: serde_json::Value,
}

pub fn run(args: GetArgs, format: OutputFormat) -> CliResult<i32> {
    let schema = args.schema.load()?;
    let env = args.schema.environment(&schema);
    let view = EnvView::with_source(schema, env);
    let value = view
        .get(&args.key)
        .map_err(|err| env_error("environment", err))?
        .ok_or_else(|| CliError::new(FAILURE, format!("{} is not set", args.key)))?;

    let output = GetOutput {
        key: &args.key,
        value,
    };
    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table => print_table(
            &["KEY", "VALUE"],
            vec![vec![output.key.to_string(), value_text(&output.value)]],
        ),
        OutputFormat::Pretty => println!("{}={}", output.key, value_text(&output.value)),
        OutputFormat::Raw => println!("{}", value_text(&output.value)),
    }
    Ok(SUCCESS)
}
