//! Run command

use serde_json::Value;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run a function remotely and print its JSON result
pub async fn run_function(
    ctx: &Context,
    function: &str,
    params: Option<&str>,
    dev_mode: bool,
) -> Result<()> {
    let project = ctx.project()?;
    let parameters = parse_params(params)?;

    let result = ctx
        .services
        .script
        .run_function(project.script_id(), function, parameters, dev_mode)
        .await
        .map_err(clasp_core::Error::from)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn parse_params(params: Option<&str>) -> Result<Vec<Value>> {
    let Some(raw) = params else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(values) => Ok(values),
        _ => Err(CliError::user("--params must be a JSON array")),
    }
}
