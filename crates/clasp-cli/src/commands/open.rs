//! Open command

use crate::context::Context;
use crate::error::Result;

const EDITOR_URL: &str = "https://script.google.com/d";

/// Print the script editor URL for the current project
pub fn run_open(ctx: &Context) -> Result<()> {
    let project = ctx.project()?;
    println!("{}", editor_url(project.script_id()));
    Ok(())
}

fn editor_url(script_id: &str) -> String {
    format!("{}/{}/edit", EDITOR_URL, script_id)
}
