//! Settings command

use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

/// Print all settings, print one key, or update one key
pub fn run_settings(ctx: &Context, key: Option<&str>, value: Option<&str>) -> Result<()> {
    let mut project = ctx.project()?;

    match (key, value) {
        (None, _) => {
            println!("{}", serde_json::to_string_pretty(&project.settings)?);
        }
        (Some(key), None) => match project.settings.get(key)? {
            Some(value) => println!("{}", value),
            None => println!("{}", "(not set)".dimmed()),
        },
        (Some(key), Some(value)) => {
            project.settings.set(key, value)?;
            project.save()?;
            println!("{} {} = {}", "Updated".green(), key, value);
        }
    }
    Ok(())
}
