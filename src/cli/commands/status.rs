//! Endpoint status command.

use console::style;

use crate::config::Settings;
use crate::session::{select_repository, SessionBuilder};

/// Show the repositories advertised by the configured endpoint.
pub async fn cmd_status(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let builder = SessionBuilder::new(settings.clone());
    let repositories = builder.repository_infos().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&repositories)?);
        return Ok(());
    }

    if repositories.is_empty() {
        println!(
            "{} The endpoint advertises no repositories",
            style("!").yellow()
        );
        return Ok(());
    }

    let selected = select_repository(builder.preferred_repository(), &repositories)
        .map(|info| info.id.clone())
        .ok();

    println!(
        "{}",
        style(format!("Repositories ({})", repositories.len())).bold()
    );
    for info in &repositories {
        let marker = if selected.as_deref() == Some(info.id.as_str()) {
            style("*").green().to_string()
        } else {
            " ".to_string()
        };
        println!("{} {}  {}", marker, style(&info.id).cyan(), info.name);
        if let Some(description) = info.description.as_deref().filter(|d| !d.is_empty()) {
            println!("     {}", style(description).dim());
        }
        let product = match (info.vendor.as_deref(), info.product.as_deref()) {
            (Some(vendor), Some(product)) => format!("{} {}", vendor, product),
            (Some(vendor), None) => vendor.to_string(),
            (None, Some(product)) => product.to_string(),
            (None, None) => String::new(),
        };
        if !product.is_empty() {
            println!("     {}", style(product).dim());
        }
        println!("     root folder: {}", style(&info.root_folder_id).dim());
    }

    if selected.is_none() {
        if let Some(preferred) = builder.preferred_repository() {
            println!(
                "\n{} Configured repository {} was not found",
                style("!").yellow(),
                preferred
            );
        }
    }

    Ok(())
}
