//! Filter label management. These calls need no catalog or mapping store.

use clap::Subcommand;
use tvsync_client::{ApiResponse, TilesViewClient};
use tvsync_core::AppConfig;

#[derive(Debug, Subcommand)]
pub enum FiltersCommands {
    /// Register a filter label with its allowed values
    Add {
        label: String,
        values: Vec<String>,
    },
    /// List all filter labels
    List,
    /// Look up one filter label by name
    Get { name: String },
}

pub(crate) async fn run_filters(config: &AppConfig, command: FiltersCommands) -> anyhow::Result<()> {
    let client = TilesViewClient::from_config(config)?;
    let response = match command {
        FiltersCommands::Add { label, values } => client.add_filter(&label, &values).await?,
        FiltersCommands::List => client.list_filters().await?,
        FiltersCommands::Get { name } => client.find_filter(&name).await?,
    };
    print_body(&response)
}

fn print_body(response: &ApiResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    Ok(())
}
