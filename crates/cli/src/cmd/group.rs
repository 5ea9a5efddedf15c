use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use monitor_common::ResourceGroup;

use super::helpers::parse_tags;
use super::{CommandOutput, Globals};
use crate::output::spinner::with_spinner;
use crate::output::{confirm, print_json, theme, OutputMode};

#[derive(Subcommand)]
pub enum GroupCmd {
    /// Create or update a resource group
    Create(CreateArgs),
    Show(GroupArgs),
    /// Delete a resource group and every alert rule in it
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct GroupArgs {
    #[arg(short, long, help = "Resource group name")]
    pub name: String,
}

#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub group: GroupArgs,
    #[arg(short, long, help = "Location (server default when omitted)")]
    pub location: Option<String>,
    #[arg(long, num_args = 0.., help = "KEY[=VALUE] tags")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub group: GroupArgs,
    #[arg(long, help = "Skip confirmation prompt")]
    pub yes: bool,
}

pub async fn execute(cmd: GroupCmd, globals: &Globals) -> Result<CommandOutput> {
    match cmd {
        GroupCmd::Create(args) => create(args, globals).await,
        GroupCmd::Show(args) => show(args, globals).await,
        GroupCmd::Delete(args) => delete(args, globals).await,
    }
}

async fn create(args: CreateArgs, globals: &Globals) -> Result<CommandOutput> {
    let client = globals.client()?;
    let name = args.group.name;
    let tags = parse_tags(&args.tags);
    let group = with_spinner(
        globals.mode,
        "Creating resource group...",
        client.put_group(&name, args.location.as_deref(), &tags),
    )
    .await
    .with_context(|| format!("creating resource group '{name}'"))?;
    Ok(CommandOutput::Group(group))
}

async fn show(args: GroupArgs, globals: &Globals) -> Result<CommandOutput> {
    let client = globals.client()?;
    let group = with_spinner(
        globals.mode,
        "Fetching resource group...",
        client.get_group(&args.name),
    )
    .await
    .with_context(|| format!("fetching resource group '{}'", args.name))?;
    Ok(CommandOutput::Group(group))
}

async fn delete(args: DeleteArgs, globals: &Globals) -> Result<CommandOutput> {
    let name = args.group.name;
    if globals.mode.is_human() && !args.yes {
        let msg = format!("Delete resource group '{name}' and all of its alert rules?");
        if !confirm::confirm_action(&msg) {
            return Ok(CommandOutput::Cancelled);
        }
    }

    let client = globals.client()?;
    let existed = with_spinner(
        globals.mode,
        "Deleting resource group...",
        client.delete_group(&name),
    )
    .await
    .with_context(|| format!("deleting resource group '{name}'"))?;

    Ok(CommandOutput::Deleted {
        kind: "Resource group",
        name,
        existed,
    })
}

pub fn render_group(group: &ResourceGroup, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => print_json(group),
        OutputMode::Human => {
            theme::print_header(&format!("Resource Group {}", group.name));
            theme::print_kv("Location", &group.location);
            theme::print_kv("ID", group.id.as_deref().unwrap_or("-"));
            for (k, v) in &group.tags {
                theme::print_kv(&format!("tag:{k}"), v);
            }
            println!();
            Ok(())
        }
    }
}
