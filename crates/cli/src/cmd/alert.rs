use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Subcommand};
use comfy_table::Cell;
use monitor_common::action::{build_actions, parse_action_args, parse_action_removals};
use monitor_common::model::ThresholdRuleCondition;
use monitor_common::resource_id::resolve_target;
use monitor_common::{
    AlertRuleResource, ConditionOperator, ConditionSpec, RuleUpdate, TimeAggregation, WindowSize,
};

use super::helpers::parse_tags;
use super::{CommandOutput, Globals};
use crate::output::spinner::with_spinner;
use crate::output::{build_table, confirm, enabled_cell, print_json, theme, OutputMode};

#[derive(Subcommand)]
pub enum AlertCmd {
    /// Create a metric alert rule
    Create(CreateArgs),
    /// Show one alert rule
    Show(RuleArgs),
    /// Update an alert rule in place
    Update(UpdateArgs),
    /// Delete an alert rule
    Delete(DeleteArgs),
    /// List the alert rules of a resource group
    List(ListArgs),
}

#[derive(Args)]
pub struct RuleArgs {
    #[arg(short = 'g', long = "resource-group", help = "Resource group name")]
    pub resource_group: String,
    #[arg(short, long, help = "Alert rule name")]
    pub name: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short = 'g', long = "resource-group", help = "Resource group name")]
    pub resource_group: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub rule: RuleArgs,
    #[arg(long, help = "Skip confirmation prompt")]
    pub yes: bool,
}

#[derive(Args, Default)]
pub struct TargetArgs {
    #[arg(long = "target-namespace", requires = "target", help = "Namespace of the target when --target is a name")]
    pub namespace: Option<String>,
    #[arg(long = "target-type", requires = "target", help = "Resource type of the target when --target is a name")]
    pub resource_type: Option<String>,
    #[arg(long = "target-parent", requires = "target", help = "Parent path of the target, e.g. servers/sql1")]
    pub parent: Option<String>,
}

#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub rule: RuleArgs,
    #[arg(long, help = "Resource id or name of the monitored resource")]
    pub target: String,
    #[command(flatten)]
    pub target_args: TargetArgs,
    #[arg(
        long,
        num_args = 1..,
        required = true,
        help = "METRIC {>,>=,<,<=} THRESHOLD {avg,min,max,total,last} PERIOD"
    )]
    pub condition: Vec<String>,
    #[arg(long, help = "Create the rule disabled")]
    pub disabled: bool,
    #[arg(long, help = "Free-text description (defaults to the condition)")]
    pub description: Option<String>,
    #[arg(short, long, help = "Location (defaults to the resource group's)")]
    pub location: Option<String>,
    #[arg(
        long = "email-service-owners",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        help = "Email the service owners when the rule fires"
    )]
    pub email_service_owners: Option<bool>,
    #[arg(
        short = 'a',
        long = "action",
        num_args = 1..,
        action = ArgAction::Append,
        help = "email ADDR... | webhook URI [KEY=VALUE...]"
    )]
    pub actions: Vec<String>,
    #[arg(long, num_args = 0.., help = "KEY[=VALUE] tags")]
    pub tags: Option<Vec<String>>,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub rule: RuleArgs,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub enabled: Option<bool>,
    #[arg(long, num_args = 1.., help = "Replace the whole condition")]
    pub condition: Option<Vec<String>>,
    #[arg(long, help = "Metric name")]
    pub metric: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "One of >, >=, <, <=")]
    pub operator: Option<ConditionOperator>,
    #[arg(long, allow_hyphen_values = true)]
    pub threshold: Option<f64>,
    #[arg(long, help = "One of avg, min, max, total, last")]
    pub aggregation: Option<TimeAggregation>,
    #[arg(long, help = "Evaluation window, e.g. 5m, 1h, PT15M")]
    pub period: Option<WindowSize>,
    #[arg(long, help = "Resource id or name of the monitored resource")]
    pub target: Option<String>,
    #[command(flatten)]
    pub target_args: TargetArgs,
    #[arg(
        long = "email-service-owners",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub email_service_owners: Option<bool>,
    #[arg(
        short = 'a',
        long = "add-action",
        num_args = 1..,
        action = ArgAction::Append,
        help = "email ADDR... | webhook URI [KEY=VALUE...]"
    )]
    pub add_actions: Vec<String>,
    #[arg(
        short = 'r',
        long = "remove-action",
        num_args = 1..,
        action = ArgAction::Append,
        help = "email ADDR... | webhook URI..."
    )]
    pub remove_actions: Vec<String>,
    #[arg(long, num_args = 0.., help = "KEY[=VALUE] tags; replaces existing tags")]
    pub tags: Option<Vec<String>>,
}

pub async fn execute(cmd: AlertCmd, globals: &Globals) -> Result<CommandOutput> {
    match cmd {
        AlertCmd::Create(args) => create(args, globals).await,
        AlertCmd::Show(args) => show(args, globals).await,
        AlertCmd::Update(args) => update(args, globals).await,
        AlertCmd::Delete(args) => delete(args, globals).await,
        AlertCmd::List(args) => list(args, globals).await,
    }
}

async fn create(args: CreateArgs, globals: &Globals) -> Result<CommandOutput> {
    let condition_text = args.condition.join(" ");
    let spec: ConditionSpec = condition_text.parse()?;
    let actions = parse_action_args(&args.actions)?;

    let client = globals.client()?;
    let RuleArgs {
        resource_group,
        name,
    } = args.rule;

    let target_uri = resolve_target(
        &args.target,
        args.target_args.namespace.as_deref(),
        args.target_args.resource_type.as_deref(),
        args.target_args.parent.as_deref(),
        client.subscription(),
        &resource_group,
    )?;

    let location = match args.location {
        Some(location) => location,
        None => {
            with_spinner(globals.mode, "Resolving resource group...", client.get_group(&resource_group))
                .await
                .with_context(|| format!("looking up resource group '{resource_group}'"))?
                .location
        }
    };

    let mut rule = AlertRuleResource::new(
        name.clone(),
        location,
        spec.into_condition(target_uri),
        build_actions(&actions, args.email_service_owners.unwrap_or(false)),
    );
    rule.description = Some(args.description.unwrap_or(condition_text));
    rule.is_enabled = !args.disabled;
    rule.tags = args.tags.as_deref().map(parse_tags).unwrap_or_default();

    let created = with_spinner(
        globals.mode,
        "Creating alert rule...",
        client.put_rule(&resource_group, &name, &rule),
    )
    .await
    .with_context(|| format!("creating alert rule '{name}'"))?;

    tracing::info!(rule = %name, group = %resource_group, "alert rule created");
    Ok(CommandOutput::Rule(created))
}

async fn show(args: RuleArgs, globals: &Globals) -> Result<CommandOutput> {
    let client = globals.client()?;
    let rule = with_spinner(
        globals.mode,
        "Fetching alert rule...",
        client.get_rule(&args.resource_group, &args.name),
    )
    .await
    .with_context(|| format!("fetching alert rule '{}'", args.name))?;
    Ok(CommandOutput::Rule(rule))
}

async fn list(args: ListArgs, globals: &Globals) -> Result<CommandOutput> {
    let client = globals.client()?;
    let rules = with_spinner(
        globals.mode,
        "Fetching alert rules...",
        client.list_rules(&args.resource_group),
    )
    .await
    .with_context(|| format!("listing alert rules in '{}'", args.resource_group))?;
    Ok(CommandOutput::Rules(rules))
}

async fn update(args: UpdateArgs, globals: &Globals) -> Result<CommandOutput> {
    let condition = args
        .condition
        .map(|tokens| tokens.join(" ").parse::<ConditionSpec>())
        .transpose()?;
    let add_actions = parse_action_args(&args.add_actions)?;
    let remove_actions = parse_action_removals(&args.remove_actions)?;

    let client = globals.client()?;
    let RuleArgs {
        resource_group,
        name,
    } = args.rule;

    let target = args
        .target
        .map(|target| {
            resolve_target(
                &target,
                args.target_args.namespace.as_deref(),
                args.target_args.resource_type.as_deref(),
                args.target_args.parent.as_deref(),
                client.subscription(),
                &resource_group,
            )
        })
        .transpose()?;

    let mut rule = with_spinner(
        globals.mode,
        "Fetching alert rule...",
        client.get_rule(&resource_group, &name),
    )
    .await
    .with_context(|| format!("fetching alert rule '{name}'"))?;

    RuleUpdate {
        description: args.description,
        enabled: args.enabled,
        tags: args.tags.as_deref().map(parse_tags),
        condition,
        metric: args.metric,
        operator: args.operator,
        threshold: args.threshold,
        aggregation: args.aggregation,
        period: args.period,
        target,
        email_service_owners: args.email_service_owners,
        add_actions,
        remove_actions,
    }
    .apply(&mut rule);

    let updated = with_spinner(
        globals.mode,
        "Updating alert rule...",
        client.put_rule(&resource_group, &name, &rule),
    )
    .await
    .with_context(|| format!("updating alert rule '{name}'"))?;

    tracing::info!(rule = %name, group = %resource_group, "alert rule updated");
    Ok(CommandOutput::Rule(updated))
}

async fn delete(args: DeleteArgs, globals: &Globals) -> Result<CommandOutput> {
    let RuleArgs {
        resource_group,
        name,
    } = args.rule;

    if globals.mode.is_human() && !args.yes {
        let msg = format!("Delete alert rule '{name}' in '{resource_group}'?");
        if !confirm::confirm_action(&msg) {
            return Ok(CommandOutput::Cancelled);
        }
    }

    let client = globals.client()?;
    let existed = with_spinner(
        globals.mode,
        "Deleting alert rule...",
        client.delete_rule(&resource_group, &name),
    )
    .await
    .with_context(|| format!("deleting alert rule '{name}'"))?;

    Ok(CommandOutput::Deleted {
        kind: "Alert rule",
        name,
        existed,
    })
}

pub fn condition_summary(condition: &ThresholdRuleCondition) -> String {
    format!(
        "{} {} {} {} {}",
        condition.data_source.metric_name(),
        condition.operator,
        condition.threshold,
        condition.time_aggregation,
        condition.window_size
    )
}

fn target_short(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

pub fn render_rule(rule: &AlertRuleResource, mode: OutputMode) -> Result<()> {
    if mode == OutputMode::Json {
        return print_json(rule);
    }

    let name = rule.name.as_deref().unwrap_or(&rule.alert_rule_resource_name);
    theme::print_header(&format!("Alert Rule {name}"));
    theme::print_kv_colored(
        "Status",
        if rule.is_enabled { "enabled" } else { "disabled" },
        rule.is_enabled,
    );
    theme::print_kv("Description", rule.description.as_deref().unwrap_or("-"));
    theme::print_kv("Location", &rule.location);
    if let Some(updated) = rule.last_updated_time {
        theme::print_kv("Last updated", &updated.to_rfc3339());
    }

    let condition = rule.threshold_condition();
    theme::print_section("Condition");
    theme::print_kv("Expression", &condition_summary(condition));
    theme::print_kv("Target", condition.data_source.resource_uri());

    theme::print_section("Actions");
    if let Some(email) = rule.email_action() {
        theme::print_kv_colored(
            "Service owners",
            &email.send_to_service_owners.to_string(),
            email.send_to_service_owners,
        );
        let emails = if email.custom_emails.is_empty() {
            "-".to_string()
        } else {
            email.custom_emails.join(", ")
        };
        theme::print_kv("Emails", &emails);
    }
    for hook in rule.webhook_actions() {
        theme::print_kv("Webhook", &hook.service_uri);
    }

    if !rule.tags.is_empty() {
        theme::print_section("Tags");
        for (k, v) in &rule.tags {
            theme::print_kv(k, v);
        }
    }
    println!();
    Ok(())
}

pub fn render_rules(rules: &[AlertRuleResource], mode: OutputMode) -> Result<()> {
    if mode == OutputMode::Json {
        return print_json(&rules);
    }

    if rules.is_empty() {
        theme::print_dim("No alert rules defined");
        return Ok(());
    }

    theme::print_header("Alert Rules");
    let mut table = build_table(&["Name", "Status", "Condition", "Target", "Actions"]);
    for rule in rules {
        let condition = rule.threshold_condition();
        table.add_row(vec![
            Cell::new(rule.name.as_deref().unwrap_or(&rule.alert_rule_resource_name)),
            enabled_cell(rule.is_enabled),
            Cell::new(condition_summary(condition)),
            Cell::new(target_short(condition.data_source.resource_uri())),
            Cell::new(rule.actions.len()),
        ]);
    }
    println!("{table}");
    Ok(())
}
