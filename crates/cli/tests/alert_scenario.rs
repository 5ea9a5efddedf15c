//! End-to-end run of the alert commands against an in-process API server.

use clap::Parser;
use monitor_cli::cmd::{self, CommandOutput};
use monitor_cli::Opts;
use monitor_common::inspect::{check_emails, check_webhooks};
use monitor_common::{AlertRuleResource, ConditionOperator, TimeAggregation};
use monitor_server::config::ServerConfig;
use monitor_server::rest::AppState;
use std::path::PathBuf;
use tempfile::TempDir;

const SUB: &str = "00000000-0000-0000-0000-000000000000";
const WEBHOOK1: &str = "https://alert.contoso.com?apiKey=value";
const WEBHOOK2: &str = "https://contoso.com/alerts";

struct Harness {
    _dir: TempDir,
    config: PathBuf,
    group: String,
}

impl Harness {
    async fn start(group: &str) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = AppState::new(&ServerConfig::default());
        tokio::spawn(monitor_server::serve(listener, state, std::future::pending()));

        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.yml");
        std::fs::write(
            &config,
            format!("endpoint: http://{addr}\nsubscription_id: {SUB}\ntimeout_seconds: 10\n"),
        )
        .unwrap();

        let harness = Self {
            _dir: dir,
            config,
            group: group.to_string(),
        };
        harness
            .run(&["group", "create", "-n", group, "-l", "westus"])
            .await
            .unwrap();
        harness
    }

    async fn run(&self, args: &[&str]) -> anyhow::Result<CommandOutput> {
        let config = self.config.to_str().unwrap();
        let mut full = vec!["monitor", "--json", "--config", config];
        full.extend_from_slice(args);
        let opts = Opts::try_parse_from(full)?;
        cmd::dispatch(opts).await
    }

    async fn rule(&self, args: &[&str]) -> AlertRuleResource {
        let out = self.run(args).await.unwrap();
        out.rule().cloned().expect("command should return a rule")
    }

    fn vm_id(&self) -> String {
        format!(
            "/subscriptions/{SUB}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachines/vm1",
            self.group
        )
    }
}

#[tokio::test]
async fn metric_alert_basic_scenario() {
    let h = Harness::start("cli_test_monitor").await;
    let rg = h.group.as_str();
    let vm_id = h.vm_id();

    let rule1 = h
        .rule(&[
            "alert", "create", "-g", rg, "-n", "rule1", "--target", &vm_id,
            "--condition", "Percentage CPU > 90 avg 5m",
        ])
        .await;
    check_emails(&rule1.actions, Some(&[]), Some(false)).unwrap();
    assert_eq!(rule1.alert_rule_resource_name, "rule1");
    let c = rule1.threshold_condition();
    assert_eq!(c.data_source.metric_name(), "Percentage CPU");
    assert_eq!(c.data_source.resource_uri(), vm_id);
    assert_eq!(c.threshold, 90.0);
    assert_eq!(c.time_aggregation, TimeAggregation::Average);
    assert_eq!(c.window_size.to_string(), "0:05:00");
    assert_eq!(rule1.location, "westus");

    let rule2 = h
        .rule(&[
            "alert", "create", "-g", rg, "-n", "rule2", "--target", "vm1",
            "--target-namespace", "Microsoft.Compute", "--target-type", "virtualMachines",
            "--disabled", "--condition", "Percentage CPU >= 60 avg 1h",
            "--description", "Test Rule 2",
            "-a", "email", "test1@contoso.com", "test2@contoso.com", "test3@contoso.com",
        ])
        .await;
    let email = rule2.email_action().unwrap();
    assert_eq!(email.custom_emails.len(), 3);
    assert!(!email.send_to_service_owners);
    assert_eq!(rule2.alert_rule_resource_name, "rule2");
    let c = rule2.threshold_condition();
    assert_eq!(c.data_source.metric_name(), "Percentage CPU");
    assert_eq!(c.data_source.resource_uri(), vm_id);
    assert_eq!(c.threshold, 60.0);
    assert_eq!(c.time_aggregation, TimeAggregation::Average);
    assert_eq!(c.window_size.to_string(), "1:00:00");
    assert!(!rule2.is_enabled);
    assert_eq!(rule2.description.as_deref(), Some("Test Rule 2"));

    let rule3 = h
        .rule(&[
            "alert", "create", "-g", rg, "-n", "rule3", "--target", &vm_id,
            "--condition", "Percentage CPU >= 99 avg 5m",
            "--action", "webhook", WEBHOOK1, "--action", "webhook", WEBHOOK2, "apiKey=value",
        ])
        .await;
    assert_eq!(rule3.alert_rule_resource_name, "rule3");
    let c = rule3.threshold_condition();
    assert_eq!(c.data_source.metric_name(), "Percentage CPU");
    assert_eq!(c.data_source.resource_uri(), vm_id);
    assert_eq!(c.operator, ConditionOperator::GreaterThanOrEqual);
    assert_eq!(c.threshold, 99.0);
    assert_eq!(c.time_aggregation, TimeAggregation::Average);
    assert_eq!(c.window_size.to_string(), "0:05:00");
    assert!(rule3.is_enabled);
    assert_eq!(rule3.description.as_deref(), Some("Percentage CPU >= 99 avg 5m"));
    check_webhooks(&rule3.actions, Some(&[WEBHOOK1, WEBHOOK2])).unwrap();

    let shown = h.rule(&["alert", "show", "-g", rg, "-n", "rule1"]).await;
    assert_eq!(shown.alert_rule_resource_name, "rule1");

    h.run(&["alert", "delete", "-g", rg, "-n", "rule2"]).await.unwrap();
    h.run(&["alert", "delete", "-g", rg, "-n", "rule3"]).await.unwrap();
    let listed = h.run(&["alert", "list", "-g", rg]).await.unwrap();
    assert_eq!(listed.rules().map(<[_]>::len), Some(1));

    let result = h
        .rule(&[
            "alert", "update", "-g", rg, "-n", "rule1", "-a", "email", "test1@contoso.com",
            "-a", "webhook", WEBHOOK1, "--operator", ">=", "--threshold", "85",
        ])
        .await;
    let c = result.threshold_condition();
    assert_eq!(c.operator, ConditionOperator::GreaterThanOrEqual);
    assert_eq!(c.threshold, 85.0);
    check_emails(&result.actions, Some(&["test1@contoso.com"]), None).unwrap();
    check_webhooks(&result.actions, Some(&[WEBHOOK1])).unwrap();

    let result = h
        .rule(&[
            "alert", "update", "-g", rg, "-n", "rule1", "-r", "email", "test1@contoso.com",
            "-a", "email", "test2@contoso.com", "-a", "email", "test3@contoso.com",
        ])
        .await;
    check_emails(
        &result.actions,
        Some(&["test2@contoso.com", "test3@contoso.com"]),
        None,
    )
    .unwrap();

    let result = h
        .rule(&["alert", "update", "-g", rg, "-n", "rule1", "--email-service-owners"])
        .await;
    check_emails(&result.actions, None, Some(true)).unwrap();

    let result = h
        .rule(&[
            "alert", "update", "-g", rg, "-n", "rule1", "--email-service-owners", "False",
            "--remove-action", "webhook", WEBHOOK1, "--add-action", "webhook", WEBHOOK2,
        ])
        .await;
    check_emails(&result.actions, None, Some(false)).unwrap();
    check_webhooks(&result.actions, Some(&[WEBHOOK2])).unwrap();

    let out = h.run(&["group", "delete", "-n", rg, "--yes"]).await.unwrap();
    assert!(matches!(out, CommandOutput::Deleted { existed: true, .. }));
}

#[tokio::test]
async fn unknown_rule_reports_not_found() {
    let h = Harness::start("rg_missing").await;
    let err = h
        .run(&["alert", "show", "-g", &h.group, "-n", "nope"])
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("ResourceNotFound"));
}

#[tokio::test]
async fn bad_condition_is_rejected_before_any_request() {
    let h = Harness::start("rg_bad_condition").await;
    let err = h
        .run(&[
            "alert", "create", "-g", &h.group, "-n", "r", "--target", "/subscriptions/s/x",
            "--condition", "Percentage CPU ~ 90 avg 5m",
        ])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("METRIC"));

    let listed = h.run(&["alert", "list", "-g", &h.group]).await.unwrap();
    assert_eq!(listed.rules().map(<[_]>::len), Some(0));
}

#[tokio::test]
async fn name_target_requires_namespace_and_type() {
    let h = Harness::start("rg_target").await;
    let err = h
        .run(&[
            "alert", "create", "-g", &h.group, "-n", "r", "--target", "vm1",
            "--condition", "Percentage CPU > 90 avg 5m",
        ])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("--target-namespace"));
}

#[tokio::test]
async fn deleting_group_removes_its_rules() {
    let h = Harness::start("rg_cascade").await;
    let rg = h.group.clone();
    h.rule(&[
        "alert", "create", "-g", &rg, "-n", "r1", "--target", "/subscriptions/s/x",
        "--condition", "Percentage CPU > 90 avg 5m",
    ])
    .await;

    h.run(&["group", "delete", "-n", &rg, "--yes"]).await.unwrap();
    let err = h.run(&["alert", "list", "-g", &rg]).await.unwrap_err();
    assert!(format!("{err:#}").contains("ResourceGroupNotFound"));

    h.run(&["group", "create", "-n", &rg]).await.unwrap();
    let listed = h.run(&["alert", "list", "-g", &rg]).await.unwrap();
    assert_eq!(listed.rules().map(<[_]>::len), Some(0));
}
