use std::fmt::Write;
use std::sync::Arc;

use super::server_metrics::ServerMetrics;

pub fn render_prometheus(m: &Arc<ServerMetrics>) -> String {
    let mut out = String::with_capacity(1024);

    write_counter(&mut out, "monitor_server_rest_requests_total", m.rest_requests_total());
    write_counter(&mut out, "monitor_server_rest_errors_total", m.rest_errors_total());
    write_counter(&mut out, "monitor_server_alert_rules_created_total", m.rules_created_total());
    write_counter(&mut out, "monitor_server_alert_rules_updated_total", m.rules_updated_total());
    write_counter(&mut out, "monitor_server_alert_rules_deleted_total", m.rules_deleted_total());
    write_counter(&mut out, "monitor_server_resource_groups_created_total", m.groups_created_total());
    write_counter(&mut out, "monitor_server_resource_groups_deleted_total", m.groups_deleted_total());

    let (sum, count) = m.rest_latency_vals();
    write_summary(&mut out, "monitor_server_rest_latency_us", sum, count);

    out
}

fn write_counter(out: &mut String, name: &str, val: u64) {
    let _ = writeln!(out, "# TYPE {name} counter");
    let _ = writeln!(out, "{name} {val}");
}

fn write_summary(out: &mut String, name: &str, sum: u64, count: u64) {
    let _ = writeln!(out, "# TYPE {name} summary");
    let _ = writeln!(out, "{name}_sum {sum}");
    let _ = writeln!(out, "{name}_count {count}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prometheus_output() {
        let m = ServerMetrics::new();
        m.inc_rest_requests();
        m.inc_rules_created();
        let output = render_prometheus(&m);
        assert!(output.contains("monitor_server_rest_requests_total 1"));
        assert!(output.contains("monitor_server_alert_rules_created_total 1"));
        assert!(output.contains("monitor_server_alert_rules_deleted_total 0"));
        assert!(output.contains("# TYPE monitor_server_rest_latency_us summary"));
    }
}
