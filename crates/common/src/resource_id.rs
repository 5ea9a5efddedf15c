use std::fmt;

pub const INSIGHTS_NAMESPACE: &str = "microsoft.insights";
pub const ALERT_RULES_TYPE: &str = "alertrules";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("--target-namespace and --target-type are required when --target is a resource name")]
    MissingNamespaceOrType,
    #[error("target must not be empty")]
    Empty,
}

/// Fully-qualified identifier of a resource inside a resource group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    pub subscription: String,
    pub resource_group: String,
    pub namespace: String,
    pub parent: Option<String>,
    pub resource_type: String,
    pub name: String,
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}/",
            self.subscription, self.resource_group, self.namespace
        )?;
        if let Some(parent) = &self.parent {
            write!(f, "{}/", parent.trim_matches('/'))?;
        }
        write!(f, "{}/{}", self.resource_type, self.name)
    }
}

pub fn is_resource_id(value: &str) -> bool {
    value
        .get(..15)
        .is_some_and(|p| p.eq_ignore_ascii_case("/subscriptions/"))
}

pub fn resource_group_id(subscription: &str, resource_group: &str) -> String {
    format!("/subscriptions/{subscription}/resourceGroups/{resource_group}")
}

pub fn alert_rule_id(subscription: &str, resource_group: &str, name: &str) -> String {
    ResourceId {
        subscription: subscription.to_string(),
        resource_group: resource_group.to_string(),
        namespace: INSIGHTS_NAMESPACE.to_string(),
        parent: None,
        resource_type: ALERT_RULES_TYPE.to_string(),
        name: name.to_string(),
    }
    .to_string()
}

/// `--target` given as a full id is used as-is; a bare name is expanded
/// inside the rule's own resource group.
pub fn resolve_target(
    target: &str,
    namespace: Option<&str>,
    resource_type: Option<&str>,
    parent: Option<&str>,
    subscription: &str,
    resource_group: &str,
) -> Result<String, TargetError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(TargetError::Empty);
    }
    if is_resource_id(target) {
        return Ok(target.to_string());
    }

    let (Some(namespace), Some(resource_type)) = (namespace, resource_type) else {
        return Err(TargetError::MissingNamespaceOrType);
    };

    Ok(ResourceId {
        subscription: subscription.to_string(),
        resource_group: resource_group.to_string(),
        namespace: namespace.to_string(),
        parent: parent.map(str::to_string),
        resource_type: resource_type.to_string(),
        name: target.to_string(),
    }
    .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUB: &str = "00000000-0000-0000-0000-000000000000";

    #[test]
    fn full_id_passes_through() {
        let id = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm1";
        assert_eq!(resolve_target(id, None, None, None, SUB, "rg").unwrap(), id);
    }

    #[test]
    fn name_expands_with_namespace_and_type() {
        let id = resolve_target(
            "vm1",
            Some("Microsoft.Compute"),
            Some("virtualMachines"),
            None,
            SUB,
            "rg",
        )
        .unwrap();
        assert_eq!(
            id,
            format!("/subscriptions/{SUB}/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm1")
        );
    }

    #[test]
    fn parent_is_inserted_before_type() {
        let id = resolve_target(
            "db1",
            Some("Microsoft.Sql"),
            Some("databases"),
            Some("servers/sql1"),
            SUB,
            "rg",
        )
        .unwrap();
        assert!(id.ends_with("/providers/Microsoft.Sql/servers/sql1/databases/db1"));
    }

    #[test]
    fn name_without_namespace_is_rejected() {
        assert_eq!(
            resolve_target("vm1", None, Some("virtualMachines"), None, SUB, "rg"),
            Err(TargetError::MissingNamespaceOrType)
        );
        assert_eq!(
            resolve_target("  ", None, None, None, SUB, "rg"),
            Err(TargetError::Empty)
        );
    }

    #[test]
    fn alert_rule_ids() {
        assert_eq!(
            alert_rule_id("s", "rg", "rule1"),
            "/subscriptions/s/resourceGroups/rg/providers/microsoft.insights/alertrules/rule1"
        );
        assert_eq!(resource_group_id("s", "rg"), "/subscriptions/s/resourceGroups/rg");
    }

    #[test]
    fn resource_id_detection_is_case_insensitive() {
        assert!(is_resource_id("/SUBSCRIPTIONS/s/x"));
        assert!(!is_resource_id("vm1"));
        assert!(!is_resource_id("/sub"));
    }
}
