mod group_store;
mod rule_store;

pub use group_store::GroupStore;
pub use rule_store::RuleStore;

/// Subscription + resource group, normalized for case-insensitive lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    subscription: String,
    resource_group: String,
}

impl ScopeKey {
    pub fn new(subscription: &str, resource_group: &str) -> Self {
        Self {
            subscription: subscription.to_ascii_lowercase(),
            resource_group: resource_group.to_ascii_lowercase(),
        }
    }
}
