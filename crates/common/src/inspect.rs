//! Assertions over a rule's action list, used by scenario checks.

use std::collections::BTreeSet;

use crate::model::RuleAction;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InspectError {
    #[error("no email action among {0} action(s)")]
    EmailActionNotFound(usize),
    #[error("custom emails differ: expected {expected:?}, found {actual:?}")]
    EmailsMismatch {
        expected: BTreeSet<String>,
        actual: BTreeSet<String>,
    },
    #[error("sendToServiceOwners differs: expected {expected}, found {actual}")]
    ServiceOwnersMismatch { expected: bool, actual: bool },
    #[error("webhook URIs differ: expected {expected:?}, found {actual:?}")]
    WebhooksMismatch {
        expected: BTreeSet<String>,
        actual: BTreeSet<String>,
    },
}

fn to_set<'a>(items: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    items.into_iter().map(str::to_string).collect()
}

/// Checks the first email action. Comparison of addresses ignores order.
pub fn check_emails(
    actions: &[RuleAction],
    expected_emails: Option<&[&str]>,
    expected_service_owners: Option<bool>,
) -> Result<(), InspectError> {
    let email = actions
        .iter()
        .find_map(RuleAction::as_email)
        .ok_or(InspectError::EmailActionNotFound(actions.len()))?;

    if let Some(expected) = expected_emails {
        let expected = to_set(expected.iter().copied());
        let actual = to_set(email.custom_emails.iter().map(String::as_str));
        if expected != actual {
            return Err(InspectError::EmailsMismatch { expected, actual });
        }
    }

    if let Some(expected) = expected_service_owners {
        if email.send_to_service_owners != expected {
            return Err(InspectError::ServiceOwnersMismatch {
                expected,
                actual: email.send_to_service_owners,
            });
        }
    }

    Ok(())
}

/// Checks the `serviceUri` of every webhook action. Order is ignored.
pub fn check_webhooks(
    actions: &[RuleAction],
    expected_uris: Option<&[&str]>,
) -> Result<(), InspectError> {
    let Some(expected) = expected_uris else {
        return Ok(());
    };

    let expected = to_set(expected.iter().copied());
    let actual = to_set(
        actions
            .iter()
            .filter_map(RuleAction::as_webhook)
            .map(|w| w.service_uri.as_str()),
    );
    if expected != actual {
        return Err(InspectError::WebhooksMismatch { expected, actual });
    }
    Ok(())
}
