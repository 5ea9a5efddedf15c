//! Grammar of the `--action` / `--add-action` / `--remove-action` flags.
//!
//! Every occurrence of the flag contributes its values to one flat token
//! list; a token naming an action type (`email`, `webhook`) opens a new group.

use std::collections::BTreeMap;

use crate::model::{RuleAction, RuleEmailAction, RuleWebhookAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Email,
    Webhook,
}

impl ActionKind {
    fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("email") {
            Some(Self::Email)
        } else if token.eq_ignore_ascii_case("webhook") {
            Some(Self::Webhook)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    #[error("usage error: {flag} TYPE KEY [ARGS]: unknown action type '{found}'")]
    UnknownType { flag: &'static str, found: String },
    #[error("usage error: {flag} webhook URI [KEY=VALUE ...]: missing URI")]
    MissingUri { flag: &'static str },
    #[error("usage error: {flag} webhook URI [KEY=VALUE ...]: '{found}' is not KEY=VALUE")]
    BadProperty { flag: &'static str, found: String },
}

/// One addition requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionArg {
    Email(Vec<String>),
    Webhook {
        uri: String,
        properties: BTreeMap<String, String>,
    },
}

/// One removal requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRemoval {
    Email(Vec<String>),
    Webhook(Vec<String>),
}

fn group_tokens<'a>(
    tokens: &'a [String],
    flag: &'static str,
) -> Result<Vec<(ActionKind, &'a [String])>, ActionParseError> {
    let mut groups = Vec::new();
    let mut start = 0;
    let mut kind = None;

    for (i, token) in tokens.iter().enumerate() {
        match (ActionKind::from_token(token), kind) {
            (Some(next), Some(current)) => {
                groups.push((current, &tokens[start..i]));
                kind = Some(next);
                start = i + 1;
            }
            (Some(next), None) => {
                kind = Some(next);
                start = i + 1;
            }
            (None, Some(_)) => {}
            (None, None) => {
                return Err(ActionParseError::UnknownType {
                    flag,
                    found: token.clone(),
                })
            }
        }
    }

    if let Some(current) = kind {
        groups.push((current, &tokens[start..]));
    }
    Ok(groups)
}

pub fn parse_action_args(tokens: &[String]) -> Result<Vec<ActionArg>, ActionParseError> {
    const FLAG: &str = "--action";

    group_tokens(tokens, FLAG)?
        .into_iter()
        .map(|(kind, values)| -> Result<ActionArg, ActionParseError> {
            match kind {
                ActionKind::Email => Ok(ActionArg::Email(values.to_vec())),
                ActionKind::Webhook => {
                    let (uri, rest) = values
                        .split_first()
                        .ok_or(ActionParseError::MissingUri { flag: FLAG })?;
                    let properties = rest
                        .iter()
                        .map(|kv| {
                            kv.split_once('=')
                                .map(|(k, v)| (k.to_string(), v.to_string()))
                                .ok_or_else(|| ActionParseError::BadProperty {
                                    flag: FLAG,
                                    found: kv.clone(),
                                })
                        })
                        .collect::<Result<BTreeMap<_, _>, _>>()?;
                    Ok(ActionArg::Webhook {
                        uri: uri.clone(),
                        properties,
                    })
                }
            }
        })
        .collect()
}

pub fn parse_action_removals(tokens: &[String]) -> Result<Vec<ActionRemoval>, ActionParseError> {
    Ok(group_tokens(tokens, "--remove-action")?
        .into_iter()
        .map(|(kind, values)| match kind {
            ActionKind::Email => ActionRemoval::Email(values.to_vec()),
            ActionKind::Webhook => ActionRemoval::Webhook(values.to_vec()),
        })
        .collect())
}

/// Flattened view of a rule's actions: what update operates on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSet {
    pub emails: Vec<String>,
    pub webhooks: Vec<RuleWebhookAction>,
    pub send_to_service_owners: bool,
}

impl ActionSet {
    /// Collects every email address and webhook of an action list.
    /// The service-owner flag comes from the first email action.
    pub fn from_actions(actions: &[RuleAction]) -> Self {
        let mut set = Self::default();
        let mut seen_email_action = false;
        for action in actions {
            match action {
                RuleAction::Email(e) => {
                    if !seen_email_action {
                        set.send_to_service_owners = e.send_to_service_owners;
                        seen_email_action = true;
                    }
                    set.add_emails(&e.custom_emails);
                }
                RuleAction::Webhook(w) => set.webhooks.push(w.clone()),
            }
        }
        set
    }

    pub fn add_emails(&mut self, emails: &[String]) {
        for email in emails {
            if !self.emails.contains(email) {
                self.emails.push(email.clone());
            }
        }
    }

    pub fn add(&mut self, args: &[ActionArg]) {
        for arg in args {
            match arg {
                ActionArg::Email(emails) => self.add_emails(emails),
                ActionArg::Webhook { uri, properties } => self.webhooks.push(RuleWebhookAction {
                    service_uri: uri.clone(),
                    properties: properties.clone(),
                }),
            }
        }
    }

    pub fn remove(&mut self, removals: &[ActionRemoval]) {
        for removal in removals {
            match removal {
                ActionRemoval::Email(emails) => self.emails.retain(|e| !emails.contains(e)),
                ActionRemoval::Webhook(uris) => {
                    self.webhooks.retain(|w| !uris.contains(&w.service_uri))
                }
            }
        }
    }

    /// Stored shape: one email action first, then one action per webhook.
    pub fn into_actions(self) -> Vec<RuleAction> {
        let mut actions = Vec::with_capacity(1 + self.webhooks.len());
        actions.push(RuleAction::Email(RuleEmailAction {
            send_to_service_owners: self.send_to_service_owners,
            custom_emails: self.emails,
        }));
        actions.extend(self.webhooks.into_iter().map(RuleAction::Webhook));
        actions
    }
}

pub fn build_actions(args: &[ActionArg], send_to_service_owners: bool) -> Vec<RuleAction> {
    let mut set = ActionSet {
        send_to_service_owners,
        ..ActionSet::default()
    };
    set.add(args);
    set.into_actions()
}
