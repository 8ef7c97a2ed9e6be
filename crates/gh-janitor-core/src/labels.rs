//! Label reconciliation
//!
//! Brings a repository's labels in line with the canonical taxonomy. Planning
//! is pure: [`plan_label_actions`] turns the current labels into an ordered
//! list of [`LabelAction`]s. [`LabelReconciler`] fetches, plans and applies.

use crate::pages::collect_pages;
use anyhow::Context;
use gh_janitor_client::{Label, TrackerClient};
use gh_janitor_config::LabelPolicy;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A single label mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelAction {
    /// Rename a label in place, keeping its color
    Rename { from: String, to: String, color: String },

    /// Delete an undesired label
    Delete { name: String },

    /// Change the color of a canonical label
    Recolor { name: String, from: String, to: String },

    /// Create a missing canonical label
    Create { name: String, color: String },
}

impl fmt::Display for LabelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelAction::Rename { from, to, .. } => write!(f, "rename {:?} to {:?}", from, to),
            LabelAction::Delete { name } => write!(f, "delete {:?}", name),
            LabelAction::Recolor { name, from, to } => {
                write!(f, "recolor {:?} from #{} to #{}", name, from, to)
            }
            LabelAction::Create { name, color } => write!(f, "create {:?} #{}", name, color),
        }
    }
}

/// Label names are unique on GitHub regardless of case
fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Plan the label mutations for one repository
///
/// For each current label, in order:
/// 1. rename it if its name is a rename source (unless another label
///    already holds the target name);
/// 2. delete it if its (possibly new) name is undesired;
/// 3. if its name is canonical, fix the spelling and the color.
///
/// Names are compared case-insensitively. Labels that are neither canonical
/// nor undesired are left alone. Finally every canonical name not seen is
/// created, in name order.
pub fn plan_label_actions(policy: &LabelPolicy, current: &[Label]) -> Vec<LabelAction> {
    let desired: BTreeMap<String, (&str, &str)> = policy
        .desired
        .iter()
        .map(|(name, color)| (name_key(name), (name.as_str(), color.as_str())))
        .collect();
    let renames: BTreeMap<String, &str> = policy
        .renames
        .iter()
        .map(|(from, to)| (name_key(from), to.as_str()))
        .collect();
    let undesired: BTreeSet<String> = policy.undesired.iter().map(|n| name_key(n)).collect();

    let mut actions = Vec::new();
    let mut missing: BTreeSet<&str> = policy.desired.keys().map(String::as_str).collect();
    // names held by some label once the actions planned so far are applied
    let mut taken: BTreeSet<String> = current.iter().map(|l| name_key(&l.name)).collect();

    for label in current {
        let mut name = label.name.as_str();

        let rename = renames
            .get(&name_key(name))
            .copied()
            .filter(|target| name_key(target) != name_key(name));
        if let Some(target) = rename {
            if taken.contains(&name_key(target)) {
                log::warn!(
                    "Not renaming label {:?} to {:?}: a label with that name exists",
                    name,
                    target
                );
            } else {
                actions.push(LabelAction::Rename {
                    from: name.to_string(),
                    to: target.to_string(),
                    color: label.color.clone(),
                });
                taken.remove(&name_key(name));
                taken.insert(name_key(target));
                name = target;
            }
        }

        if undesired.contains(&name_key(name)) {
            actions.push(LabelAction::Delete {
                name: name.to_string(),
            });
            taken.remove(&name_key(name));
            continue;
        }

        if let Some(&(canonical, color)) = desired.get(&name_key(name)) {
            if name != canonical {
                actions.push(LabelAction::Rename {
                    from: name.to_string(),
                    to: canonical.to_string(),
                    color: label.color.clone(),
                });
            }
            if !color.eq_ignore_ascii_case(&label.color) {
                actions.push(LabelAction::Recolor {
                    name: canonical.to_string(),
                    from: label.color.clone(),
                    to: color.to_string(),
                });
            }
            missing.remove(canonical);
        }
    }

    for name in missing {
        actions.push(LabelAction::Create {
            name: name.to_string(),
            color: policy.desired[name].clone(),
        });
    }

    actions
}

/// Fetches, plans and applies label changes for repositories
#[derive(Debug, Clone)]
pub struct LabelReconciler<'a> {
    policy: &'a LabelPolicy,
}

impl<'a> LabelReconciler<'a> {
    pub fn new(policy: &'a LabelPolicy) -> Self {
        Self { policy }
    }

    /// Reconcile the labels of `owner/repo`
    ///
    /// Returns the actions taken (or, behind a dry-run client, the actions
    /// that would have been taken).
    pub async fn reconcile(
        &self,
        client: &dyn TrackerClient,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<LabelAction>> {
        let current = fetch_labels(client, owner, repo)
            .await
            .with_context(|| format!("Error fetching labels of {}/{}", owner, repo))?;
        let actions = plan_label_actions(self.policy, &current);

        for action in &actions {
            log::info!("{}: {}", repo, action);
            apply_action(client, owner, repo, action)
                .await
                .with_context(|| format!("Can't {} in {}/{}", action, owner, repo))?;
        }

        Ok(actions)
    }
}

/// All labels of a repository, following pagination
pub async fn fetch_labels(
    client: &dyn TrackerClient,
    owner: &str,
    repo: &str,
) -> anyhow::Result<Vec<Label>> {
    collect_pages(|page| client.list_labels(owner, repo, page)).await
}

async fn apply_action(
    client: &dyn TrackerClient,
    owner: &str,
    repo: &str,
    action: &LabelAction,
) -> anyhow::Result<()> {
    match action {
        LabelAction::Rename { from, to, color } => {
            client
                .update_label(owner, repo, from, &Label::new(to.as_str(), color.as_str()))
                .await
        }
        LabelAction::Delete { name } => client.delete_label(owner, repo, name).await,
        LabelAction::Recolor { name, to, .. } => {
            client
                .update_label(owner, repo, name, &Label::new(name.as_str(), to.as_str()))
                .await
        }
        LabelAction::Create { name, color } => {
            client
                .create_label(owner, repo, &Label::new(name.as_str(), color.as_str()))
                .await
        }
    }
}
