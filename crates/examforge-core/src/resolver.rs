//! Equivalence resolution: near-duplicate grouping across delivery types.
//!
//! The bank may carry the same assessment item as, say, both a multiple
//! choice and a free text question. The resolver groups those under a looser
//! content key (category + normalized text, options ignored) and picks one
//! representative per group, so no variant can ever contain two renditions
//! of the same item. This key is deliberately distinct from the strict
//! identity key: exact dedup and near-duplicate dedup stay separate lookups.

use std::collections::BTreeMap;

use crate::bank::{collapse_whitespace, QuestionBank};
use crate::model::{DeliveryType, Question, SelectionConfig};

/// A set of questions considered interchangeable renditions of one item.
#[derive(Debug, Clone)]
pub struct EquivalenceGroup {
    /// The normalized content key shared by all members.
    pub key: String,
    /// Members in identity order.
    pub members: Vec<Question>,
    /// Identity of the chosen representative.
    pub representative: String,
}

/// The resolved view of the bank that downstream components see.
#[derive(Debug, Clone)]
pub struct Resolved {
    groups: Vec<EquivalenceGroup>,
}

impl Resolved {
    /// One representative per equivalence group, in identity order.
    pub fn representatives(&self) -> Vec<&Question> {
        let mut reps: Vec<&Question> = self
            .groups
            .iter()
            .map(|g| {
                g.members
                    .iter()
                    .find(|m| m.identity == g.representative)
                    .expect("representative is always a member")
            })
            .collect();
        reps.sort_by(|a, b| a.identity.cmp(&b.identity));
        reps
    }

    /// All groups, including singletons.
    pub fn groups(&self) -> &[EquivalenceGroup] {
        &self.groups
    }

    /// The equivalence key a given question belongs to, if it is known.
    pub fn group_of(&self, identity: &str) -> Option<&EquivalenceGroup> {
        self.groups
            .iter()
            .find(|g| g.members.iter().any(|m| m.identity == identity))
    }
}

/// The normalized-content key: category plus lowercased,
/// whitespace-collapsed text. Options are ignored on purpose, so a multiple
/// choice rendition and a free text rendition of the same item share a key.
pub fn equivalence_key(question: &Question) -> String {
    format!(
        "{}\u{1f}{}",
        question.category,
        collapse_whitespace(&question.text).to_lowercase()
    )
}

/// Partition the bank into equivalence groups and pick representatives
/// according to the configured delivery-type preference order.
///
/// Pure function of the bank and config: no interior state, deterministic
/// for a given input.
pub fn resolve(bank: &QuestionBank, config: &SelectionConfig) -> Resolved {
    let mut by_key: BTreeMap<String, Vec<Question>> = BTreeMap::new();
    for question in bank.questions() {
        by_key
            .entry(equivalence_key(question))
            .or_default()
            .push(question.clone());
    }

    let groups = by_key
        .into_iter()
        .map(|(key, mut members)| {
            members.sort_by(|a, b| a.identity.cmp(&b.identity));
            let representative = pick_representative(&members, &config.preferred_types)
                .identity
                .clone();
            if members.len() > 1 {
                tracing::debug!(
                    key = %key,
                    members = members.len(),
                    representative = %representative,
                    "collapsed equivalence group"
                );
            }
            EquivalenceGroup {
                key,
                members,
                representative,
            }
        })
        .collect();

    Resolved { groups }
}

/// Earliest preferred delivery type wins; unlisted types rank after all
/// listed ones; remaining ties break by identity key. With an empty
/// preference list this degenerates to plain identity-key order.
fn pick_representative<'a>(
    members: &'a [Question],
    preferred: &[DeliveryType],
) -> &'a Question {
    let rank = |q: &Question| {
        preferred
            .iter()
            .position(|t| *t == q.delivery_type)
            .unwrap_or(usize::MAX)
    };
    members
        .iter()
        .min_by(|a, b| rank(a).cmp(&rank(b)).then_with(|| a.identity.cmp(&b.identity)))
        .expect("groups are never empty")
}
