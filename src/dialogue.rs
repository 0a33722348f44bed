//! Dialogue trees and traversal.
//!
//! Trees are purely declarative data; choices carry tagged action variants
//! that the session coordinator's effect dispatcher interprets. The
//! controller here only walks nodes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::data::ObjectiveKind;

/// Side effects a dialogue choice can request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogueAction {
    StartQuest { quest_id: String },
    AdvanceObjective { kind: ObjectiveKind, target: String },
    GiveItem { item_id: String, quantity: u32 },
    GiveGold { amount: i64 },
    TakeGold { amount: i64 },
    AdjustReputation { delta: i32 },
    OpenShop { shop_id: String },
    EndDialogue,
}

/// Action list kept inline; almost every choice carries zero or one action.
pub type DialogueActions = SmallVec<[DialogueAction; 2]>;

/// One selectable reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueChoice {
    pub label: String,
    /// Node id to continue at; `None` ends the conversation.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub actions: DialogueActions,
}

/// A single speech node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub id: String,
    #[serde(default)]
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub choices: Vec<DialogueChoice>,
}

/// A complete conversation tree for one NPC interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTree {
    pub id: String,
    pub start: String,
    pub nodes: Vec<DialogueNode>,
}

impl DialogueTree {
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Traversal state for an in-progress conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    pub npc_id: String,
    pub tree_id: String,
    pub node_id: String,
    pub finished: bool,
}

impl DialogueState {
    /// Begin a conversation; `None` when the tree's start node is missing.
    #[must_use]
    pub fn begin(tree: &DialogueTree, npc_id: &str) -> Option<Self> {
        tree.node(&tree.start)?;
        Some(Self {
            npc_id: npc_id.to_string(),
            tree_id: tree.id.clone(),
            node_id: tree.start.clone(),
            finished: false,
        })
    }

    /// Current node, if the tree still contains it.
    #[must_use]
    pub fn current_node<'a>(&self, tree: &'a DialogueTree) -> Option<&'a DialogueNode> {
        tree.node(&self.node_id)
    }

    /// Take choice `index` at the current node. Returns the choice's actions
    /// and advances (or finishes) the conversation. Out-of-range indices and
    /// dangling `next` ids are a no-op returning `None`.
    pub fn choose(&mut self, tree: &DialogueTree, index: usize) -> Option<DialogueActions> {
        if self.finished {
            return None;
        }
        let node = self.current_node(tree)?;
        let choice = node.choices.get(index)?;
        let actions = choice.actions.clone();
        match &choice.next {
            Some(next) if tree.node(next).is_some() => {
                self.node_id = next.clone();
            }
            Some(_) | None => {
                self.finished = true;
            }
        }
        // A node with no choices also terminates the conversation on the
        // consumer side; `finished` only tracks explicit traversal ends.
        Some(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn fixture_tree() -> DialogueTree {
        DialogueTree {
            id: "marshal_intro".to_string(),
            start: "greeting".to_string(),
            nodes: vec![
                DialogueNode {
                    id: "greeting".to_string(),
                    speaker: "Marshal".to_string(),
                    text: "New in town?".to_string(),
                    choices: vec![
                        DialogueChoice {
                            label: "Looking for work.".to_string(),
                            next: Some("job_offer".to_string()),
                            actions: DialogueActions::new(),
                        },
                        DialogueChoice {
                            label: "Just passing through.".to_string(),
                            next: None,
                            actions: smallvec![DialogueAction::EndDialogue],
                        },
                    ],
                },
                DialogueNode {
                    id: "job_offer".to_string(),
                    speaker: "Marshal".to_string(),
                    text: "Bandits hit the supply line.".to_string(),
                    choices: vec![DialogueChoice {
                        label: "I'll handle it.".to_string(),
                        next: None,
                        actions: smallvec![DialogueAction::StartQuest {
                            quest_id: "supply_line".to_string()
                        }],
                    }],
                },
            ],
        }
    }

    #[test]
    fn begin_requires_start_node() {
        let tree = fixture_tree();
        let state = DialogueState::begin(&tree, "marshal").unwrap();
        assert_eq!(state.node_id, "greeting");
        assert!(!state.finished);

        let broken = DialogueTree {
            start: "missing".to_string(),
            ..fixture_tree()
        };
        assert!(DialogueState::begin(&broken, "marshal").is_none());
    }

    #[test]
    fn traversal_follows_edges_and_collects_actions() {
        let tree = fixture_tree();
        let mut state = DialogueState::begin(&tree, "marshal").unwrap();

        let actions = state.choose(&tree, 0).unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.node_id, "job_offer");
        assert!(!state.finished);

        let actions = state.choose(&tree, 0).unwrap();
        assert_eq!(
            actions.as_slice(),
            [DialogueAction::StartQuest {
                quest_id: "supply_line".to_string()
            }]
        );
        assert!(state.finished);
        assert!(state.choose(&tree, 0).is_none());
    }

    #[test]
    fn out_of_range_choice_is_a_no_op() {
        let tree = fixture_tree();
        let mut state = DialogueState::begin(&tree, "marshal").unwrap();
        assert!(state.choose(&tree, 9).is_none());
        assert_eq!(state.node_id, "greeting");
        assert!(!state.finished);
    }

    #[test]
    fn dangling_next_ends_the_conversation() {
        let mut tree = fixture_tree();
        tree.nodes[0].choices[0].next = Some("nowhere".to_string());
        let mut state = DialogueState::begin(&tree, "marshal").unwrap();
        let actions = state.choose(&tree, 0);
        assert!(actions.is_some());
        assert!(state.finished);
    }

    #[test]
    fn actions_round_trip_through_json() {
        let action = DialogueAction::AdvanceObjective {
            kind: ObjectiveKind::Talk,
            target: "marshal".to_string(),
        };
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("advance_objective"));
        let parsed: DialogueAction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, action);
    }
}
