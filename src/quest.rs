//! Quest log state machine.
//!
//! Progress counters never exceed an objective's required count, and a stage
//! only advances once every non-optional objective in it is complete. The
//! log emits events for subscribers; applying rewards is the session
//! coordinator's job.

use serde::{Deserialize, Serialize};

use crate::data::{ContentData, ObjectiveKind, QuestDef, QuestStage};

/// Lifecycle of an active quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Active,
    Completed,
    Failed,
}

/// Mutable progress record referencing a static quest definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveQuest {
    pub quest_id: String,
    pub status: QuestStatus,
    /// Index into the definition's stage list.
    pub stage: usize,
    /// Per-objective counters for the current stage.
    pub progress: Vec<u32>,
    pub started_day: u32,
    #[serde(default)]
    pub completed_day: Option<u32>,
}

impl ActiveQuest {
    fn new(def: &QuestDef, day: u32) -> Self {
        Self {
            quest_id: def.id.clone(),
            status: QuestStatus::Active,
            stage: 0,
            progress: vec![0; def.stages.first().map_or(0, |stage| stage.objectives.len())],
            started_day: day,
            completed_day: None,
        }
    }

    fn stage_complete(&self, stage: &QuestStage) -> bool {
        stage.objectives.iter().enumerate().all(|(idx, objective)| {
            objective.optional
                || self.progress.get(idx).copied().unwrap_or(0) >= objective.count
        })
    }
}

/// Quest lifecycle notifications for subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestEvent {
    Started { quest_id: String },
    Updated { quest_id: String },
    ObjectiveComplete { quest_id: String, objective: usize },
    StageAdvanced { quest_id: String, stage: usize },
    Completed { quest_id: String },
    Failed { quest_id: String },
}

/// The player's quest ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestLog {
    pub quests: Vec<ActiveQuest>,
    #[serde(skip)]
    events: Vec<QuestEvent>,
}

impl QuestLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, quest_id: &str) -> Option<&ActiveQuest> {
        self.quests.iter().find(|quest| quest.quest_id == quest_id)
    }

    fn get_mut(&mut self, quest_id: &str) -> Option<&mut ActiveQuest> {
        self.quests
            .iter_mut()
            .find(|quest| quest.quest_id == quest_id)
    }

    #[must_use]
    pub fn is_completed(&self, quest_id: &str) -> bool {
        self.get(quest_id)
            .is_some_and(|quest| quest.status == QuestStatus::Completed)
    }

    #[must_use]
    pub fn active(&self) -> impl Iterator<Item = &ActiveQuest> {
        self.quests
            .iter()
            .filter(|quest| quest.status == QuestStatus::Active)
    }

    /// Start a quest. Returns `false` (state unchanged) for unknown ids,
    /// quests already on the ledger, or unmet prerequisites.
    pub fn start_quest(&mut self, content: &ContentData, quest_id: &str, day: u32) -> bool {
        let Some(def) = content.quest(quest_id) else {
            return false;
        };
        if self.get(quest_id).is_some() {
            return false;
        }
        if !def
            .prerequisites
            .iter()
            .all(|prerequisite| self.is_completed(prerequisite))
        {
            return false;
        }
        self.quests.push(ActiveQuest::new(def, day));
        self.events.push(QuestEvent::Started {
            quest_id: quest_id.to_string(),
        });
        true
    }

    /// Mark an active quest failed. Returns `false` when not active.
    pub fn fail_quest(&mut self, quest_id: &str) -> bool {
        let Some(quest) = self.get_mut(quest_id) else {
            return false;
        };
        if quest.status != QuestStatus::Active {
            return false;
        }
        quest.status = QuestStatus::Failed;
        self.events.push(QuestEvent::Failed {
            quest_id: quest_id.to_string(),
        });
        true
    }

    /// Count progress toward every matching objective across all active
    /// quests. Returns the number of objectives advanced.
    pub fn update_objective(
        &mut self,
        content: &ContentData,
        kind: ObjectiveKind,
        target: &str,
        day: u32,
    ) -> u32 {
        let mut advanced = 0;
        let mut pending_events = Vec::new();

        for quest in &mut self.quests {
            if quest.status != QuestStatus::Active {
                continue;
            }
            let Some(def) = content.quest(&quest.quest_id) else {
                continue;
            };
            let Some(stage) = def.stages.get(quest.stage) else {
                continue;
            };

            let mut touched = false;
            for (idx, objective) in stage.objectives.iter().enumerate() {
                if objective.kind != kind || objective.target != target {
                    continue;
                }
                let Some(current) = quest.progress.get_mut(idx) else {
                    continue;
                };
                if *current >= objective.count {
                    continue;
                }
                *current += 1;
                touched = true;
                advanced += 1;
                if *current >= objective.count {
                    pending_events.push(QuestEvent::ObjectiveComplete {
                        quest_id: quest.quest_id.clone(),
                        objective: idx,
                    });
                }
            }

            if !touched {
                continue;
            }
            pending_events.push(QuestEvent::Updated {
                quest_id: quest.quest_id.clone(),
            });

            while quest.status == QuestStatus::Active {
                let Some(stage) = def.stages.get(quest.stage) else {
                    break;
                };
                if !quest.stage_complete(stage) {
                    break;
                }
                quest.stage += 1;
                if quest.stage >= def.stages.len() {
                    quest.status = QuestStatus::Completed;
                    quest.completed_day = Some(day);
                    quest.progress.clear();
                    pending_events.push(QuestEvent::Completed {
                        quest_id: quest.quest_id.clone(),
                    });
                } else {
                    let next_len = def.stages[quest.stage].objectives.len();
                    quest.progress = vec![0; next_len];
                    pending_events.push(QuestEvent::StageAdvanced {
                        quest_id: quest.quest_id.clone(),
                        stage: quest.stage,
                    });
                }
            }
        }

        self.events.extend(pending_events);
        advanced
    }

    /// Drain pending events for subscribers.
    pub fn drain_events(&mut self) -> Vec<QuestEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ObjectiveDef, QuestRewards, QuestStage};

    fn objective(kind: ObjectiveKind, target: &str, count: u32, optional: bool) -> ObjectiveDef {
        ObjectiveDef {
            kind,
            target: target.to_string(),
            count,
            optional,
            desc: String::new(),
        }
    }

    fn quest(id: &str, prerequisites: &[&str], stages: Vec<QuestStage>) -> QuestDef {
        QuestDef {
            id: id.to_string(),
            name: id.to_string(),
            desc: String::new(),
            prerequisites: prerequisites.iter().map(|p| (*p).to_string()).collect(),
            stages,
            rewards: QuestRewards::default(),
        }
    }

    fn fixture_content() -> ContentData {
        let mut content = ContentData::empty();
        content.quests.push(quest(
            "test_quest_1",
            &[],
            vec![
                QuestStage {
                    name: String::new(),
                    objectives: vec![
                        objective(ObjectiveKind::Talk, "test_npc_1", 1, false),
                        objective(ObjectiveKind::Collect, "screws", 3, true),
                    ],
                },
                QuestStage {
                    name: String::new(),
                    objectives: vec![objective(ObjectiveKind::Kill, "bandit", 2, false)],
                },
            ],
        ));
        content.quests.push(quest(
            "followup",
            &["test_quest_1"],
            vec![QuestStage {
                name: String::new(),
                objectives: vec![objective(ObjectiveKind::Visit, "gearford", 1, false)],
            }],
        ));
        content
    }

    #[test]
    fn start_quest_initializes_stage_zero() {
        let content = fixture_content();
        let mut log = QuestLog::new();
        assert!(log.start_quest(&content, "test_quest_1", 1));

        let quest = log.get("test_quest_1").unwrap();
        assert_eq!(quest.stage, 0);
        assert_eq!(quest.progress, vec![0, 0]);
        assert_eq!(quest.status, QuestStatus::Active);
        assert_eq!(
            log.drain_events(),
            vec![QuestEvent::Started {
                quest_id: "test_quest_1".to_string()
            }]
        );
    }

    #[test]
    fn duplicate_start_returns_false_and_leaves_state() {
        let content = fixture_content();
        let mut log = QuestLog::new();
        assert!(log.start_quest(&content, "test_quest_1", 1));
        let before = log.clone();
        assert!(!log.start_quest(&content, "test_quest_1", 2));
        assert_eq!(log.quests, before.quests);
    }

    #[test]
    fn unknown_quest_and_unmet_prerequisites_refuse() {
        let content = fixture_content();
        let mut log = QuestLog::new();
        assert!(!log.start_quest(&content, "no_such_quest", 1));
        assert!(!log.start_quest(&content, "followup", 1));
        assert!(log.quests.is_empty());
    }

    #[test]
    fn objective_progress_never_exceeds_count() {
        let content = fixture_content();
        let mut log = QuestLog::new();
        log.start_quest(&content, "test_quest_1", 1);
        // Optional collect objective caps at 3 even with extra updates.
        for _ in 0..5 {
            log.update_objective(&content, ObjectiveKind::Collect, "screws", 1);
        }
        let quest = log.get("test_quest_1").unwrap();
        assert_eq!(quest.progress[1], 3);
        assert_eq!(quest.stage, 0, "optional objective must not gate the stage");
    }

    #[test]
    fn stage_advances_on_required_objectives_only() {
        let content = fixture_content();
        let mut log = QuestLog::new();
        log.start_quest(&content, "test_quest_1", 1);
        let _ = log.drain_events();

        let advanced = log.update_objective(&content, ObjectiveKind::Talk, "test_npc_1", 1);
        assert_eq!(advanced, 1);
        let quest = log.get("test_quest_1").unwrap();
        assert_eq!(quest.stage, 1);
        assert_eq!(quest.progress, vec![0]);

        let events = log.drain_events();
        assert!(events.contains(&QuestEvent::ObjectiveComplete {
            quest_id: "test_quest_1".to_string(),
            objective: 0,
        }));
        assert!(events.contains(&QuestEvent::StageAdvanced {
            quest_id: "test_quest_1".to_string(),
            stage: 1,
        }));
    }

    #[test]
    fn final_stage_completion_emits_completed() {
        let content = fixture_content();
        let mut log = QuestLog::new();
        log.start_quest(&content, "test_quest_1", 1);
        log.update_objective(&content, ObjectiveKind::Talk, "test_npc_1", 1);
        log.update_objective(&content, ObjectiveKind::Kill, "bandit", 2);
        log.update_objective(&content, ObjectiveKind::Kill, "bandit", 2);

        let quest = log.get("test_quest_1").unwrap();
        assert_eq!(quest.status, QuestStatus::Completed);
        assert_eq!(quest.completed_day, Some(2));
        assert!(log
            .drain_events()
            .contains(&QuestEvent::Completed {
                quest_id: "test_quest_1".to_string()
            }));

        // Completion unlocks the follow-up quest.
        assert!(log.start_quest(&content, "followup", 3));
    }

    #[test]
    fn updates_do_not_touch_unrelated_quests() {
        let content = fixture_content();
        let mut log = QuestLog::new();
        log.start_quest(&content, "test_quest_1", 1);
        let advanced = log.update_objective(&content, ObjectiveKind::Talk, "someone_else", 1);
        assert_eq!(advanced, 0);
        let quest = log.get("test_quest_1").unwrap();
        assert_eq!(quest.progress, vec![0, 0]);
    }

    #[test]
    fn failed_quests_stop_counting() {
        let content = fixture_content();
        let mut log = QuestLog::new();
        log.start_quest(&content, "test_quest_1", 1);
        assert!(log.fail_quest("test_quest_1"));
        assert!(!log.fail_quest("test_quest_1"));
        let advanced = log.update_objective(&content, ObjectiveKind::Talk, "test_npc_1", 1);
        assert_eq!(advanced, 0);
    }
}
