//! Fridge agent: food inventory. Knows no recipes.

use std::sync::Arc;

use super::{mentions, DeviceAgent};
use crate::blackboard::CompletedView;
use crate::device::DeviceType;
use crate::service::TextService;
use crate::task::Task;

/// Simulated fridge.
///
/// Owns the inventory and nothing else; anything that asks what to do with
/// the ingredients is a recipe question and belongs to the search engine.
#[derive(Debug)]
pub struct FridgeAgent {
    service: Arc<dyn TextService>,
}

impl FridgeAgent {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self { service }
    }
}

impl DeviceAgent for FridgeAgent {
    fn device(&self) -> DeviceType {
        DeviceType::Fridge
    }

    fn capabilities(&self) -> &'static str {
        "1. Provide food inventory data (items, quantities, expiry dates)\n\
         2. Alert about expiring items\n\
         3. Provide available ingredient lists"
    }

    fn service(&self) -> &Arc<dyn TextService> {
        &self.service
    }

    fn collaboration_need(
        &self,
        task: &Task,
        view: &CompletedView<'_>,
    ) -> Option<(DeviceType, String)> {
        if mentions(&task.action, &["recipe", "cook", "meal", "dish", "hungry"])
            && view.latest_result_for(DeviceType::SearchEngine).is_none()
        {
            return Some((
                DeviceType::SearchEngine,
                "find quick meal recipes using chicken, rice, and vegetables".to_string(),
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackboard::Blackboard;
    use crate::service::simulated::SimulatedCompletion;

    #[test]
    fn inventory_checks_are_independent() {
        let agent = FridgeAgent::new(Arc::new(SimulatedCompletion::new()));
        let board = Blackboard::new(Vec::new());
        let task = Task::new(DeviceType::Fridge, "check what food items are available");
        assert!(agent.collaboration_need(&task, &board.completed_view()).is_none());
    }

    #[test]
    fn recipe_questions_go_to_the_search_engine() {
        let agent = FridgeAgent::new(Arc::new(SimulatedCompletion::new()));
        let board = Blackboard::new(Vec::new());
        let task = Task::new(DeviceType::Fridge, "what's in the fridge and how to cook it");
        let (target, _) = agent
            .collaboration_need(&task, &board.completed_view())
            .unwrap();
        assert_eq!(target, DeviceType::SearchEngine);
    }
}
