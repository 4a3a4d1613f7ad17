//! Search engine agent: general information, recipes, weather.

use std::sync::Arc;

use super::{mentions, DeviceAgent};
use crate::blackboard::CompletedView;
use crate::device::DeviceType;
use crate::service::TextService;
use crate::task::Task;

/// Simulated search engine.
///
/// Can simulate almost any answer directly. The exceptions are recipe
/// searches pinned to "what's actually in the fridge" (inventory is the
/// fridge's data) and weather at "my next scheduled location" (the calendar
/// owns the schedule).
#[derive(Debug)]
pub struct SearchEngineAgent {
    service: Arc<dyn TextService>,
}

impl SearchEngineAgent {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self { service }
    }
}

impl DeviceAgent for SearchEngineAgent {
    fn device(&self) -> DeviceType {
        DeviceType::SearchEngine
    }

    fn capabilities(&self) -> &'static str {
        "1. Provide weather information\n\
         2. Provide recipes and cooking information\n\
         3. Provide general information and knowledge\n\
         4. Provide home management tips and advice"
    }

    fn service(&self) -> &Arc<dyn TextService> {
        &self.service
    }

    fn collaboration_need(
        &self,
        task: &Task,
        view: &CompletedView<'_>,
    ) -> Option<(DeviceType, String)> {
        let recipe_like = mentions(&task.action, &["recipe", "meal", "cook", "dish"]);
        let inventory_bound = mentions(
            &task.action,
            &[
                "available ingredient",
                "ingredients you already have",
                "ingredients i have",
                "available food",
                "what's in the fridge",
                "in my fridge",
                "on hand",
            ],
        );
        if recipe_like && inventory_bound && view.latest_result_for(DeviceType::Fridge).is_none() {
            return Some((
                DeviceType::Fridge,
                "list available ingredients for meal planning".to_string(),
            ));
        }

        if mentions(&task.action, &["next scheduled location", "my next appointment"])
            && view.latest_result_for(DeviceType::Calendar).is_none()
        {
            return Some((
                DeviceType::Calendar,
                "check the location of the next scheduled event".to_string(),
            ));
        }
        None
    }
}
