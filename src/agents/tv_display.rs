//! TV display agent: shows visual content on the screen.

use std::sync::Arc;

use super::{mentions, names_specific_title, DeviceAgent};
use crate::blackboard::CompletedView;
use crate::device::DeviceType;
use crate::service::TextService;
use crate::task::Task;

/// Simulated TV display.
///
/// The display owns the screen but none of the content: schedules come from
/// the calendar, inventory from the fridge, timers from the clock, and
/// vague entertainment requests need a recommendation first. Only an exact
/// title plays directly.
#[derive(Debug)]
pub struct TvDisplayAgent {
    service: Arc<dyn TextService>,
}

impl TvDisplayAgent {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self { service }
    }
}

impl DeviceAgent for TvDisplayAgent {
    fn device(&self) -> DeviceType {
        DeviceType::TvDisplay
    }

    fn capabilities(&self) -> &'static str {
        "1. Display any visual content on the TV screen\n\
         2. Show entertainment, information, schedules, and recipes"
    }

    fn service(&self) -> &Arc<dyn TextService> {
        &self.service
    }

    fn collaboration_need(
        &self,
        task: &Task,
        view: &CompletedView<'_>,
    ) -> Option<(DeviceType, String)> {
        if names_specific_title(&task.action) {
            return None;
        }

        if mentions(&task.action, &["schedule", "calendar", "appointment"])
            && view.latest_result_for(DeviceType::Calendar).is_none()
        {
            return Some((
                DeviceType::Calendar,
                "get today's schedule and appointments".to_string(),
            ));
        }
        if mentions(&task.action, &["ingredient", "fridge", "food inventory"])
            && view.latest_result_for(DeviceType::Fridge).is_none()
        {
            return Some((DeviceType::Fridge, "get available ingredients".to_string()));
        }
        if mentions(&task.action, &["timer", "stopwatch"])
            && view.latest_result_for(DeviceType::Clock).is_none()
        {
            return Some((DeviceType::Clock, "get the current timer status".to_string()));
        }
        if mentions(
            &task.action,
            &["something", "a movie", "a comedy", "tv shows", "show me", "recommend"],
        ) && view.latest_result_for(DeviceType::SearchEngine).is_none()
        {
            return Some((
                DeviceType::SearchEngine,
                "recommend popular content to watch".to_string(),
            ));
        }
        None
    }
}
