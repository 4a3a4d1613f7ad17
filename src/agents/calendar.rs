//! Calendar agent: appointments, reminders, schedule queries.

use std::sync::Arc;

use super::{mentions, DeviceAgent};
use crate::blackboard::CompletedView;
use crate::device::DeviceType;
use crate::service::TextService;
use crate::task::Task;

/// Simulated calendar.
///
/// Two situations it cannot handle alone: putting the schedule on a screen
/// (tv_display owns the screen) and any question about the "next"
/// appointment, since the calendar does not know what time it is.
#[derive(Debug)]
pub struct CalendarAgent {
    service: Arc<dyn TextService>,
}

impl CalendarAgent {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self { service }
    }
}

impl DeviceAgent for CalendarAgent {
    fn device(&self) -> DeviceType {
        DeviceType::Calendar
    }

    fn capabilities(&self) -> &'static str {
        "1. Add appointments, reminders, and meetings\n\
         2. Cancel or reschedule appointments\n\
         3. Provide schedule information (time, location, participants)"
    }

    fn service(&self) -> &Arc<dyn TextService> {
        &self.service
    }

    fn collaboration_need(
        &self,
        task: &Task,
        view: &CompletedView<'_>,
    ) -> Option<(DeviceType, String)> {
        if mentions(&task.action, &["display", "show", "on the screen", "on screen"])
            && view.latest_result_for(DeviceType::TvDisplay).is_none()
        {
            return Some((
                DeviceType::TvDisplay,
                "Display today's schedule: team standup at 9 AM, lunch with Sarah at 1 PM, \
                 project review at 3 PM"
                    .to_string(),
            ));
        }
        if mentions(&task.action, &["next appointment", "next meeting", "next event"])
            && view.latest_result_for(DeviceType::Clock).is_none()
        {
            return Some((DeviceType::Clock, "What time is it now?".to_string()));
        }
        None
    }
}
