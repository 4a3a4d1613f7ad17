//! Clock agent: time, alarms, timers, stopwatch.

use std::sync::Arc;

use super::{mentions, DeviceAgent};
use crate::blackboard::CompletedView;
use crate::device::DeviceType;
use crate::service::TextService;
use crate::task::Task;

/// Simulated clock.
///
/// Timers and alarms with explicit times are handled directly. A reminder
/// pinned to "my next meeting" needs the calendar's schedule first.
#[derive(Debug)]
pub struct ClockAgent {
    service: Arc<dyn TextService>,
}

impl ClockAgent {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self { service }
    }
}

impl DeviceAgent for ClockAgent {
    fn device(&self) -> DeviceType {
        DeviceType::Clock
    }

    fn capabilities(&self) -> &'static str {
        "1. Provide the current time\n\
         2. Set or cancel alarms with the default alarm sound\n\
         3. Set or cancel timers\n\
         4. Start or stop a stopwatch"
    }

    fn service(&self) -> &Arc<dyn TextService> {
        &self.service
    }

    fn collaboration_need(
        &self,
        task: &Task,
        view: &CompletedView<'_>,
    ) -> Option<(DeviceType, String)> {
        if mentions(&task.action, &["next meeting", "next appointment", "next event"])
            && view.latest_result_for(DeviceType::Calendar).is_none()
        {
            return Some((
                DeviceType::Calendar,
                "What time is my next scheduled appointment today?".to_string(),
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

    fn agent() -> ClockAgent {
        ClockAgent::new(Arc::new(SimulatedCompletion::new()))
    }

    #[test]
    fn plain_timer_needs_no_help() {
        let board = Blackboard::new(Vec::new());
        let task = Task::new(DeviceType::Clock, "set a 20-minute timer");
        assert!(agent().collaboration_need(&task, &board.completed_view()).is_none());
    }

    #[test]
    fn meeting_reminder_asks_the_calendar() {
        let board = Blackboard::new(Vec::new());
        let task = Task::new(DeviceType::Clock, "remind me 10 minutes before my next meeting");
        let (target, _) = agent()
            .collaboration_need(&task, &board.completed_view())
            .unwrap();
        assert_eq!(target, DeviceType::Calendar);
    }

    #[test]
    fn completed_calendar_work_suppresses_the_request() {
        let mut board = Blackboard::new(vec![Task::new(
            DeviceType::Calendar,
            "check today's schedule",
        )]);
        board.begin_task(0).unwrap();
        board
            .complete_task(0, "Next meeting at 3 PM".to_string())
            .unwrap();

        let task = Task::new(DeviceType::Clock, "remind me before my next meeting");
        assert!(agent().collaboration_need(&task, &board.completed_view()).is_none());
    }
}
