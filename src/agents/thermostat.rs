//! Thermostat agent: temperature control.

use std::sync::Arc;

use super::{mentions, DeviceAgent};
use crate::blackboard::CompletedView;
use crate::device::DeviceType;
use crate::service::TextService;
use crate::task::Task;

/// Simulated thermostat. Self-sufficient unless the target temperature is
/// tied to the weather outside.
#[derive(Debug)]
pub struct ThermostatAgent {
    service: Arc<dyn TextService>,
}

impl ThermostatAgent {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self { service }
    }
}

impl DeviceAgent for ThermostatAgent {
    fn device(&self) -> DeviceType {
        DeviceType::Thermostat
    }

    fn capabilities(&self) -> &'static str {
        "1. Control room temperature\n\
         2. Create atmosphere through temperature"
    }

    fn service(&self) -> &Arc<dyn TextService> {
        &self.service
    }

    fn collaboration_need(
        &self,
        task: &Task,
        view: &CompletedView<'_>,
    ) -> Option<(DeviceType, String)> {
        if mentions(&task.action, &["weather", "outside", "outdoor"])
            && view.latest_result_for(DeviceType::SearchEngine).is_none()
        {
            return Some((
                DeviceType::SearchEngine,
                "current outdoor temperature and conditions".to_string(),
            ));
        }
        None
    }
}
