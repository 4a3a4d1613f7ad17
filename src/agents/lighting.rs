//! Lighting agent: light levels and scenes.

use std::sync::Arc;

use super::{mentions, DeviceAgent};
use crate::blackboard::CompletedView;
use crate::device::DeviceType;
use crate::service::TextService;
use crate::task::Task;

/// Simulated lighting. Handles almost everything alone; a scene dictated by
/// a dish being cooked needs the search engine to say what the dish calls
/// for.
#[derive(Debug)]
pub struct LightingAgent {
    service: Arc<dyn TextService>,
}

impl LightingAgent {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self { service }
    }
}

impl DeviceAgent for LightingAgent {
    fn device(&self) -> DeviceType {
        DeviceType::Lighting
    }

    fn capabilities(&self) -> &'static str {
        "1. Adjust lights and brightness\n\
         2. Create atmosphere through lighting scenes"
    }

    fn service(&self) -> &Arc<dyn TextService> {
        &self.service
    }

    fn collaboration_need(
        &self,
        task: &Task,
        view: &CompletedView<'_>,
    ) -> Option<(DeviceType, String)> {
        if mentions(&task.action, &["recipe", "cooking", "the dish"])
            && view.latest_result_for(DeviceType::SearchEngine).is_none()
        {
            return Some((
                DeviceType::SearchEngine,
                "does this dish call for dim or bright lighting while cooking?".to_string(),
            ));
        }
        None
    }
}
