//! Audio system agent: music playback and volume.

use std::sync::Arc;

use super::{mentions, names_specific_title, DeviceAgent};
use crate::blackboard::CompletedView;
use crate::device::DeviceType;
use crate::service::TextService;
use crate::task::Task;

/// Simulated audio system.
///
/// Plays named songs and adjusts volume on its own. It cannot choose music:
/// a request tied to the fridge's contents needs the inventory first, and a
/// vague request ("play something relaxing") needs a recommendation from
/// the search engine.
#[derive(Debug)]
pub struct AudioSystemAgent {
    service: Arc<dyn TextService>,
}

impl AudioSystemAgent {
    pub fn new(service: Arc<dyn TextService>) -> Self {
        Self { service }
    }
}

impl DeviceAgent for AudioSystemAgent {
    fn device(&self) -> DeviceType {
        DeviceType::AudioSystem
    }

    fn capabilities(&self) -> &'static str {
        "1. Play music and audio content\n\
         2. Control volume"
    }

    fn service(&self) -> &Arc<dyn TextService> {
        &self.service
    }

    fn collaboration_need(
        &self,
        task: &Task,
        view: &CompletedView<'_>,
    ) -> Option<(DeviceType, String)> {
        if mentions(&task.action, &["fridge", "food", "ingredient"])
            && view.latest_result_for(DeviceType::Fridge).is_none()
        {
            return Some((DeviceType::Fridge, "current ingredients".to_string()));
        }

        if names_specific_title(&task.action) {
            return None;
        }
        let volume_only = mentions(
            &task.action,
            &["volume", "turn it down", "turn it up", "mute", "quieter", "louder"],
        ) && !mentions(&task.action, &["play", "music", "song"]);
        if volume_only {
            return None;
        }

        if mentions(
            &task.action,
            &["music", "something", "songs", "playlist", "sounds", "audio"],
        ) && view.latest_result_for(DeviceType::SearchEngine).is_none()
        {
            return Some((
                DeviceType::SearchEngine,
                format!("recommend music suited to: {}", task.action),
            ));
        }
        None
    }
}
