//! Prompt construction for the text service.
//!
//! All prompts are built here so the agents stay free of string plumbing
//! and the wording can be tuned in one place. Each prompt pins the output
//! contract (pure JSON or plain text, no questions back to the user).

use crate::device::DeviceType;
use crate::task::Task;

/// Prompt for splitting raw user text into intents and modifiers.
pub fn intent_analysis(user_text: &str) -> String {
    format!(
        "Analyze the user's smart home request.\n\
         \n\
         User input: {user_text}\n\
         \n\
         Split the input into separate information units. One unit is one\n\
         intent, feeling, or fact; keep every detail of what, how, when,\n\
         why, and where. If \"and\" connects independent requests, split them.\n\
         \n\
         For each unit, extract key modifiers (time: \"gradually\", \"at 10pm\",\n\
         \"for 30 minutes\"; location: \"in the bedroom\"; manner: \"very bright\",\n\
         \"quietly\"; quantity: \"all\", \"half\"; negation: \"no music\", \"without\")\n\
         and name the owning device if clearly one of: clock, calendar,\n\
         search_engine, tv_display, fridge, lighting, thermostat,\n\
         audio_system. Use null when unsure.\n\
         \n\
         Output ONLY valid JSON, no markdown fences, in this format:\n\
         {{\"intents\": [{{\"description\": \"...\", \"device\": null,\n\
         \"modifiers\": {{\"time\": \"...\"}}}}]}}"
    )
}

/// Prompt for executing a device action, optionally with a resolved
/// collaboration response folded in.
pub fn device_action(
    device: DeviceType,
    capabilities: &str,
    task: &Task,
    history_lines: &[String],
    collaboration: Option<(&str, &str)>,
) -> String {
    let mut prompt = format!(
        "You are the smart home {} agent.\n\nYour capabilities:\n{}\n\nCurrent task: {}\n",
        device.label(),
        capabilities,
        task.action
    );

    if !history_lines.is_empty() {
        prompt.push_str("\nWhat other devices already did:\n");
        for line in history_lines {
            prompt.push_str(&format!("- {}\n", line));
        }
    }

    if let Some((collaborator, response)) = collaboration {
        prompt.push_str(&format!(
            "\nInformation received from {}: {}\n\nComplete the task using this information.\n",
            collaborator, response
        ));
    }

    prompt.push_str(
        "\nSimulate the operation and state the result in one or two plain\n\
         sentences. Don't ask the user for clarification or preferences, and\n\
         don't request help from other agents. Output plain text only.",
    );
    prompt
}

/// Prompt for answering a one-shot collaboration query.
pub fn query_response(
    device: DeviceType,
    capabilities: &str,
    requester: DeviceType,
    query: &str,
) -> String {
    format!(
        "You are the smart home {} agent.\n\nYour capabilities:\n{}\n\n\
         You received a collaboration request from the {} agent.\n\
         Request: {}\n\n\
         Provide the requested information directly, simulating reasonable\n\
         data. Don't ask the user anything and don't request help from other\n\
         agents. Output plain text only.",
        device.label(),
        capabilities,
        requester.label(),
        query
    )
}

/// Prompt for composing the final user-facing response.
pub fn compose(user_text: &str, task_lines: &[String], all_done: bool) -> String {
    let mut prompt = format!(
        "The user asked their smart home: {}\n\nWhat the devices did:\n",
        user_text
    );
    for line in task_lines {
        prompt.push_str(&format!("- {}\n", line));
    }
    if !all_done {
        prompt.push_str(
            "\nSome actions failed; say clearly which parts were done and\n\
             which were not.\n",
        );
    }
    prompt.push_str(
        "\nWrite one short, coherent reply to the user covering every action\n\
         above, in order. Output plain text only.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    #[test]
    fn action_prompt_includes_collaboration_response() {
        let task = Task::new(DeviceType::AudioSystem, "play music that matches the fridge");
        let prompt = device_action(
            DeviceType::AudioSystem,
            "1. Play music\n2. Control volume",
            &task,
            &[],
            Some(("Fridge", "chicken, rice, eggs")),
        );
        assert!(prompt.contains("Information received from Fridge"));
        assert!(prompt.contains("chicken, rice, eggs"));
    }

    #[test]
    fn compose_prompt_flags_partial_runs() {
        let prompt = compose("do two things", &["Lighting: done".to_string()], false);
        assert!(prompt.contains("Some actions failed"));
    }
}
