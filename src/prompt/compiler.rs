// src/prompt/compiler.rs
// Deterministic rendering of a structured clinical profile into the
// natural-language system prompt handed to the language model. Section
// order and conditional emission are a compatibility contract: sessions
// graded against old transcripts must see byte-identical prompts.

use serde::{Deserialize, Serialize};

/// How readily the patient volunteers clinical information.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RevelationLevel {
    Forthcoming,
    #[default]
    Moderate,
    Reserved,
}

impl std::fmt::Display for RevelationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevelationLevel::Forthcoming => write!(f, "forthcoming"),
            RevelationLevel::Moderate => write!(f, "moderate"),
            RevelationLevel::Reserved => write!(f, "reserved"),
        }
    }
}

impl std::str::FromStr for RevelationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forthcoming" => Ok(RevelationLevel::Forthcoming),
            "moderate" => Ok(RevelationLevel::Moderate),
            "reserved" => Ok(RevelationLevel::Reserved),
            other => Err(format!("unknown revelation level: {other}")),
        }
    }
}

/// The decomposed clinical fields of a patient actor, as opposed to one
/// legacy free-text prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredProfile {
    // Patient profile
    pub demographics: String,
    pub chief_complaint: String,
    pub medical_history: String,
    pub medications: String,
    pub social_history: String,
    pub personality: String,

    // Clinical findings
    pub physical_findings: String,
    pub additional_symptoms: String,

    // Behavior settings
    pub revelation_level: RevelationLevel,
    pub stay_in_character: bool,
    pub avoid_medical_jargon: bool,
    pub provide_feedback: bool,
    pub custom_instructions: String,
}

impl Default for StructuredProfile {
    fn default() -> Self {
        Self {
            demographics: String::new(),
            chief_complaint: String::new(),
            medical_history: String::new(),
            medications: String::new(),
            social_history: String::new(),
            personality: String::new(),
            physical_findings: String::new(),
            additional_symptoms: String::new(),
            revelation_level: RevelationLevel::Moderate,
            stay_in_character: true,
            avoid_medical_jargon: true,
            provide_feedback: true,
            custom_instructions: String::new(),
        }
    }
}

/// Render the system prompt for a structured profile. Pure and
/// deterministic; a section is emitted only when its source field is
/// non-empty.
pub fn compile(profile: &StructuredProfile) -> String {
    let mut sections: Vec<String> = Vec::new();

    // Patient profile section
    if !profile.demographics.is_empty() {
        sections.push(format!("**Demographics:** {}", profile.demographics));
    }

    if !profile.chief_complaint.is_empty() {
        sections.push(format!("**Chief Complaint:** \"{}\"", profile.chief_complaint));
    }

    if !profile.medical_history.is_empty() {
        sections.push(format!("**Medical History:** {}", profile.medical_history));
    }

    if !profile.medications.is_empty() {
        sections.push(format!("**Current Medications:** {}", profile.medications));
    }

    if !profile.social_history.is_empty() {
        sections.push(format!("**Social History:** {}", profile.social_history));
    }

    if !profile.personality.is_empty() {
        sections.push(format!("**Personality:** {}", profile.personality));
    }

    // Clinical findings section
    if !profile.physical_findings.is_empty() {
        sections.push(format!(
            "\n**Physical/Neurological Findings:**\n{}",
            profile.physical_findings
        ));
    }

    if !profile.additional_symptoms.is_empty() {
        sections.push(format!(
            "**Additional Symptoms:**\n{}",
            profile.additional_symptoms
        ));
    }

    // Behavior instructions
    let mut behavior_instructions: Vec<&str> = Vec::new();

    match profile.revelation_level {
        RevelationLevel::Forthcoming => {
            behavior_instructions.push(
                "Provide detailed information readily when asked. Be open and communicative about symptoms and concerns.",
            );
        }
        RevelationLevel::Reserved => {
            behavior_instructions.push(
                "Only reveal information when directly asked specific questions. Provide brief, minimal responses initially. Require follow-up questions to elaborate on symptoms.",
            );
        }
        RevelationLevel::Moderate => {
            behavior_instructions.push(
                "Provide concise responses initially. Offer more details when asked follow-up questions. Balance between being helpful and realistic.",
            );
        }
    }

    if profile.stay_in_character {
        behavior_instructions.push("Stay in character at all times throughout the encounter.");
        behavior_instructions
            .push("Respond only as the patient would, not as a medical professional.");
    }

    if profile.avoid_medical_jargon {
        behavior_instructions.push(
            "Avoid using medical jargon unless it's plausible the patient has been told it by a doctor.",
        );
        behavior_instructions
            .push("Express confusion if asked about technical medical terms you wouldn't know.");
        behavior_instructions
            .push("Ask the student to explain or clarify medical terms you don't understand.");
    }

    behavior_instructions.push("Be consistent with your medical history and symptoms.");
    behavior_instructions.push(
        "If asked about symptoms not in your profile, politely indicate you don't have those symptoms.",
    );
    behavior_instructions
        .push("Keep responses conversational and natural (1-3 sentences typically).");

    if profile.provide_feedback {
        behavior_instructions.push("\n**End of Encounter Feedback:**");
        behavior_instructions
            .push("If the user indicates the encounter is over, provide constructive feedback on:");
        behavior_instructions.push("- History taking");
        behavior_instructions.push("- Communication and interpersonal skills");
        behavior_instructions.push("- Clinical reasoning and decision making");
        behavior_instructions.push("- Explanation and patient education");
        behavior_instructions.push("- Professionalism");
        behavior_instructions.push("- Overall rating out of 10");
    }

    if !behavior_instructions.is_empty() {
        let numbered = behavior_instructions
            .iter()
            .enumerate()
            .map(|(idx, item)| format!("{}. {}", idx + 1, item))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("\n**Instructions for Interaction:**\n{numbered}"));
    }

    // Custom instructions, verbatim
    if !profile.custom_instructions.is_empty() {
        sections.push(format!(
            "\n**Additional Instructions:**\n{}",
            profile.custom_instructions
        ));
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_is_deterministic() {
        let profile = StructuredProfile {
            demographics: "55-year-old male".to_string(),
            chief_complaint: "tremor".to_string(),
            medications: "amlodipine 5 mg daily".to_string(),
            ..Default::default()
        };
        assert_eq!(compile(&profile), compile(&profile));
    }

    #[test]
    fn empty_fields_emit_no_sections() {
        let profile = StructuredProfile {
            demographics: "42-year-old female".to_string(),
            ..Default::default()
        };
        let prompt = compile(&profile);
        assert!(prompt.contains("**Demographics:** 42-year-old female"));
        assert!(!prompt.contains("**Current Medications:**"));
        assert!(!prompt.contains("**Chief Complaint:**"));
        assert!(!prompt.contains("**Social History:**"));
        assert!(!prompt.contains("**Additional Instructions:**"));
    }

    #[test]
    fn chief_complaint_is_quoted() {
        let profile = StructuredProfile {
            chief_complaint: "my hands are shaky".to_string(),
            ..Default::default()
        };
        assert!(compile(&profile).contains("**Chief Complaint:** \"my hands are shaky\""));
    }

    #[test]
    fn revelation_levels_map_to_distinct_paragraphs() {
        let mut profile = StructuredProfile::default();

        profile.revelation_level = RevelationLevel::Forthcoming;
        let forthcoming = compile(&profile);
        profile.revelation_level = RevelationLevel::Moderate;
        let moderate = compile(&profile);
        profile.revelation_level = RevelationLevel::Reserved;
        let reserved = compile(&profile);

        assert!(forthcoming.contains("Provide detailed information readily when asked."));
        assert!(moderate.contains("Provide concise responses initially."));
        assert!(reserved.contains("Only reveal information when directly asked specific questions."));
        assert_ne!(forthcoming, moderate);
        assert_ne!(moderate, reserved);
        assert_ne!(forthcoming, reserved);
    }

    #[test]
    fn unrecognized_level_parses_to_moderate_default() {
        let parsed: RevelationLevel = "chatty".parse().unwrap_or_default();
        assert_eq!(parsed, RevelationLevel::Moderate);
    }

    #[test]
    fn instruction_list_is_one_indexed_and_single_newline() {
        let profile = StructuredProfile::default();
        let prompt = compile(&profile);
        let instructions = prompt
            .split("**Instructions for Interaction:**\n")
            .nth(1)
            .expect("instructions block present");
        assert!(instructions.starts_with("1. "));
        assert!(instructions.contains("\n2. "));
    }

    #[test]
    fn feedback_block_only_when_enabled() {
        let mut profile = StructuredProfile::default();
        profile.provide_feedback = false;
        let without = compile(&profile);
        assert!(!without.contains("**End of Encounter Feedback:**"));
        assert!(!without.contains("Overall rating out of 10"));

        profile.provide_feedback = true;
        let with = compile(&profile);
        assert!(with.contains("**End of Encounter Feedback:**"));
        assert!(with.contains("- History taking"));
        assert!(with.contains("- Overall rating out of 10"));
    }

    #[test]
    fn reserved_stay_in_character_scenario_ordering() {
        // End-to-end ordering check for the reserved/no-jargon profile.
        let profile = StructuredProfile {
            demographics: "55-year-old male".to_string(),
            chief_complaint: "tremor".to_string(),
            revelation_level: RevelationLevel::Reserved,
            stay_in_character: true,
            avoid_medical_jargon: false,
            provide_feedback: false,
            ..Default::default()
        };
        let prompt = compile(&profile);

        let demo_pos = prompt.find("**Demographics:** 55-year-old male").unwrap();
        let complaint_pos = prompt.find("**Chief Complaint:** \"tremor\"").unwrap();
        let instructions_pos = prompt.find("**Instructions for Interaction:**").unwrap();
        assert!(demo_pos < complaint_pos && complaint_pos < instructions_pos);

        let instructions = &prompt[instructions_pos..];
        assert!(instructions.contains(
            "1. Only reveal information when directly asked specific questions. Provide brief, minimal responses initially. Require follow-up questions to elaborate on symptoms."
        ));
        assert!(
            instructions.contains("2. Stay in character at all times throughout the encounter.")
        );
        assert!(instructions.contains(
            "3. Respond only as the patient would, not as a medical professional."
        ));
        assert!(instructions.contains("4. Be consistent with your medical history and symptoms."));
        assert!(instructions
            .contains("6. Keep responses conversational and natural (1-3 sentences typically)."));
        assert!(!instructions.contains("jargon"));
        assert!(!instructions.contains("**End of Encounter Feedback:**"));
    }

    #[test]
    fn custom_instructions_appended_verbatim() {
        let profile = StructuredProfile {
            custom_instructions: "End the encounter if the student is rude.".to_string(),
            ..Default::default()
        };
        let prompt = compile(&profile);
        assert!(prompt.ends_with(
            "**Additional Instructions:**\nEnd the encounter if the student is rude."
        ));
    }
}
