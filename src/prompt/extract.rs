// src/prompt/extract.rs
// Best-effort extraction of structured fields from a legacy free-text
// prompt. Heuristic on purpose: it exists to migrate old personas into
// the structured editor, not to invert the compiler. Never fails; an
// unmatched field keeps its default.

use regex::Regex;

use super::compiler::{RevelationLevel, StructuredProfile};

/// Parse a free-text prompt into structured fields.
pub fn extract(prompt: &str) -> StructuredProfile {
    let mut result = StructuredProfile::default();

    result.demographics = extract_after_label(prompt, "Demographics");
    result.chief_complaint = extract_after_label(prompt, "Chief Complaint");
    result.medical_history = extract_after_label(prompt, "Medical History");
    result.medications = first_non_empty(&[
        extract_after_label(prompt, "Current Medications"),
        extract_after_label(prompt, "Medications"),
    ]);
    result.social_history = extract_after_label(prompt, "Social History");
    result.personality = extract_after_label(prompt, "Personality");
    result.physical_findings = first_non_empty(&[
        extract_after_label(prompt, "Physical/Neurological Findings"),
        extract_after_label(prompt, "Neurological Findings"),
    ]);
    result.additional_symptoms = first_non_empty(&[
        extract_after_label(prompt, "Additional Symptoms"),
        extract_after_label(prompt, "Non-Motor Symptoms"),
    ]);

    // Revelation level from historical phrasings
    let lower = prompt.to_lowercase();
    if (lower.contains("brief") && lower.contains("minimal"))
        || lower.contains("only reveal information when directly asked")
    {
        result.revelation_level = RevelationLevel::Reserved;
    } else if lower.contains("detailed information readily")
        || lower.contains("open and communicative")
    {
        result.revelation_level = RevelationLevel::Forthcoming;
    } else {
        result.revelation_level = RevelationLevel::Moderate;
    }

    // Behavior flags from substring heuristics
    result.stay_in_character =
        lower.contains("stay in character") || lower.contains("maintain character");
    result.avoid_medical_jargon = lower.contains("avoid") && lower.contains("jargon");
    result.provide_feedback = lower.contains("feedback") || lower.contains("rating");

    // Custom instructions: everything after the Additional Instructions label
    let custom_re = Regex::new(r"(?is)\*\*Additional Instructions:\*\*\s*\n(.+)$")
        .expect("custom instructions pattern");
    if let Some(captures) = custom_re.captures(prompt) {
        result.custom_instructions = captures[1].trim().to_string();
    }

    result
}

/// Content after `**Label:**` up to the next label, blank line, or end of
/// text, with surrounding whitespace and a single pair of quotes removed.
fn extract_after_label(prompt: &str, label: &str) -> String {
    let pattern = format!(r"(?i)\*\*{}:\*\*", regex::escape(label));
    let label_re = Regex::new(&pattern).expect("label pattern");

    let Some(found) = label_re.find(prompt) else {
        return String::new();
    };

    let rest = &prompt[found.end()..];
    let Some(start) = rest.find(|c: char| !c.is_whitespace()) else {
        return String::new();
    };
    let body = &rest[start..];

    let mut end = body.len();
    for (idx, _) in body.match_indices('\n') {
        let tail = &body[idx..];
        if tail.starts_with("\n**") || tail.starts_with("\n\n") {
            end = idx;
            break;
        }
    }

    strip_quotes(body[..end].trim()).to_string()
}

/// Remove at most one leading and one trailing quote character.
fn strip_quotes(value: &str) -> &str {
    let value = value
        .strip_prefix('"')
        .or_else(|| value.strip_prefix('\''))
        .unwrap_or(value);
    value
        .strip_suffix('"')
        .or_else(|| value.strip_suffix('\''))
        .unwrap_or(value)
}

fn first_non_empty(candidates: &[String]) -> String {
    candidates
        .iter()
        .find(|c| !c.is_empty())
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::compile;

    #[test]
    fn extracts_labeled_fields_from_compiled_prompt() {
        let profile = StructuredProfile {
            demographics: "55-year-old retired principal".to_string(),
            chief_complaint: "my hands are shaky".to_string(),
            medications: "amlodipine 5 mg daily".to_string(),
            ..Default::default()
        };
        let parsed = extract(&compile(&profile));

        assert_eq!(parsed.demographics, "55-year-old retired principal");
        // Quotes added around the chief complaint are stripped again
        assert_eq!(parsed.chief_complaint, "my hands are shaky");
        assert_eq!(parsed.medications, "amlodipine 5 mg daily");
        assert_eq!(parsed.medical_history, "");
    }

    #[test]
    fn accepts_historical_label_spellings() {
        let prompt = "**Medications:** melatonin 3 mg\n\n**Neurological Findings:**\ncogwheel rigidity\n\n**Non-Motor Symptoms:**\nanosmia";
        let parsed = extract(prompt);
        assert_eq!(parsed.medications, "melatonin 3 mg");
        assert_eq!(parsed.physical_findings, "cogwheel rigidity");
        assert_eq!(parsed.additional_symptoms, "anosmia");
    }

    #[test]
    fn infers_revelation_level_and_flags() {
        let reserved = extract("Only reveal information when directly asked specific questions.");
        assert_eq!(reserved.revelation_level, RevelationLevel::Reserved);

        let forthcoming = extract("Be open and communicative about symptoms.");
        assert_eq!(forthcoming.revelation_level, RevelationLevel::Forthcoming);

        let plain = extract("A patient with a cough.");
        assert_eq!(plain.revelation_level, RevelationLevel::Moderate);
        assert!(!plain.stay_in_character);
        assert!(!plain.avoid_medical_jargon);
        assert!(!plain.provide_feedback);

        let flagged = extract(
            "Stay in character. Avoid medical jargon. Provide feedback with a rating out of 10.",
        );
        assert!(flagged.stay_in_character);
        assert!(flagged.avoid_medical_jargon);
        assert!(flagged.provide_feedback);
    }

    #[test]
    fn custom_instructions_capture_everything_after_the_label() {
        let prompt = "**Demographics:** 60-year-old\n\n**Additional Instructions:**\nDecline invasive procedures.\nEnd the encounter if pushed.";
        let parsed = extract(prompt);
        assert_eq!(
            parsed.custom_instructions,
            "Decline invasive procedures.\nEnd the encounter if pushed."
        );
    }

    #[test]
    fn never_fails_on_arbitrary_text() {
        for junk in ["", "***", "**Demographics:**", "no labels here", "\n\n\n"] {
            let parsed = extract(junk);
            assert_eq!(parsed.demographics, "");
        }
    }

    #[test]
    fn round_trip_holds_for_plain_structured_profiles() {
        // Not guaranteed in general (heuristics can misfire on custom
        // text containing label-like substrings), but plain profiles
        // should survive compile -> extract -> compile.
        let profile = StructuredProfile {
            demographics: "55-year-old male".to_string(),
            chief_complaint: "tremor".to_string(),
            medical_history: "hypertension".to_string(),
            revelation_level: RevelationLevel::Reserved,
            ..Default::default()
        };
        let once = compile(&profile);
        let again = compile(&extract(&once));
        assert_eq!(once, again);
    }
}
