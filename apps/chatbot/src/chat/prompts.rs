// Prompt text for the Q&A bot.

use crate::storage::ReferenceDocuments;

/// Persona and tone rules. Replace `{subject}` before sending.
const PERSONA_TEMPLATE: &str = "You are a chatbot that provides insights into {subject}'s \
    professional background. Respond in a natural, friendly way. \
    Use correct grammar and punctuation.\n\
    Reference the following data but do not explicitly mention that they come from stored files.";

/// Builds the system instruction: persona, both documents, then the query.
/// `query` must already be trimmed.
pub fn build_system_prompt(subject: &str, docs: &ReferenceDocuments, query: &str) -> String {
    let persona = PERSONA_TEMPLATE.replace("{subject}", subject);
    format!(
        "{persona}\n\nResume:\n{resume}\n\nLife Notes:\n{life_notes}\n\nUser Query: {query}",
        resume = docs.resume,
        life_notes = docs.life_notes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> ReferenceDocuments {
        ReferenceDocuments {
            resume: "Staff Engineer at Acme, 2019-2024".to_string(),
            life_notes: "{\"hometown\": \"Boston\"}".to_string(),
        }
    }

    #[test]
    fn test_prompt_embeds_documents_and_query_in_order() {
        let prompt = build_system_prompt("Ryan Pierce", &docs(), "Where did Ryan work?");
        let persona = prompt.find("Ryan Pierce's professional background").unwrap();
        let resume = prompt.find("Resume:\nStaff Engineer at Acme").unwrap();
        let notes = prompt.find("Life Notes:\n{\"hometown\": \"Boston\"}").unwrap();
        let query = prompt.find("User Query: Where did Ryan work?").unwrap();
        assert!(persona < resume && resume < notes && notes < query);
    }

    #[test]
    fn test_prompt_hides_file_provenance_and_sets_tone() {
        let prompt = build_system_prompt("Ryan Pierce", &docs(), "hi");
        assert!(prompt.contains("do not explicitly mention that they come from stored files"));
        assert!(prompt.contains("natural, friendly way"));
        assert!(prompt.contains("correct grammar and punctuation"));
    }

    #[test]
    fn test_document_text_is_not_reinterpreted_as_placeholders() {
        let tricky = ReferenceDocuments {
            resume: "uses {subject} literally".to_string(),
            life_notes: "notes".to_string(),
        };
        let prompt = build_system_prompt("Ryan Pierce", &tricky, "q");
        assert!(prompt.contains("uses {subject} literally"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(
            build_system_prompt("Ryan Pierce", &docs(), "q"),
            build_system_prompt("Ryan Pierce", &docs(), "q")
        );
    }
}
