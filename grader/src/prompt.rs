//! Prompt construction for the grading model.
//!
//! [`build_prompt`] is a pure function: every grading attempt builds its own
//! [`GradingPrompt`] value from its context, with no shared template state.
//! The four segments mirror the conversation layout expected by the model
//! gateways: one system-role segment (the persona) followed by three
//! user-role segments (evaluation material, output schema, instructions).

use crate::context::GradingContext;

/// The four text segments sent to the grading model.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingPrompt {
    /// System-role persona instruction.
    pub role: String,
    /// Evaluation material: answer key, criteria, student answers.
    pub context: String,
    /// The grading task itself.
    pub instructions: String,
    /// A concrete example of the required output object.
    pub schema: String,
}

const ROLE_PROMPT: &str = "Tu es un enseignant précis, qui se concentre sur l'évaluation minutieuse \
des copies et la communication claire des erreurs et des points d'amélioration.";

const INSTRUCTION_PROMPT: &str = "\
Ton rôle est de corriger chaque réponse en fonction des critères suivants :
1. Analyse chaque réponse en fonction de la compréhension conceptuelle, l'exactitude des faits, et la clarté de l'explication.
2. Attribue une note précise pour chaque réponse, sans dépasser le maximum de points de la question.
3. Fournis des commentaires explicatifs détaillés sur chaque erreur, en insistant sur ce qui doit être corrigé et pourquoi.
4. Inclue un retour global qui indique clairement les domaines où l'étudiant doit s'améliorer.
5. Utilise un ton pédagogique.
6. Le retour doit être dans la langue des questions.
7. Le résultat doit être un JSON strict, sans texte explicatif supplémentaire.
8. Retourne uniquement un JSON conforme au format ci-dessous, sinon la réponse sera rejetée.";

/// Builds the four prompt segments for one grading attempt.
pub fn build_prompt(context: &GradingContext) -> GradingPrompt {
    let context_block = format!(
        ">>>>>>> SUPPORTS D'ÉVALUATION >>>>>>>

Voici les éléments dont tu disposes :

>>>>>>> CORRIGÉ DE L'ENSEIGNANT >>>>>>>
{}

>>>>>>> CRITÈRES DE CORRECTION >>>>>>>
{}

>>>>>>> RÉPONSES DE L'ÉTUDIANT >>>>>>>
{}",
        context.corrected_assessment, context.criteria, context.student_responses
    );

    let schema_block = format!(
        ">>>>>>> OUTPUT STRUCTURE >>>>>>>
La structure doit être respectée, quel que soit le nombre de questions à évaluer,
et le résultat doit être en format JSON strict.
Le JSON doit être structuré exactement comme ceci :
{}",
        schema_example()
    );

    GradingPrompt {
        role: ROLE_PROMPT.to_string(),
        context: context_block,
        instructions: INSTRUCTION_PROMPT.to_string(),
        schema: schema_block,
    }
}

/// A concrete example object shown to the model. The keys of `grading` are
/// the 1-based ordinals used in the context blocks, not question ids.
fn schema_example() -> String {
    let example = serde_json::json!({
        "advice": "Commentaire global ici. En t'adressant à l'étudiant, explique ce qu'il doit améliorer et pourquoi.",
        "grading": {
            "1": {
                "note": 2,
                "commentaires": "Bonne réponse, mais peut être améliorée en ajoutant plus de détails."
            },
            "2": {
                "note": 1.5,
                "commentaires": "Réponse partiellement correcte, mais manque de précision."
            }
        }
    });
    serde_json::to_string_pretty(&example).unwrap_or_else(|_| example.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AssembledQuestion, GradingContext};

    fn context() -> GradingContext {
        GradingContext::from_questions(&[AssembledQuestion {
            question_id: 1,
            question_text: "Citez un gaz noble.".into(),
            max_points: 5.0,
            reference_answer: "L'hélium".into(),
            student_answer: Some("Le néon".into()),
        }])
    }

    #[test]
    fn prompt_embeds_all_three_context_blocks() {
        let prompt = build_prompt(&context());
        assert!(prompt.context.contains("CORRIGÉ DE L'ENSEIGNANT"));
        assert!(prompt.context.contains("L'hélium"));
        assert!(prompt.context.contains("1 question(s)"));
        assert!(prompt.context.contains("Le néon"));
    }

    #[test]
    fn schema_segment_shows_the_expected_keys() {
        let prompt = build_prompt(&context());
        assert!(prompt.schema.contains("\"advice\""));
        assert!(prompt.schema.contains("\"grading\""));
        assert!(prompt.schema.contains("\"note\""));
        assert!(prompt.schema.contains("\"commentaires\""));
    }

    #[test]
    fn building_twice_yields_identical_prompts() {
        // No shared template state: the prompt is a pure function of context.
        assert_eq!(build_prompt(&context()), build_prompt(&context()));
    }
}
