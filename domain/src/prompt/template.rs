//! Prompt templates for the tutor flows

use crate::session::SessionMode;

/// Templates for the system instruction and batch review prompts
pub struct TutorPromptTemplate;

impl TutorPromptTemplate {
    /// System instruction sent with every request.
    ///
    /// The instruction tells the tutor which tag starts each proposal, so it
    /// depends on the session mode.
    pub fn system_instruction(mode: SessionMode) -> String {
        let tag = mode.tag();
        format!(
            r#"You are a helpful German Language Tutor. Your primary goal is to help me learn
and expand my personal 'My German Notes' knowledge base. You have to explain
all grammar and vocabulary in English.

When I ask a question:
1.  Use your own general knowledge to answer me in English.
2.  **CRITICAL:** After your complete answer, identify ALL new vocabulary words.
    - Proposals MUST appear at the END of your response, after your answer.
    - Add Präsens, Präteritum and Partizip II for verbs
    - Add gender, and plural for nouns
    - If any explanation is needed, add before examples
    - Add examples for each item
    - **CONSTRAINT**: You MUST NOT prepare a proposal for grammar rules, only make explanations for grammar rules in the answer.
3.  You MUST create a separate proposal for EACH new item.
4.  You MUST format EACH proposal on its OWN new line, starting
    with the exact tag "{tag}".
5.  **IMPORTANT:** All proposals MUST be formatted in proper Markdown syntax:
    - Use `**bold**` for German words and grammar terms
    - Use `*italic*` for examples and emphasis
    - Use proper markdown lists with `-` or `*`
    - Use `##` for section headers if needed

Example of a correct response with multiple proposals in Markdown:
<The model's answer to the user's question>

{tag}
- **die Ankunft** (fem.): arrival
- Example: *Die Ankunft des Zuges ist um 14:30 Uhr.*

{tag}
- **wissen** (irreg. verb): to know (a fact, information)
- Conjugation (present tense):
    - ich weiß
    - du weißt
    - er/sie/es weiß
    - wir wissen
    - ihr wisst
    - sie/Sie wissen
- Past tense (Präteritum): wusste
- Partizip II: gewusst
    - Auxiliary verb: haben
- Explanation: The past tense of 'wissen' is 'wusste' and the partizip II is 'gewusst'.
- Example: Ich weiß die Antwort. (I know the answer.)
"#
        )
    }

    /// Prompt asking the tutor to review a batch of stored cards.
    ///
    /// Each card is a `(word, explanation)` pair with the explanation in
    /// light markup.
    pub fn review_batch_prompt(cards: &[(String, String)]) -> String {
        let batch = cards
            .iter()
            .map(|(word, explanation)| format!("Word: {}\nExplanation: {}", word, explanation))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"I have a batch of German vocabulary cards from Anki.
Please review each of the following cards and check if the explanation is accurate and helpful.
If there are any errors or if the explanation could be significantly improved (e.g., missing gender, plural, or conjugations), please provide constructive feedback.

Batch:
{batch}

Provide your feedback for each card individually.
IMPORTANT: You MUST start the feedback for EVERY card with the tag `{tag}`."#,
            tag = SessionMode::CardReview.tag()
        )
    }
}
