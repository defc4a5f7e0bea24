//! Grounding prompt, context assembly, and the refusal sentence.
//!
//! The template instructs the model to answer only from the supplied
//! context, to reply with [`REFUSAL`] when the context lacks the answer, and
//! to never offer opinions. It cannot force compliance: the empty-context
//! case is handled structurally by the Answerer, which refuses without
//! calling the model.

use crate::models::ScoredResult;

/// The fixed answer used whenever no grounding context is available.
pub const REFUSAL: &str = "Não tenho informações necessárias para responder sua pergunta.";

/// Separator placed between chunk contents in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

const CONTEXT_SLOT: &str = "{context}";
const QUESTION_SLOT: &str = "{question}";

/// Prompt template with `{context}` and `{question}` slots.
pub const PROMPT_TEMPLATE: &str = r#"CONTEXTO:
{context}

REGRAS:
- Responda somente com base no CONTEXTO.
- Se a informação não estiver explicitamente no CONTEXTO, responda:
  "Não tenho informações necessárias para responder sua pergunta."
- Nunca invente ou use conhecimento externo.
- Nunca produza opiniões ou interpretações além do que está escrito.

EXEMPLOS DE PERGUNTAS FORA DO CONTEXTO:
Pergunta: "Qual é a capital da França?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

Pergunta: "Quantos clientes temos em 2024?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

Pergunta: "Você acha isso bom ou ruim?"
Resposta: "Não tenho informações necessárias para responder sua pergunta."

PERGUNTA DO USUÁRIO:
{question}

RESPONDA A "PERGUNTA DO USUÁRIO""#;

/// Join the trimmed content of every result, in rank order.
///
/// Returns an empty string for an empty result set. Whitespace-only chunks
/// still contribute an empty part, so several of them join into bare
/// separators; callers decide emptiness from the chunks, not from this string.
pub fn build_context(results: &[ScoredResult]) -> String {
    results
        .iter()
        .map(|r| r.chunk.content.trim())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Substitute `context` and `question` into [`PROMPT_TEMPLATE`].
///
/// Substitution is a single pass over the template: inserted text is copied
/// verbatim, never escaped, and never scanned for further slots.
pub fn render_prompt(context: &str, question: &str) -> String {
    let mut out = String::with_capacity(PROMPT_TEMPLATE.len() + context.len() + question.len());
    let mut rest = PROMPT_TEMPLATE;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        if let Some(after) = tail.strip_prefix(CONTEXT_SLOT) {
            out.push_str(context);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(QUESTION_SLOT) {
            out.push_str(question);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chunk, Metadata};

    fn result(content: &str) -> ScoredResult {
        ScoredResult {
            chunk: Chunk {
                id: "doc-0".into(),
                content: content.into(),
                metadata: Metadata::new(),
            },
            score: 0.0,
        }
    }

    #[test]
    fn context_joins_trimmed_contents_in_order() {
        let ctx = build_context(&[result("  A \n"), result("\nB")]);
        assert_eq!(ctx, "A\n\n---\n\nB");
    }

    #[test]
    fn context_of_nothing_is_empty() {
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn whitespace_only_chunks_leave_only_separators() {
        assert_eq!(build_context(&[result("   ")]), "");
        let ctx = build_context(&[result("   "), result("\n\t")]);
        assert_eq!(ctx, CONTEXT_SEPARATOR);
        assert_eq!(ctx.trim(), "---");
    }

    #[test]
    fn prompt_substitution_is_bit_exact() {
        let prompt = render_prompt("A\n\n---\n\nB", "Q?");
        let expected = PROMPT_TEMPLATE
            .replace("{context}", "A\n\n---\n\nB")
            .replace("{question}", "Q?");
        assert_eq!(prompt, expected);
        assert!(prompt.starts_with("CONTEXTO:\nA\n\n---\n\nB\n\nREGRAS:\n"));
        assert!(prompt.contains("PERGUNTA DO USUÁRIO:\nQ?\n\nRESPONDA A \"PERGUNTA DO USUÁRIO\""));
        assert!(prompt.contains(
            "- Se a informação não estiver explicitamente no CONTEXTO, responda:\n  \"Não tenho informações necessárias para responder sua pergunta.\"\n"
        ));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{question}"));
    }

    #[test]
    fn substituted_text_is_not_rescanned_or_escaped() {
        let prompt = render_prompt("see {question} and {braces} \"quoted\"", "{context}?");
        assert!(prompt.contains("CONTEXTO:\nsee {question} and {braces} \"quoted\"\n"));
        assert!(prompt.contains("PERGUNTA DO USUÁRIO:\n{context}?\n"));
    }

    #[test]
    fn template_has_three_refusal_examples() {
        assert_eq!(PROMPT_TEMPLATE.matches("Resposta: \"").count(), 3);
        assert_eq!(PROMPT_TEMPLATE.matches(REFUSAL).count(), 4);
    }
}
