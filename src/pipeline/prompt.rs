//! Context assembly and prompt template

use crate::types::ScoredChunk;

/// Context handed to the model when retrieval found nothing
pub const NO_CONTEXT_PLACEHOLDER: &str = "No relevant context was found in the indexed documents.";

/// Join evidence texts with blank lines, best first
pub fn assemble_context(evidence: &[ScoredChunk]) -> String {
    if evidence.is_empty() {
        return NO_CONTEXT_PLACEHOLDER.to_string();
    }
    evidence
        .iter()
        .map(ScoredChunk::text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Grounded-answer prompt
pub fn build_prompt(query: &str, context: &str) -> String {
    format!(
        "\nUse ONLY the following context to answer.\n\
         If missing, say: \"Not available in documents.\"\n\
         \n\
         Question:\n\
         {query}\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Answer:\n"
    )
}
