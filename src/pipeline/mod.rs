//! End-to-end question answering
//!
//! [`KnowledgeBase`] owns the chunked corpus and its indexes;
//! [`RagPipeline::ask`] turns a query into an [`Answer`] backed by ranked
//! evidence.

mod knowledge_base;
mod orchestrator;
mod prompt;
mod validator;

pub use knowledge_base::KnowledgeBase;
pub use orchestrator::{Answer, AskOptions, GenerationOutcome, RagPipeline};
pub use prompt::{assemble_context, build_prompt, NO_CONTEXT_PLACEHOLDER};
pub use validator::{AnswerValidator, GroundingReport};
