//! Prompt templates for journal refinement, empathetic summaries, hosted analysis and the companion chat.

pub mod companion;
pub mod hosted_analysis;
pub mod journal;

pub use companion::{companion_user_prompt, COMPANION_SYSTEM};
pub use hosted_analysis::{hosted_analysis_prompt, HOSTED_ANALYSIS_TEMPLATE};
pub use journal::{
    emotional_summary_prompt, neutral_summary_prompt, refine_prompt, EMOTIONAL_SUMMARY_TEMPLATE,
    NEUTRAL_SUMMARY_TEMPLATE, REFINE_TEMPLATE,
};
