pub mod chat;
pub mod daily_routine;
pub mod medical_history;
pub mod pdf_extract;

pub use chat::{ensure_system_prompt, respond};
pub use daily_routine::{assemble_onboarding, generate_daily_routine_report};
pub use medical_history::{analyze_medical_history, assemble_history};
pub use pdf_extract::{extract_text, extract_text_blocking, translate_document};
