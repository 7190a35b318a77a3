use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingResponse {
    pub question: String,
    pub response: String,
}

/// Answers collected during app onboarding, source data for the daily routine report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingResponses {
    pub email: String,
    pub responses: Vec<OnboardingResponse>,
}

/// A previously produced document analysis, as returned by `/upload_pdf/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalAnalysis {
    #[serde(rename = "LLM_output")]
    pub llm_output: String,
    pub language: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalHistoryRequest {
    pub email: String,
    #[serde(rename = "analysisList")]
    pub analysis_list: Vec<MedicalAnalysis>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadPdfResponse {
    pub message: String,
    #[serde(rename = "LLM_output")]
    pub llm_output: String,
    pub language: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailyRoutineResponse {
    pub status: String,
    pub daily_routine_report: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MedicalHistoryResponse {
    pub status: String,
    pub medical_history_report: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
