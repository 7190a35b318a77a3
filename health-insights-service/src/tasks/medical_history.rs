use tracing::info;

use crate::llm::{GenerationParams, LlmError, LlmGateway};
use crate::models::MedicalHistoryRequest;

const MEDICAL_HISTORY_INSTRUCTION: &str = "You are a medical AI assistant. \
Below are the prior document analyses for one patient, each with the formatted report, \
its language and the accompanying message. Write a consolidated medical history report in English \
with these sections: Overview, Chronic Conditions, Past Findings, Medications and Treatments, \
Trends Over Time, and Recommended Follow-up. Maintain clinical accuracy, note conflicting findings \
explicitly, and do not invent information that is not present in the reports.";

/// Entries are joined with `"; "`, fields within an entry with `", "`.
pub fn assemble_history(data: &MedicalHistoryRequest) -> String {
    let analyses = data
        .analysis_list
        .iter()
        .map(|item| {
            format!(
                "Report: {}, Language: {}, Message: {}",
                item.llm_output, item.language, item.message
            )
        })
        .collect::<Vec<_>>()
        .join("; ");

    format!("Email: {}, {}", data.email, analyses)
}

pub async fn analyze_medical_history(
    gateway: &dyn LlmGateway,
    params: &GenerationParams,
    patient_data: &str,
) -> Result<String, LlmError> {
    let report = gateway
        .prompt(MEDICAL_HISTORY_INSTRUCTION, patient_data, params)
        .await?;
    info!(characters = report.len(), "Generated medical history report");
    Ok(report)
}
