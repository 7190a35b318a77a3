use tracing::info;

use crate::llm::{GenerationParams, LlmError, LlmGateway};
use crate::models::OnboardingResponses;

const DAILY_ROUTINE_INSTRUCTION: &str = "You are a health and wellness assistant. \
Using the onboarding answers below, write a personalised daily routine report for this user. \
Cover wake-up and sleep times, meals and hydration, physical activity, work or study blocks, \
breaks and stress management. Base every recommendation on the user's answers, keep it practical, \
and organise the report by time of day with short headed sections.";

/// `"Email: {email}, Question: {q1}, Response: {r1}, Question: {q2}, ..."` in input order.
///
/// Field values are not escaped; a comma inside a response reads like a separator.
pub fn assemble_onboarding(data: &OnboardingResponses) -> String {
    let responses = data
        .responses
        .iter()
        .map(|item| format!("Question: {}, Response: {}", item.question, item.response))
        .collect::<Vec<_>>()
        .join(", ");

    format!("Email: {}, {}", data.email, responses)
}

pub async fn generate_daily_routine_report(
    gateway: &dyn LlmGateway,
    params: &GenerationParams,
    user_data: &str,
) -> Result<String, LlmError> {
    let report = gateway
        .prompt(DAILY_ROUTINE_INSTRUCTION, user_data, params)
        .await?;
    info!(characters = report.len(), "Generated daily routine report");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::FakeGateway;
    use crate::models::OnboardingResponse;

    fn onboarding(pairs: &[(&str, &str)]) -> OnboardingResponses {
        OnboardingResponses {
            email: "a@b.com".to_string(),
            responses: pairs
                .iter()
                .map(|(question, response)| OnboardingResponse {
                    question: question.to_string(),
                    response: response.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn single_response() {
        assert_eq!(
            assemble_onboarding(&onboarding(&[("Q1", "R1")])),
            "Email: a@b.com, Question: Q1, Response: R1"
        );
    }

    #[test]
    fn responses_keep_input_order_and_duplicates() {
        let prompt = assemble_onboarding(&onboarding(&[
            ("Sleep?", "7h"),
            ("Sleep?", "8h"),
            ("Diet", "vegan, mostly"),
        ]));
        assert_eq!(
            prompt,
            "Email: a@b.com, Question: Sleep?, Response: 7h, Question: Sleep?, Response: 8h, \
             Question: Diet, Response: vegan, mostly"
        );
    }

    #[test]
    fn no_responses_leaves_trailing_separator() {
        assert_eq!(assemble_onboarding(&onboarding(&[])), "Email: a@b.com, ");
    }

    #[tokio::test]
    async fn report_prompt_is_instruction_then_user_data() {
        let gateway = FakeGateway::replying("07:00 wake up");
        let report = generate_daily_routine_report(
            &gateway,
            &GenerationParams::default(),
            "Email: a@b.com, Question: Q1, Response: R1",
        )
        .await
        .unwrap();
        assert_eq!(report, "07:00 wake up");

        let calls = gateway.calls();
        assert_eq!(
            calls[0][0].content,
            format!(
                "{}\n\nEmail: a@b.com, Question: Q1, Response: R1",
                DAILY_ROUTINE_INSTRUCTION
            )
        );
    }
}
