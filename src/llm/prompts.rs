//! Prompt templates sent to the model.

/// Prompt for one ATS scoring run.
pub fn scoring_prompt(resume_text: &str) -> String {
    format!(
        r#"You are an Applicant Tracking System (ATS) expert.
Analyze the following resume for ATS compatibility.

1. Give an ATS compatibility score from 0 to 100.
2. List the strengths of the resume.
3. List the weaknesses of the resume.

Respond in exactly this format and nothing else:
ATS Score: <number>%
Strengths:
- <strength>
Weaknesses:
- <weakness>

Resume:
{}"#,
        resume_text.trim()
    )
}

/// Prompt asking for three improvements given the aggregated findings.
pub fn suggestion_prompt(average_score: f64, findings: &str) -> String {
    format!(
        r#"A resume received an average ATS score of {:.2}%.
These strengths and weaknesses were identified:
{}

Suggest exactly three concrete improvements to raise the ATS score.
Respond in exactly this format and nothing else:
1. <suggestion>
2. <suggestion>
3. <suggestion>"#,
        average_score, findings
    )
}
