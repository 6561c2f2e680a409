// All LLM prompt templates for the Interview module.

/// Question generation prompt template.
/// Replace: {job_description}, {cv_details}, {question_count}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"As an expert interviewer and AI assistant, your task is to generate a list of highly relevant, unique, and thought-provoking interview questions.
These questions must be specifically tailored to a candidate's CV in the context of the requirements for this role.

Instructions:
1. Analyze the provided 'Job Description' and 'Candidate CV' thoroughly.
2. Generate questions that directly relate the candidate's experiences, skills, and projects (as described in their CV) to the needs and responsibilities outlined for this position.
3. The difficulty level of the questions should match the seniority of the role.
4. Prioritize questions that cannot be answered with a simple 'yes' or 'no' and that encourage the candidate to elaborate on their experiences and problem-solving approaches.
5. Design the questions to flow logically and allow for follow-up discussion. Treat them as a sequence of probing inquiries rather than isolated points.
6. Even if the job requirements and candidate profile are identical to previous requests, generate a fresh set of questions each time. Consider different angles, deeper dives into specific projects, or behavioral questions based on the CV details.
7. Keep the questions professional and fair, focusing on the job's demands rather than referencing the 'job description document' directly.
8. Draft more questions than you need, then select {question_count} of them at random and discard the rest.

Job Description:
{job_description}

Candidate CV:
{cv_details}

Return the questions as a JSON array of strings."#;

/// Answer evaluation prompt template.
/// Replace: {job_title}, {interview_data}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an expert interviewer and AI assistant tasked with evaluating candidate responses to interview questions.
The candidate is being interviewed for the role of a **{job_title}**.
When evaluating, consider the expected level of knowledge, experience, and depth for a **{job_title}** role.
For junior roles, focus on foundational understanding and clarity. For senior roles, expect deeper insights, strategic thinking, and practical experience.

For each question and its corresponding answer, provide:
1. A concise summary of the answer.
2. A rating for the answer: "Excellent", "Good", "Average", "Below Average", or "Poor".
3. Consider the clarity, completeness, relevance, and depth of the answer relative to the demands of a {job_title} role when assigning a rating.
4. If an answer is empty or very short, say so in the summary and assign a "Poor" rating, unless the question legitimately admits a short answer (e.g. "Yes/No").

After evaluating each question, also provide an overall rating, a brief overall summary, a list of key strengths, and a list of specific areas for improvement for the candidate based on all their answers, again with the {job_title} role in mind.

Here are the questions and answers to evaluate:
{interview_data}

Return the evaluation as a JSON object with two properties:
- 'individualEvaluations': an array of objects, each with 'question', 'summary', and 'rating' properties.
- 'overallEvaluation': an object with 'summary', 'rating', 'strengths' (array of strings, each at most 100 characters), and 'areasForImprovement' (array of strings, each at most 100 characters).

Example format:
{
    "individualEvaluations": [
        {
            "question": "Question 1 text",
            "summary": "Summary of Answer 1",
            "rating": "Excellent"
        },
        {
            "question": "Question 2 text",
            "summary": "Summary of Answer 2",
            "rating": "Good"
        }
    ],
    "overallEvaluation": {
        "summary": "Overall assessment of the candidate's performance across all questions.",
        "rating": "Good",
        "strengths": [
            "Ability to articulate technical concepts",
            "Solid grasp of core concepts"
        ],
        "areasForImprovement": [
            "Expand on breadth of technical skills",
            "Could provide more specific examples"
        ]
    }
}"#;

/// Substitutes `{name}` placeholders in a single left-to-right pass.
///
/// Inserted values are never rescanned, so user text containing `{cv_details}`
/// or similar stays literal. Unknown `{...}` sequences are copied unchanged.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let matched = values.iter().find_map(|(name, value)| {
            after
                .strip_prefix(*name)
                .and_then(|tail| tail.strip_prefix('}'))
                .map(|tail| (*value, tail))
        });
        match matched {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
