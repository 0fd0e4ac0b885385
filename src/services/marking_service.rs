//! 阅卷服务 - 业务能力层
//!
//! 只处理单个题目的阅卷，不关心整卷流程

use chrono::Utc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::infrastructure::ExamStore;
use crate::models::{MarkRequest, MarkingVerdict, Question, StudentResponseRecord};
use crate::services::llm_service::{ChatMessage, LlmService};

/// 阅卷使用的 token 预算
const MARK_MAX_TOKENS: u32 = 1000;

/// 阅卷服务
#[derive(Clone)]
pub struct MarkingService {
    llm: LlmService,
    store: ExamStore,
}

impl MarkingService {
    pub fn new(llm: LlmService, store: ExamStore) -> Self {
        Self { llm, store }
    }

    /// 批改一份学生作答并入库
    ///
    /// 给分以模型结论为准，服务端不与题目满分做校验。
    ///
    /// # 参数
    /// - `request`: 题目、学生作答与学生信息
    ///
    /// # 返回
    /// 返回带存储 ID 的作答记录
    pub async fn mark(&self, request: &MarkRequest) -> AppResult<StudentResponseRecord> {
        let prompt = build_mark_prompt(
            &request.question,
            &request.student_response,
            &request.student_name,
        );
        let messages = vec![ChatMessage::user(prompt)];

        let response_text = self.llm.complete(&messages, MARK_MAX_TOKENS).await?;

        let verdict: MarkingVerdict = serde_json::from_str(&response_text)
            .map_err(|e| AppError::malformed(format!("阅卷结论解析失败: {}", e), &response_text))?;

        let mut record = StudentResponseRecord {
            id: None,
            student_name: request.student_name.clone(),
            student_id: request.student_id.clone(),
            class_id: request.class_id.clone(),
            question: request.question.clone(),
            student_response: request.student_response.clone(),
            marks_awarded: verdict.marks_awarded,
            feedback: verdict.feedback,
            justification: verdict.justification,
            created_at: Some(Utc::now()),
        };

        let id = self.store.insert_student_response(&record).await?;
        record.id = Some(id);

        info!(
            "✓ 阅卷完成，题号 {}，得分 {}/{}",
            record.question.number, record.marks_awarded, record.question.marks
        );

        Ok(record)
    }
}

/// 构建阅卷提示词
fn build_mark_prompt(question: &Question, student_response: &str, student_name: &str) -> String {
    format!(
        r#"
    Mark the following student response based on the given question and mark scheme. Never award marks for things like neatness and presentation:

    Student Name: {student_name}
    Question: {question_text}
    Marks available: {marks}
    Mark Scheme: {mark_scheme}

    Student Response: {student_response}

    Please provide:
    1. The marks awarded. Ensure that marks are awarded for only questions they are intended for
    2. Detailed examiner-style feedback, **provide only feedback**. **There never be any salutation e.g. dear ..., hi...**. You can address the student in second person speak using something like 'you'
    3. Justification for the marks given

    Format the output as a JSON object with the following structure:
    {{
        "marks_awarded": 0,
        "feedback": "Detailed feedback",
        "justification": "Justification for marks"
    }}
    "#,
        student_name = student_name,
        question_text = question.text,
        marks = question.marks,
        mark_scheme = question.mark_scheme,
        student_response = student_response,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            number: "1".to_string(),
            text: "Solve 2x = 8".to_string(),
            marks: 2,
            learning_objectives: vec!["Algebra".to_string()],
            mark_scheme: "1 mark for method, 1 mark for x = 4".to_string(),
        }
    }

    #[test]
    fn test_mark_prompt_embeds_question_and_response() {
        let prompt = build_mark_prompt(&sample_question(), "x = 4", "Ali");
        assert!(prompt.contains("Student Name: Ali"));
        assert!(prompt.contains("Question: Solve 2x = 8"));
        assert!(prompt.contains("Marks available: 2"));
        assert!(prompt.contains("Mark Scheme: 1 mark for method, 1 mark for x = 4"));
        assert!(prompt.contains("Student Response: x = 4"));
    }

    #[test]
    fn test_mark_prompt_requests_strict_json_shape() {
        let prompt = build_mark_prompt(&sample_question(), "x = 4", "Ali");
        assert!(prompt.contains("\"marks_awarded\""));
        assert!(prompt.contains("\"feedback\""));
        assert!(prompt.contains("\"justification\""));
        assert!(prompt.contains("Never award marks for things like neatness"));
    }
}
