//! 出题服务 - 业务能力层
//!
//! 负责按考纲规格出题入库，以及按归属查卷

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::infrastructure::ExamStore;
use crate::models::{ExamPaper, ExamRequest, Role};
use crate::services::llm_service::{ChatMessage, LlmService};

/// 出题使用的 token 预算
const GENERATE_MAX_TOKENS: u32 = 2000;

/// 出题服务
#[derive(Clone)]
pub struct ExamService {
    llm: LlmService,
    store: ExamStore,
}

impl ExamService {
    pub fn new(llm: LlmService, store: ExamStore) -> Self {
        Self { llm, store }
    }

    /// 按规格生成一份试卷并入库
    ///
    /// 单次尽力而为：解析失败不重新提问。
    ///
    /// # 参数
    /// - `request`: 出题规格（考试局、科目、学习目标等）
    ///
    /// # 返回
    /// 返回带存储 ID 的完整试卷
    pub async fn generate(&self, request: &ExamRequest) -> AppResult<ExamPaper> {
        // 未知角色直接拒绝，不静默放行
        let role = Role::from_str(&request.role)
            .ok_or_else(|| AppError::invalid_input(format!("未知角色: {}", request.role)))?;

        let prompt = build_generate_prompt(request);
        let messages = vec![ChatMessage::user(prompt)];

        let response_text = self.llm.complete(&messages, GENERATE_MAX_TOKENS).await?;

        let mut paper: ExamPaper = serde_json::from_str(&response_text)
            .map_err(|e| AppError::malformed(format!("试卷解析失败: {}", e), &response_text))?;

        // 按角色解析归属：教师卷挂班级，家长卷挂学生
        let (student_id, class_id) =
            role.resolve_owner(request.student_id.clone(), request.class_id.clone());
        paper.student_id = student_id;
        paper.class_id = class_id;
        paper.created_at = Some(Utc::now());

        let id = self.store.insert_exam(&paper).await?;
        paper.id = Some(id);

        info!("✓ 生成试卷成功，共 {} 题", paper.questions.len());

        Ok(paper)
    }

    /// 按角色与归属 ID 查找试卷
    ///
    /// teacher 必须带 class_id，parent 必须带 student_id
    pub async fn lookup(
        &self,
        role: &str,
        student_id: Option<&str>,
        class_id: Option<&str>,
    ) -> AppResult<ExamPaper> {
        let (owner_field, owner_id) = resolve_lookup_owner(role, student_id, class_id)?;

        debug!("按 {} = {} 查找试卷", owner_field, owner_id);

        self.store
            .find_exam_by_owner(owner_field, owner_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("没有找到 {} = {} 的试卷", owner_field, owner_id))
            })
    }
}

/// 校验角色并确定归属查询字段
///
/// teacher 按 class_id 查，parent 按 student_id 查，缺失或角色未知都报参数错误
fn resolve_lookup_owner<'a>(
    role: &str,
    student_id: Option<&'a str>,
    class_id: Option<&'a str>,
) -> AppResult<(&'static str, &'a str)> {
    match Role::from_str(role) {
        Some(Role::Teacher) => class_id
            .map(|id| ("class_id", id))
            .ok_or_else(|| AppError::invalid_input("teacher 角色必须提供 class_id")),
        Some(Role::Parent) => student_id
            .map(|id| ("student_id", id))
            .ok_or_else(|| AppError::invalid_input("parent 角色必须提供 student_id")),
        None => Err(AppError::invalid_input(format!("未知角色: {}", role))),
    }
}

/// 构建出题提示词
///
/// 未提供考试时长 / 总分时整行省略，不渲染空值
fn build_generate_prompt(request: &ExamRequest) -> String {
    let mut optional_lines = String::new();
    if let Some(exam_length) = request.exam_length {
        optional_lines.push_str(&format!(
            "    - Examination Length: {} minutes\n",
            exam_length
        ));
    }
    if let Some(total_marks) = request.total_marks {
        optional_lines.push_str(&format!("    - Total Marks: {}\n", total_marks));
    }

    format!(
        r#"
    Generate {num_questions} examination-style questions for the following specifications:
    - Examination Board: {exam_board}
    - Country: {country}
    - Subject: {subject}
    - Learning Objectives: {objectives}
    - Number of Questions: {num_questions}
{optional_lines}
    Requirements:
    1. Questions should follow the {exam_board} examination board style and specifications.
    2. Questions can be nested (e.g., 1(a)i, 1(a)ii, 1(b), etc.) as per board expectations.
    3. All questions should be answerable by typing only.
    4. Provide a detailed mark scheme for each question.
    5. Clearly indicate the number of marks for each question or sub-question.
    6. Map each question to the relevant learning objective(s).
    7. Ensure questions and subquestions are unique.
    8. For the mark scheme, ensure you allocate marks for working out or process.
    9. Use proper mathematical notation for fractions, equations, powers, square roots, etc.

    Format the output as a JSON object with the following structure:
    {{
        "questions": [
            {{
                "number": "1",
                "text": "Question text",
                "marks": 5,
                "learning_objectives": ["Objective 1", "Objective 2"],
                "mark_scheme": "Detailed mark scheme"
            }},
            ...
        ]
    }}
    "#,
        num_questions = request.num_questions,
        exam_board = request.exam_board,
        country = request.country,
        subject = request.subject,
        objectives = request.learning_objectives.join(", "),
        optional_lines = optional_lines,
    )
}
