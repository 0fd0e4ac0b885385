//! 整卷批改服务 - 业务能力层
//!
//! 按题目逐一调用阅卷服务，汇总总分与各学习目标的得分情况

use std::collections::BTreeMap;

use chrono::Utc;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{info, warn};

use crate::error::AppResult;
use crate::infrastructure::ExamStore;
use crate::models::{
    ExamResult, MarkRequest, ObjectivePerformance, ProcessExamRequest, Question,
    StudentResponseRecord,
};
use crate::services::marking_service::MarkingService;

/// 整卷批改服务
#[derive(Clone)]
pub struct ResultService {
    marking: MarkingService,
    store: ExamStore,
    /// 同时进行的阅卷数量上限
    max_concurrent: usize,
}

impl ResultService {
    pub fn new(marking: MarkingService, store: ExamStore, max_concurrent: usize) -> Self {
        Self {
            marking,
            store,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// 批改整卷并按学习目标汇总
    ///
    /// 题目与作答按位置配对，取较短一侧：多余作答忽略，未作答题目
    /// 不计入分子也不计入分母。任一题阅卷失败则整卷失败，不保留部分结果。
    ///
    /// # 参数
    /// - `request`: 试卷、按序作答列表与学生信息
    ///
    /// # 返回
    /// 返回带存储 ID 的整卷批改结果
    pub async fn process(&self, request: &ProcessExamRequest) -> AppResult<ExamResult> {
        let questions = &request.exam_questions.questions;

        info!(
            "开始整卷批改，共 {} 题，{} 份作答",
            questions.len(),
            request.student_responses.len()
        );

        if questions.len() != request.student_responses.len() {
            warn!(
                "题目数与作答数不一致（{} / {}），按较短一侧配对",
                questions.len(),
                request.student_responses.len()
            );
        }

        let mark_requests: Vec<MarkRequest> = questions
            .iter()
            .zip(request.student_responses.iter())
            .map(|(question, response)| MarkRequest {
                question: question.clone(),
                student_response: response.clone(),
                student_name: request.student_name.clone(),
                student_id: request.student_id.clone(),
                class_id: request.class_id.clone(),
            })
            .collect();

        // buffered 限并发且保持入参顺序，汇总结果与串行批改一致
        let records: Vec<StudentResponseRecord> = stream::iter(mark_requests)
            .map(|mark_request| {
                let marking = self.marking.clone();
                async move { marking.mark(&mark_request).await }
            })
            .buffered(self.max_concurrent)
            .try_collect()
            .await?;

        let mut result = accumulate_results(questions, &records);
        result.student_name = request.student_name.clone();
        result.student_id = request.student_id.clone();
        result.class_id = request.class_id.clone();
        result.created_at = Some(Utc::now());

        let id = self.store.insert_exam_result(&result).await?;
        result.id = Some(id);

        info!("✓ 整卷批改完成，总分 {}", result.total_marks);

        Ok(result)
    }
}

/// 按题目顺序汇总阅卷记录
///
/// 学习目标累加器覆盖全部题目的目标：只出现在未作答题目上的目标
/// 保持 0/0，百分比在分母为 0 时恒为 0
fn accumulate_results(questions: &[Question], records: &[StudentResponseRecord]) -> ExamResult {
    let mut marks_per_objective: BTreeMap<String, u32> = BTreeMap::new();
    let mut total_per_objective: BTreeMap<String, u32> = BTreeMap::new();
    for question in questions {
        for objective in &question.learning_objectives {
            marks_per_objective.entry(objective.clone()).or_insert(0);
            total_per_objective.entry(objective.clone()).or_insert(0);
        }
    }

    let mut total_marks = 0u32;
    let mut results_per_question = BTreeMap::new();

    for record in records {
        total_marks += record.marks_awarded;
        results_per_question.insert(record.question.number.clone(), record.clone());

        for objective in &record.question.learning_objectives {
            *marks_per_objective.entry(objective.clone()).or_insert(0) += record.marks_awarded;
            *total_per_objective.entry(objective.clone()).or_insert(0) += record.question.marks;
        }
    }

    let performance_per_objective = marks_per_objective
        .iter()
        .map(|(objective, &raw_score)| {
            let total_available = total_per_objective.get(objective).copied().unwrap_or(0);
            let percentage = if total_available > 0 {
                f64::from(raw_score) / f64::from(total_available) * 100.0
            } else {
                0.0
            };
            (
                objective.clone(),
                ObjectivePerformance {
                    raw_score,
                    total_available,
                    percentage,
                },
            )
        })
        .collect();

    ExamResult {
        id: None,
        student_name: String::new(),
        student_id: None,
        class_id: None,
        total_marks,
        results_per_question,
        performance_per_objective,
        created_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(number: &str, objectives: &[&str], marks: u32) -> Question {
        Question {
            number: number.to_string(),
            text: format!("question {}", number),
            marks,
            learning_objectives: objectives.iter().map(|o| o.to_string()).collect(),
            mark_scheme: "scheme".to_string(),
        }
    }

    fn record(question: &Question, marks_awarded: u32) -> StudentResponseRecord {
        StudentResponseRecord {
            id: None,
            student_name: "Ali".to_string(),
            student_id: None,
            class_id: None,
            question: question.clone(),
            student_response: "answer".to_string(),
            marks_awarded,
            feedback: "feedback".to_string(),
            justification: "justification".to_string(),
            created_at: None,
        }
    }

    /// 两题同目标，得分 3 + 4：总分 7，目标 7/10，70%
    #[test]
    fn test_accumulate_single_objective() {
        let questions = vec![
            question("1", &["Algebra"], 5),
            question("2", &["Algebra"], 5),
        ];
        let records = vec![record(&questions[0], 3), record(&questions[1], 4)];

        let result = accumulate_results(&questions, &records);

        assert_eq!(result.total_marks, 7);
        assert_eq!(result.results_per_question.len(), 2);

        let algebra = &result.performance_per_objective["Algebra"];
        assert_eq!(algebra.raw_score, 7);
        assert_eq!(algebra.total_available, 10);
        assert!((algebra.percentage - 70.0).abs() < f64::EPSILON);
    }

    /// 三题只有两份作答：第三题既不进分子也不进分母
    #[test]
    fn test_accumulate_truncated_pairing() {
        let questions = vec![
            question("1", &["Algebra"], 5),
            question("2", &["Algebra"], 5),
            question("3", &["Algebra"], 5),
        ];
        let records = vec![record(&questions[0], 2), record(&questions[1], 5)];

        let result = accumulate_results(&questions, &records);

        assert_eq!(result.total_marks, 7);
        assert_eq!(result.results_per_question.len(), 2);
        assert!(!result.results_per_question.contains_key("3"));

        let algebra = &result.performance_per_objective["Algebra"];
        assert_eq!(algebra.raw_score, 7);
        assert_eq!(algebra.total_available, 10);
    }

    /// 只出现在未作答题目上的目标保持 0/0，百分比为 0 而不是除零错误
    #[test]
    fn test_accumulate_zero_denominator_guard() {
        let questions = vec![
            question("1", &["Algebra"], 5),
            question("2", &["Geometry"], 5),
        ];
        let records = vec![record(&questions[0], 4)];

        let result = accumulate_results(&questions, &records);

        let geometry = &result.performance_per_objective["Geometry"];
        assert_eq!(geometry.raw_score, 0);
        assert_eq!(geometry.total_available, 0);
        assert_eq!(geometry.percentage, 0.0);
    }

    /// 一题挂多个目标时，得分计入每个目标
    #[test]
    fn test_accumulate_multiple_objectives_per_question() {
        let questions = vec![question("1", &["Algebra", "Geometry"], 6)];
        let records = vec![record(&questions[0], 3)];

        let result = accumulate_results(&questions, &records);

        assert_eq!(result.total_marks, 3);
        for objective in ["Algebra", "Geometry"] {
            let perf = &result.performance_per_objective[objective];
            assert_eq!(perf.raw_score, 3);
            assert_eq!(perf.total_available, 6);
            assert!((perf.percentage - 50.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_accumulate_empty_exam() {
        let result = accumulate_results(&[], &[]);
        assert_eq!(result.total_marks, 0);
        assert!(result.results_per_question.is_empty());
        assert!(result.performance_per_objective.is_empty());
    }
}
