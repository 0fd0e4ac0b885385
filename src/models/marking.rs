use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::exam::{ExamPaper, Question};

/// 单题阅卷请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkRequest {
    pub question: Question,
    pub student_response: String,
    pub student_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
}

/// LLM 返回的阅卷结论
///
/// 给分不与题目满分做校验，以模型结论为准
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkingVerdict {
    /// 模型漏给分时按 0 分处理，绝不为 null
    #[serde(default)]
    pub marks_awarded: u32,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub justification: String,
}

/// 入库的学生作答记录（题目 + 原始作答 + 阅卷结论）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentResponseRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub student_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub question: Question,
    pub student_response: String,
    pub marks_awarded: u32,
    pub feedback: String,
    pub justification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// 整卷批改请求
///
/// 作答列表与试卷题目按位置对齐
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessExamRequest {
    pub exam_questions: ExamPaper,
    pub student_responses: Vec<String>,
    pub student_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
}

/// 单个学习目标的得分情况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectivePerformance {
    pub raw_score: u32,
    pub total_available: u32,
    /// 百分比；total_available 为 0 时恒为 0
    pub percentage: f64,
}

/// 整卷批改结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResult {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub student_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub total_marks: u32,
    /// 题号 → 该题的阅卷记录
    pub results_per_question: BTreeMap<String, StudentResponseRecord>,
    /// 学习目标 → 得分情况
    pub performance_per_objective: BTreeMap<String, ObjectivePerformance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 模型漏掉 marks_awarded 时默认为 0，不会是 null
    #[test]
    fn test_verdict_defaults_missing_marks_to_zero() {
        let verdict: MarkingVerdict =
            serde_json::from_str(r#"{"feedback": "f", "justification": "j"}"#).unwrap();
        assert_eq!(verdict.marks_awarded, 0);
    }

    #[test]
    fn test_verdict_full_shape() {
        let verdict: MarkingVerdict = serde_json::from_str(
            r#"{"marks_awarded": 4, "feedback": "f", "justification": "j"}"#,
        )
        .unwrap();
        assert_eq!(verdict.marks_awarded, 4);
        assert_eq!(verdict.feedback, "f");
        assert_eq!(verdict.justification, "j");
    }

    #[test]
    fn test_verdict_defaults_missing_text_fields() {
        let verdict: MarkingVerdict = serde_json::from_str(r#"{"marks_awarded": 2}"#).unwrap();
        assert_eq!(verdict.feedback, "");
        assert_eq!(verdict.justification, "");
    }
}
