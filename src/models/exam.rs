use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 出题请求（考纲规格）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamRequest {
    pub exam_board: String,
    pub country: String,
    pub subject: String,
    pub learning_objectives: Vec<String>,
    #[serde(default = "default_num_questions")]
    pub num_questions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_marks: Option<u32>,
    /// 调用方角色（teacher / parent），在服务层校验
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
}

fn default_num_questions() -> u32 {
    5
}

/// 单道试题
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// 题号，可能是层级形式（如 "1(a)i"）
    #[serde(deserialize_with = "deserialize_number")]
    pub number: String,
    pub text: String,
    pub marks: u32,
    /// 模型给出的学习目标原样接受，不校验是否在考纲列表里
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    pub mark_scheme: String,
}

/// 试卷文档
///
/// 只增不改：生成后写入，查询按归属字段读回，没有删除路径
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamPaper {
    /// 存储层分配的 ID，入库前为空
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// Helper：题号允许模型返回字符串或整数
fn deserialize_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer question number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(NumberVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_number_as_string() {
        let question: Question = serde_json::from_str(
            r#"{"number": "1(a)i", "text": "t", "marks": 3, "learning_objectives": ["O1"], "mark_scheme": "m"}"#,
        )
        .unwrap();
        assert_eq!(question.number, "1(a)i");
    }

    /// 模型偶尔把题号写成整数，也要能解析
    #[test]
    fn test_question_number_as_integer() {
        let question: Question = serde_json::from_str(
            r#"{"number": 2, "text": "t", "marks": 5, "mark_scheme": "m"}"#,
        )
        .unwrap();
        assert_eq!(question.number, "2");
        assert!(question.learning_objectives.is_empty());
    }

    /// 学习目标是模型给什么收什么，考纲之外的字符串不报错
    #[test]
    fn test_paper_accepts_extra_objectives() {
        let paper: ExamPaper = serde_json::from_str(
            r#"{
                "questions": [
                    {"number": "1", "text": "t", "marks": 4,
                     "learning_objectives": ["O1", "Something the model invented"],
                     "mark_scheme": "m"}
                ],
                "difficulty": "model-added field"
            }"#,
        )
        .unwrap();
        assert_eq!(paper.questions.len(), 1);
        assert_eq!(paper.questions[0].learning_objectives.len(), 2);
        assert!(paper.id.is_none());
    }

    /// 负数分值不是合法试题
    #[test]
    fn test_negative_marks_rejected() {
        let result: Result<Question, _> = serde_json::from_str(
            r#"{"number": "1", "text": "t", "marks": -2, "mark_scheme": "m"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_request_defaults_num_questions() {
        let request: ExamRequest = serde_json::from_str(
            r#"{
                "exam_board": "AQA",
                "country": "UK",
                "subject": "Maths",
                "learning_objectives": ["O1", "O2"],
                "role": "teacher",
                "class_id": "C1"
            }"#,
        )
        .unwrap();
        assert_eq!(request.num_questions, 5);
        assert_eq!(request.exam_length, None);
        assert_eq!(request.total_marks, None);
    }
}
