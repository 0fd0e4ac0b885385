use serde::{Deserialize, Serialize};

/// 调用方角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 教师：试卷归属于班级
    Teacher,
    /// 家长：试卷归属于学生
    Parent,
}

impl Role {
    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Parent => "parent",
        }
    }

    /// 尝试从字符串解析角色（精确匹配）
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "teacher" => Some(Role::Teacher),
            "parent" => Some(Role::Parent),
            _ => None,
        }
    }

    /// 按角色解析试卷归属
    ///
    /// 教师卷只保留班级 ID，家长卷只保留学生 ID，另一侧强制置空
    pub fn resolve_owner(
        self,
        student_id: Option<String>,
        class_id: Option<String>,
    ) -> (Option<String>, Option<String>) {
        match self {
            Role::Teacher => (None, class_id),
            Role::Parent => (student_id, None),
        }
    }
}
