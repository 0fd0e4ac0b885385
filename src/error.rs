use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// 应用程序错误类型
///
/// 每个变体对应一类对调用方可区分的失败，错误不在内部吞掉或重试
#[derive(Debug)]
pub enum AppError {
    /// 请求参数无效（角色、归属 ID 等）
    InvalidInput { message: String },
    /// 上游补全 API 不可用（网络失败、非 2xx、超时）
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// 补全返回内容无法解析（附带原始响应文本便于排查）
    MalformedResponse { message: String, raw: String },
    /// 查询无结果
    NotFound { message: String },
    /// 其他内部错误（存储、序列化等）
    Internal {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput { message } => write!(f, "参数错误: {}", message),
            AppError::Upstream { message, source } => match source {
                Some(source) => write!(f, "上游API错误: {}: {}", message, source),
                None => write!(f, "上游API错误: {}", message),
            },
            AppError::MalformedResponse { message, raw } => {
                write!(f, "响应解析失败: {} - 原始响应: {}", message, raw)
            }
            AppError::NotFound { message } => write!(f, "未找到: {}", message),
            AppError::Internal { message, source } => match source {
                Some(source) => write!(f, "内部错误: {}: {}", message, source),
                None => write!(f, "内部错误: {}", message),
            },
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Upstream { source, .. } | AppError::Internal { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建参数错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            message: message.into(),
        }
    }

    /// 创建上游错误（带底层原因）
    pub fn upstream(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Upstream {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// 创建上游错误（非 2xx 状态，无底层错误对象）
    pub fn upstream_status(message: impl Into<String>) -> Self {
        AppError::Upstream {
            message: message.into(),
            source: None,
        }
    }

    /// 创建响应解析错误，附带原始响应文本
    pub fn malformed(message: impl Into<String>, raw: impl Into<String>) -> Self {
        AppError::MalformedResponse {
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// 创建查询无结果错误
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Internal {
            message: "存储操作失败".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::Internal {
            message: "BSON 序列化失败".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::Internal {
            message: "BSON 反序列化失败".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ========== HTTP 响应映射 ==========

impl AppError {
    /// 对外的错误种类标识
    fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput { .. } => "invalid_input",
            AppError::Upstream { .. } => "upstream_unavailable",
            AppError::MalformedResponse { .. } => "response_malformed",
            AppError::NotFound { .. } => "not_found",
            AppError::Internal { .. } => "internal",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } | AppError::MalformedResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.kind(),
            "detail": self.to_string(),
        }));
        (self.status_code(), body).into_response()
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::invalid_input("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::upstream_status("x").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::malformed("x", "raw").status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    /// 解析错误的展示信息必须带上原始响应文本
    #[test]
    fn test_malformed_display_includes_raw() {
        let err = AppError::malformed("不是 JSON", "plain text body");
        assert!(err.to_string().contains("plain text body"));
    }
}
