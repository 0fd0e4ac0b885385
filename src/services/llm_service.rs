//! LLM 补全服务 - 业务能力层
//!
//! 只负责"调用补全 API 拿回文本"这一件事，不关心提示词内容
//!
//! ## 技术栈
//! - 使用 reqwest 直接调用 chat/completions 接口
//! - 保留原始响应文本，解析失败时附带返回便于排查
//! - 单次阻塞往返：不重试、不流式

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::utils::format_math_expression;

/// 采样温度固定不变
const TEMPERATURE: f64 = 0.7;

/// 聊天消息
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// 构造用户消息（本系统只会用到这一种角色）
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// LLM 补全服务
#[derive(Clone)]
pub struct LlmService {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl LlmService {
    /// 创建新的补全服务
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.llm_endpoint.clone(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model_name.clone(),
            timeout: Duration::from_secs(config.llm_timeout_secs),
        }
    }

    /// 调用补全 API
    ///
    /// 返回的文本已经过数学符号格式化。
    ///
    /// # 参数
    /// - `messages`: 消息列表
    /// - `max_tokens`: 输出 token 预算
    ///
    /// # 返回
    /// 返回补全的文本内容
    pub async fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> AppResult<String> {
        debug!("调用补全 API，模型: {}，max_tokens: {}", self.model, max_tokens);

        let body = ChatRequest {
            model: &self.model,
            messages,
            max_tokens,
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("补全 API 请求失败: {}", e);
                AppError::upstream("补全 API 请求失败", e)
            })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| AppError::upstream("读取补全响应失败", e))?;

        // 原始响应只做诊断用途
        debug!("补全 API 原始响应: {}", raw);

        if !status.is_success() {
            warn!("补全 API 返回非 2xx 状态: {}", status);
            return Err(AppError::upstream_status(format!(
                "补全 API 返回状态 {}",
                status
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&raw)
            .map_err(|e| AppError::malformed(format!("补全响应不是有效 JSON: {}", e), &raw))?;

        let content = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::malformed("补全响应缺少 choices", &raw))?;

        Ok(format_math_expression(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 请求体的固定字段：模型、温度、token 预算
    #[test]
    fn test_chat_request_body_shape() {
        let messages = vec![ChatMessage::user("hello")];
        let body = ChatRequest {
            model: "mistral-tiny",
            messages: &messages,
            max_tokens: 2000,
            temperature: TEMPERATURE,
        };

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&body).unwrap()).unwrap();
        assert_eq!(value["model"], "mistral-tiny");
        assert_eq!(value["max_tokens"], 2000);
        assert_eq!(value["temperature"], 0.7);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_chat_response_parsing() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "ok"}}], "usage": {}}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content, "ok");
    }

    /// 缺少 message.content 字段的响应应当解析失败
    #[test]
    fn test_chat_response_missing_content_fails() {
        let result: Result<ChatResponse, _> =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant"}}]}"#);
        assert!(result.is_err());
    }
}
