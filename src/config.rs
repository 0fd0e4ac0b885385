/// 服务配置
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP 监听地址
    pub bind_addr: String,
    /// MongoDB 连接串
    pub mongo_uri: String,
    /// 数据库名称
    pub mongo_db: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_endpoint: String,
    pub llm_model_name: String,
    /// 单次补全请求的超时（秒）
    pub llm_timeout_secs: u64,
    /// 整卷批改时同时进行的阅卷数量
    pub max_concurrent_marking: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            mongo_uri: "mongodb://localhost:27017".to_string(),
            mongo_db: "test".to_string(),
            llm_api_key: String::new(),
            llm_endpoint: "https://api.mistral.ai/v1/chat/completions".to_string(),
            llm_model_name: "mistral-tiny".to_string(),
            llm_timeout_secs: 60,
            max_concurrent_marking: 4,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(default.bind_addr),
            mongo_uri: std::env::var("MONGO_URI").unwrap_or(default.mongo_uri),
            mongo_db: std::env::var("MONGO_DB").unwrap_or(default.mongo_db),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_endpoint: std::env::var("LLM_ENDPOINT").unwrap_or(default.llm_endpoint),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_timeout_secs),
            max_concurrent_marking: std::env::var("MAX_CONCURRENT_MARKING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_marking),
        }
    }
}
