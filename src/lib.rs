//! # Exam Marking
//!
//! 基于 LLM 的考试出题与阅卷服务
//!
//! ## 架构设计
//!
//! 本系统采用三层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（MongoDB 句柄），只暴露能力
//! - `ExamStore` - 唯一的数据库 owner，提供三个集合的读写能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LlmService` - 通用补全能力（带数学符号格式化）
//! - `ExamService` - 出题 / 按归属查卷能力
//! - `MarkingService` - 单题阅卷能力
//! - `ResultService` - 整卷批改与按学习目标汇总能力
//!
//! ### ③ 接口层（Routes）
//! - `routes` - axum 路由与请求/响应编组，不含业务逻辑
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::ExamStore;
pub use models::{ExamPaper, ExamRequest, ExamResult, Question, Role};
pub use services::{ExamService, LlmService, MarkingService, ResultService};
