pub mod exam_service;
pub mod llm_service;
pub mod marking_service;
pub mod result_service;

pub use exam_service::ExamService;
pub use llm_service::{ChatMessage, LlmService};
pub use marking_service::MarkingService;
pub use result_service::ResultService;
