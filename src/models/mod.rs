pub mod exam;
pub mod marking;
pub mod role;

pub use exam::{ExamPaper, ExamRequest, Question};
pub use marking::{
    ExamResult, MarkRequest, MarkingVerdict, ObjectivePerformance, ProcessExamRequest,
    StudentResponseRecord,
};
pub use role::Role;
