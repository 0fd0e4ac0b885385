pub mod logging;
pub mod math_format;

pub use math_format::format_math_expression;
