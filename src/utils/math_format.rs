//! 数学符号格式化模块
//!
//! 将 LLM 输出中的数学记号统一改写为 LaTeX 形式

use phf::phf_map;
use regex::Regex;

/// 数学符号 → LaTeX 命令对照表
///
/// 符号之间互不包含，替换顺序不影响结果
static SYMBOL_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "×" => "\\times",
    "÷" => "\\div",
    "±" => "\\pm",
    "≠" => "\\neq",
    "≤" => "\\leq",
    "≥" => "\\geq",
    "∞" => "\\infty",
    "π" => "\\pi",
    "√" => "\\sqrt",
};

/// 格式化文本中的数学表达式
///
/// 依次执行三类改写：分数、指数、符号表。
/// 注意：`3/4` 这类纯数字比值一律按分数处理，日期等写法也会被改写，
/// 这是既定行为。
///
/// # 参数
/// - `text`: 原始文本
///
/// # 返回
/// 返回改写后的文本（可能与原文相同）
pub fn format_math_expression(text: &str) -> String {
    let mut text = text.to_string();

    // 分数：3/4 -> \frac{3}{4}
    if let Ok(re) = Regex::new(r"(\d+)/(\d+)") {
        text = re.replace_all(&text, r"\frac{${1}}{${2}}").to_string();
    }

    // 指数：2^10 -> 2^{10}
    if let Ok(re) = Regex::new(r"(\d+)\^(\d+)") {
        text = re.replace_all(&text, r"${1}^{${2}}").to_string();
    }

    // 数学符号
    for (symbol, latex) in SYMBOL_MAP.entries() {
        text = text.replace(symbol, latex);
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_math_expression("3/4"), "\\frac{3}{4}");
    }

    #[test]
    fn test_format_exponent() {
        assert_eq!(format_math_expression("2^10"), "2^{10}");
    }

    #[test]
    fn test_format_symbols() {
        assert_eq!(format_math_expression("a × b ÷ c"), "a \\times b \\div c");
        assert_eq!(format_math_expression("x ≠ ∞"), "x \\neq \\infty");
        assert_eq!(format_math_expression("π ≥ 3"), "\\pi \\geq 3");
        assert_eq!(format_math_expression("± √ ≤"), "\\pm \\sqrt \\leq");
    }

    #[test]
    fn test_format_mixed() {
        let out = format_math_expression("Simplify 1/2 × 2^3");
        assert_eq!(out, "Simplify \\frac{1}{2} \\times 2^{3}");
    }

    #[test]
    fn test_format_plain_text_unchanged() {
        assert_eq!(
            format_math_expression("Describe the water cycle."),
            "Describe the water cycle."
        );
    }

    /// 改写后的文本不含剩余模式时，再次格式化结果不变
    #[test]
    fn test_format_stable_after_rewrite() {
        let once = format_math_expression("3/4 ± 2^2");
        let twice = format_math_expression(&once);
        assert_eq!(once, twice);
    }

    /// 日期类写法同样会被改写为分数，这是既定行为
    #[test]
    fn test_format_date_like_ratio() {
        assert_eq!(format_math_expression("on 3/4 we"), "on \\frac{3}{4} we");
    }
}
