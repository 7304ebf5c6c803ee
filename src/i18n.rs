// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持意大利语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "it";

/// 支持的语言
pub const AVAILABLE_LOCALES: &[&str] = &["it", "en"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"it" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 规范化语言代码
///
/// # 说明
/// - 忽略大小写，"en-US" / "en_GB" 取主语言
/// - 不支持的语言回退到 fallback，再回退到默认语言
pub fn resolve_locale(requested: Option<&str>, fallback: &str) -> &'static str {
    fn lookup(code: &str) -> Option<&'static str> {
        let primary = code
            .trim()
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or("")
            .to_lowercase();
        AVAILABLE_LOCALES.iter().copied().find(|l| *l == primary)
    }

    requested
        .and_then(lookup)
        .or_else(|| lookup(fallback))
        .unwrap_or(DEFAULT_LOCALE)
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use pipe_quote::i18n::t;
/// let msg = t("quote.sheet_name");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use pipe_quote::i18n::t_with_args;
/// let msg = t_with_args("cli.quote_exported", &[("path", "/tmp/Offerta.xlsx")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    replace_args(rust_i18n::t!(key).to_string(), args)
}

/// 按指定语言翻译（不改变全局语言）
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 按指定语言翻译（带参数）
pub fn t_in_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    replace_args(rust_i18n::t!(key, locale = locale).to_string(), args)
}

fn replace_args(mut result: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
