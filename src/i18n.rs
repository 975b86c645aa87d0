use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const APP_TITLE: &str = "general.app_title";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_CALCULATE: &str = "main_menu.calculate";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const FORM_HEADING: &str = "form.heading";
    pub const FORM_SUBMIT: &str = "form.submit";
    pub const FORM_RESET: &str = "form.reset";

    pub const FIELD_PURCHASE_PRICE: &str = "field.purchase_price";
    pub const FIELD_INTEREST_RATE: &str = "field.interest_rate";
    pub const FIELD_OPERATING_HOURS: &str = "field.operating_hours";
    pub const FIELD_SERVICE_COSTS: &str = "field.service_costs";
    pub const FIELD_INSURANCE: &str = "field.insurance";
    pub const FIELD_RESIDUAL_VALUE: &str = "field.residual_value";

    pub const UNIT_CURRENCY: &str = "unit.currency";
    pub const UNIT_CURRENCY_PER_YEAR: &str = "unit.currency_per_year";
    pub const UNIT_PERCENT_PER_YEAR: &str = "unit.percent_per_year";
    pub const UNIT_HOURS_PER_YEAR: &str = "unit.hours_per_year";
    pub const UNIT_PERCENT_OF_PRICE: &str = "unit.percent_of_price";

    pub const RANGE_MIN_ONLY: &str = "range.min_only";
    pub const RANGE_BETWEEN: &str = "range.between";

    pub const ERROR_REQUIRED: &str = "error.required";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const ERROR_AMBIGUOUS_NUMBER: &str = "error.ambiguous_number";
    pub const ERROR_BELOW_MIN: &str = "error.below_min";
    pub const ERROR_ABOVE_MAX: &str = "error.above_max";
    pub const ERROR_NON_FINITE_RESULT: &str = "error.non_finite_result";

    pub const RESULT_HEADING: &str = "result.heading";
    pub const RESULT_TOTAL_ANNUAL_COST: &str = "result.total_annual_cost";
    pub const RESULT_COST_PER_HOUR: &str = "result.cost_per_hour";
    pub const RESULT_BREAKDOWN: &str = "result.breakdown";
    pub const RESULT_RESIDUAL_AMOUNT: &str = "result.residual_amount";
    pub const RESULT_DEPRECIATION: &str = "result.depreciation";
    pub const RESULT_AVERAGE_CAPITAL: &str = "result.average_capital";
    pub const RESULT_INTEREST_COST: &str = "result.interest_cost";
    pub const RESULT_HOURS_NOTE: &str = "result.hours_note";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";
    pub const SETTINGS_LANGUAGE: &str = "settings.language";
    pub const SETTINGS_LANGUAGE_AUTO: &str = "settings.language_auto";
    pub const SETTINGS_SAVE: &str = "settings.save";

    pub const ABOUT_TITLE: &str = "about.title";
    pub const ABOUT_BODY: &str = "about.body";
}

/// 지원 언어. 알 수 없는 코드는 덴마크어로 폴백한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Da,
    En,
    Ko,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::Da
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Da => "da-dk",
            Language::En => "en-us",
            Language::Ko => "ko-kr",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Translator {
    /// 언어 코드에 따라 내장 언어팩만으로 번역기를 생성한다.
    pub fn new(lang_code: &str) -> Self {
        Self::new_with_pack(lang_code, None)
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리의 파일이 내장 문자열을 키 단위로 덮어쓴다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let lang = Language::from_code(lang_code);
        let mut strings = built_in_pack(lang.as_code()).unwrap_or_default();
        if let Some(overrides) = pack_dir.and_then(|dir| load_overrides(dir, lang.as_code())) {
            tracing::debug!(count = overrides.len(), "language pack overrides loaded");
            strings.extend(overrides);
        }
        let fallback = built_in_pack(Language::Da.as_code()).unwrap_or_default();
        Self {
            lang,
            strings,
            fallback,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 현재 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }

    /// 번역을 가져온다. 없으면 덴마크어, 그것도 없으면 키를 그대로 돌려준다.
    pub fn t(&self, key: &str) -> String {
        self.strings
            .get(key)
            .or_else(|| self.fallback.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// `{name}` 자리표시자를 채운 번역을 돌려준다.
    pub fn tf(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }
}

pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| Language::Da.as_code().to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("da") => Some("da-dk".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        other if other.starts_with("ko") => Some("ko-kr".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "da" => Some("da-dk".into()),
        "en" => Some("en-us".into()),
        "ko" => Some("ko-kr".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LANG", "LC_ALL"] {
        if let Ok(lang) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&lang) {
                return Some(code);
            }
        }
    }
    None
}

/// `<dir>/<code>.toml` 언어팩을 찾는다. `da-dk.toml`이 없으면 `da.toml`을 본다.
/// 파일에 있는 키만 내장 팩 위에 덮어쓴다.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let base = lang.split_once(['-', '_']).map(|(b, _)| b);
    [Some(lang), base].into_iter().flatten().find_map(|code| {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(&path).ok()?;
        let map = parse_toml_to_map(&content);
        if map.is_none() {
            tracing::warn!(path = %path.display(), "language pack has no usable strings");
        }
        map
    })
}

/// `[field]` 아래 `purchase_price = "..."`를 `field.purchase_price` 키로 펼친다.
/// 문자열이 아닌 값은 무시한다. 파싱 실패나 빈 팩이면 `None`.
fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let table: toml::Table = toml::from_str(src).ok()?;
    let mut map = HashMap::new();
    flatten_section("", &table, &mut map);
    (!map.is_empty()).then_some(map)
}

fn flatten_section(prefix: &str, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (name, value) in table {
        let key = match prefix {
            "" => name.clone(),
            _ => format!("{prefix}.{name}"),
        };
        match value {
            toml::Value::String(text) => {
                out.insert(key, text.clone());
            }
            toml::Value::Table(section) => flatten_section(&key, section, out),
            _ => {}
        }
    }
}

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함).
fn built_in_pack(lang: &str) -> Option<HashMap<String, String>> {
    match lang.to_lowercase().as_str() {
        "da-dk" | "da" => parse_toml_to_map(include_str!("../locales/da-dk.toml")),
        "en-us" | "en" => parse_toml_to_map(include_str!("../locales/en-us.toml")),
        "ko-kr" | "ko" => parse_toml_to_map(include_str!("../locales/ko-kr.toml")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FIELDS;

    #[test]
    fn danish_labels_match_form() {
        let tr = Translator::new("da-dk");
        assert_eq!(tr.t(keys::FIELD_PURCHASE_PRICE), "Købspris");
        assert_eq!(tr.t(keys::FORM_SUBMIT), "Beregn samlede ejeromkostninger");
    }

    #[test]
    fn every_field_label_exists_in_all_packs() {
        for code in ["da-dk", "en-us", "ko-kr"] {
            let tr = Translator::new(code);
            for f in FIELDS.iter() {
                assert!(tr.lookup(f.label_key).is_some(), "{code} missing {}", f.label_key);
                assert!(tr.lookup(f.unit_key).is_some(), "{code} missing {}", f.unit_key);
            }
        }
    }

    #[test]
    fn unknown_key_returns_key() {
        let tr = Translator::new("en-us");
        assert_eq!(tr.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn cli_flag_wins_over_config() {
        assert_eq!(resolve_language("en", Some("da-dk")), "en-us");
        assert_eq!(resolve_language("auto", Some("ko")), "ko-kr");
    }

    #[test]
    fn template_fills_placeholders() {
        let tr = Translator::new("en-us");
        let s = tr.tf(keys::ERROR_ABOVE_MAX, &[("max", "100".into())]);
        assert!(s.contains("100"), "{s}");
        assert!(!s.contains("{max}"));
    }

    #[test]
    fn pack_dir_overrides_single_key() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("en-us.toml"),
            "[form]\nsubmit = \"Go\"\n",
        )
        .unwrap();
        let tr = Translator::new_with_pack("en-us", dir.path().to_str());
        assert_eq!(tr.t(keys::FORM_SUBMIT), "Go");
        assert_eq!(tr.t(keys::FIELD_INSURANCE), "Insurance");
    }

    #[test]
    fn pack_dir_falls_back_to_base_code() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("da.toml"), "[field]\ninsurance = \"Forsikring i alt\"\n")
            .unwrap();
        let tr = Translator::new_with_pack("da-dk", dir.path().to_str());
        assert_eq!(tr.t(keys::FIELD_INSURANCE), "Forsikring i alt");
        assert_eq!(tr.t(keys::FIELD_PURCHASE_PRICE), "Købspris");
    }

    #[test]
    fn sections_flatten_to_dotted_keys() {
        let map = parse_toml_to_map("top = \"a\"\ncount = 3\n[result]\nheading = \"b\"\n")
            .unwrap();
        assert_eq!(map.get("top").map(String::as_str), Some("a"));
        assert_eq!(map.get("result.heading").map(String::as_str), Some("b"));
        assert!(!map.contains_key("count"));
        assert!(parse_toml_to_map("count = 3").is_none());
    }

    #[test]
    fn every_error_message_exists_in_all_packs() {
        for code in ["da-dk", "en-us", "ko-kr"] {
            let tr = Translator::new(code);
            for key in [
                keys::ERROR_REQUIRED,
                keys::ERROR_INVALID_NUMBER,
                keys::ERROR_AMBIGUOUS_NUMBER,
                keys::ERROR_BELOW_MIN,
                keys::ERROR_ABOVE_MAX,
            ] {
                assert!(tr.lookup(key).is_some(), "{code} missing {key}");
            }
        }
    }
}
