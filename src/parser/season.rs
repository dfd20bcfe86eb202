use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref BRACKETED: Regex = Regex::new(r"\[([^\]]+)\]").unwrap();
    static ref NUMERIC: Regex = Regex::new(r"^\d+$").unwrap();
    static ref QUALITY_LABEL: Regex =
        Regex::new(r"^(高清|超清|清晰|流畅|极速|杜比|真彩|超高清|1080P|720P|480P|360P)").unwrap();
    static ref DURATION_LABEL: Regex = Regex::new(r"^\d+分\d+秒$").unwrap();
    static ref ACRONYM: Regex = Regex::new(r"^[A-Z]+$").unwrap();
}

/// 方括号里不是番剧名的几种情况
pub struct Exclusion {
    pub name: &'static str,
    pub rejects: fn(&str) -> bool,
}

fn is_numeric(s: &str) -> bool {
    NUMERIC.is_match(s)
}

fn is_quality_label(s: &str) -> bool {
    QUALITY_LABEL.is_match(s)
}

fn is_duration_label(s: &str) -> bool {
    DURATION_LABEL.is_match(s)
}

// 像 "NA" 这样的标识
fn is_acronym(s: &str) -> bool {
    ACRONYM.is_match(s)
}

pub const EXCLUSIONS: &[Exclusion] = &[
    Exclusion { name: "numeric", rejects: is_numeric },
    Exclusion { name: "quality_label", rejects: is_quality_label },
    Exclusion { name: "duration_label", rejects: is_duration_label },
    Exclusion { name: "acronym", rejects: is_acronym },
];

/// 返回第一条命中的排除规则名
pub fn excluded_by(candidate: &str) -> Option<&'static str> {
    EXCLUSIONS
        .iter()
        .find(|rule| (rule.rejects)(candidate))
        .map(|rule| rule.name)
}

/// 推断番剧名。调用方给出的名字直接使用；否则在标题的 `[...]` 片段里
/// 按出现顺序找第一个不被排除的片段。找不到时返回空串，表示不属于番剧。
pub fn infer_series_title(explicit: &str, item_title: &str) -> String {
    if !explicit.is_empty() {
        return explicit.to_string();
    }

    for caps in BRACKETED.captures_iter(item_title) {
        let candidate = &caps[1];
        match excluded_by(candidate) {
            Some(rule) => debug!("标题片段 [{}] 被规则 {} 排除", candidate, rule),
            None => return candidate.to_string(),
        }
    }

    String::new()
}
