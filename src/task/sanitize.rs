use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 路径分隔符、Windows 保留字符和控制字符
    static ref ILLEGAL_CHARS: Regex = Regex::new(r#"[\\/:*?"<>|\x00-\x1f]"#).unwrap();
}

/// 去掉文件名中的非法字符。任务标题和番剧目录名共用这一规则。
pub fn sanitize_file_name(name: &str) -> String {
    let stripped = ILLEGAL_CHARS.replace_all(name, "");
    // Windows 不接受以点或空格结尾的文件名
    stripped.trim().trim_end_matches('.').trim_end().to_string()
}
