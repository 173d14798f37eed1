//! モデル応答のパーサ
//!
//! LLM は `{"response": ..., "code": ...}` の JSON で返すよう指示しているが、実際の出力は
//! フェンス付き JSON・崩れた JSON・区切り行つき Markdown・ただの文章のいずれにもなる。
//! 各形式を独立した関数で判定し、[`parse_response`] が決まった順に試す（最初に一致したもの）。
//!
//! 1. `parse_fenced_json` — ```json フェンス内、または文章に埋め込まれた JSON オブジェクト
//! 2. `recover_fields` — 厳密な JSON パースに失敗したときのパターン抽出（1 と 3 から使う）
//! 3. `parse_whole_object` — 入力全体が `{ ... }`
//! 4. `parse_sentinel_marker` — `### Render Code Below ###` 区切り
//! 5. `parse_plain_text` — 構造の手がかりが一切ない文章
//!
//! どの関数もエラーを返さない。失敗は「この形式には当てはまらない」として次へ進む。

use crate::domain::parsed_content::{ParseOutcome, ParsedContent};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

/// ```json フェンス（大文字小文字無視、閉じフェンスが無ければ末尾まで）
static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```[ \t]*json\b[ \t]*\r?\n?(.*?)(?:```|\z)").expect("valid JSON_FENCE regex")
});

static HTML_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```[ \t]*html\b[ \t]*\r?\n?(.*?)```").expect("valid HTML_FENCE regex")
});

/// ラベル無しフェンスで本文が doctype 宣言から始まるもの
static DOCTYPE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```[ \t]*\r?\n\s*(<!doctype.*?)```").expect("valid DOCTYPE_FENCE regex")
});

/// 行全体が区切りになっている場合だけ（文中に書かれた区切り文字列は対象外）
static MARKER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*### Render Code Below ###[ \t]*\r?$").expect("valid MARKER_LINE regex")
});

static RESPONSE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"response"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid RESPONSE_FIELD regex")
});

/// code はバッククォート囲み（group 1）かダブルクォート囲み（group 2）
static CODE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"code"\s*:\s*(?:`(.*?)`|"((?:[^"\\]|\\.)*)")"#).expect("valid CODE_FIELD regex")
});

/// 厳密パース時に受け付ける形
#[derive(Debug, Deserialize)]
struct ResponseFields {
    response: String,
    #[serde(default)]
    code: Option<String>,
}

/// モデル応答を解析する。どんな入力でも失敗しない。
pub fn parse_response(raw: &str) -> ParseOutcome {
    if raw.trim().is_empty() {
        return ParseOutcome::Recognized(ParsedContent::explanation_only(""));
    }

    let conventions: [fn(&str) -> Option<ParsedContent>; 4] = [
        parse_fenced_json,
        parse_whole_object,
        parse_sentinel_marker,
        parse_plain_text,
    ];
    conventions
        .iter()
        .find_map(|convention| convention(raw))
        .map_or(ParseOutcome::Unrecognized, ParseOutcome::Recognized)
}

/// ```json フェンス、またはフェンスが無ければ文章中に埋め込まれた JSON オブジェクト。
///
/// 入力全体が 1 つのオブジェクトの場合は [`parse_whole_object`] に任せる。
pub fn parse_fenced_json(raw: &str) -> Option<ParsedContent> {
    let candidate = match JSON_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(region) => {
            let region = region.as_str();
            object_span(region).unwrap_or(region)
        }
        None => {
            let span = object_span(raw)?;
            if span.len() == raw.trim().len() {
                return None;
            }
            span
        }
    };
    extract_fields(candidate)
}

/// トリム後の入力全体が `{` で始まり `}` で終わる場合のみ、全体を JSON として扱う。
pub fn parse_whole_object(raw: &str) -> Option<ParsedContent> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        extract_fields(trimmed)
    } else {
        None
    }
}

/// 区切り行の前を explanation、後ろを snippet とする。
///
/// 区切り行の前後は改行と空行 1 つだけを落とし、残りはそのまま使う（保存形式を読み直しても
/// 同じ組に戻る）。後ろ側に ```html フェンス（または doctype で始まるラベル無しフェンス）が
/// あれば中身だけを使う。
pub fn parse_sentinel_marker(raw: &str) -> Option<ParsedContent> {
    let marker = MARKER_LINE.find(raw)?;
    let explanation = strip_line_end(strip_line_end(&raw[..marker.start()]));
    let trailing = &raw[marker.end()..];
    let trailing = trailing.strip_prefix('\n').unwrap_or(trailing);
    let snippet = unwrap_markup_fence(trailing).unwrap_or(trailing);
    Some(ParsedContent::new(explanation, Some(snippet.to_string())))
}

/// JSON フェンス・`{`・区切り行のどれも含まない場合のみ、入力全体を explanation とする。
pub fn parse_plain_text(raw: &str) -> Option<ParsedContent> {
    if JSON_FENCE.is_match(raw) || raw.contains('{') || MARKER_LINE.is_match(raw) {
        return None;
    }
    Some(ParsedContent::explanation_only(raw))
}

/// 崩れた JSON から response と code をパターンで取り出す（それぞれ最初の一致のみ）。
///
/// 両方そろった場合だけ成功とする。
pub fn recover_fields(text: &str) -> Option<ParsedContent> {
    let response = RESPONSE_FIELD
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| unescape_json_string(m.as_str()))?;
    let code_caps = CODE_FIELD.captures(text)?;
    let code = match (code_caps.get(1), code_caps.get(2)) {
        (Some(backticked), _) => backticked.as_str().to_string(),
        (None, Some(quoted)) => unescape_json_string(quoted.as_str()),
        (None, None) => return None,
    };
    Some(ParsedContent::new(response, Some(code)))
}

/// 厳密パース → 失敗したらパターン抽出
fn extract_fields(candidate: &str) -> Option<ParsedContent> {
    strict_fields(candidate).or_else(|| recover_fields(candidate))
}

fn strict_fields(candidate: &str) -> Option<ParsedContent> {
    let value: Value = serde_json::from_str(candidate.trim()).ok()?;
    if !value.is_object() {
        return None;
    }
    let fields = ResponseFields::deserialize(value).ok()?;
    Some(ParsedContent::new(fields.response, fields.code))
}

/// 末尾の改行を 1 つだけ落とす
fn strip_line_end(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

/// 最初の `{` から最後の `}` まで
fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn unwrap_markup_fence(trailing: &str) -> Option<&str> {
    HTML_FENCE
        .captures(trailing)
        .or_else(|| DOCTYPE_FENCE.captures(trailing))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// JSON 文字列リテラルの中身をデコードする。生の改行・タブはエスケープしてから読む。
/// デコードできなければそのまま返す。
fn unescape_json_string(body: &str) -> String {
    let escaped = body
        .replace('\r', "\\r")
        .replace('\n', "\\n")
        .replace('\t', "\\t");
    serde_json::from_str::<String>(&format!("\"{}\"", escaped)).unwrap_or_else(|_| body.to_string())
}
