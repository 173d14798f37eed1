//! システムプロンプトの組み立て
//!
//! 意図が取れたときは JSON（response / code）で返させるプロンプト、取れなかったときは
//! キャラクターのペルソナか汎用の会話プロンプトを使う。

use crate::domain::character::CharacterData;
use crate::domain::intent::IntentResult;
use common::error::Error;
use std::str::FromStr;

/// システムプロンプトの最大文字数
pub const MAX_PROMPT_CHARS: usize = 4000;

const CASUAL_FALLBACK: &str =
    "You are a friendly AI companion. Respond naturally and helpfully with a conversational tone.";

/// `--style` で選べるプロンプト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    Creative,
    Analytical,
    Educational,
}

impl FromStr for PromptStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "creative" => Ok(Self::Creative),
            "analytical" => Ok(Self::Analytical),
            "educational" => Ok(Self::Educational),
            _ => Err(Error::invalid_argument(format!("Unknown style: {}", s))),
        }
    }
}

impl PromptStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creative => "creative",
            Self::Analytical => "analytical",
            Self::Educational => "educational",
        }
    }

    fn base_prompt(&self) -> &'static str {
        match self {
            Self::Creative => {
                "You are a creative assistant focused on imaginative and innovative responses."
            }
            Self::Analytical => {
                "You are an analytical assistant focused on logical reasoning and data-driven insights."
            }
            Self::Educational => {
                "You are an educational assistant focused on clear explanations and learning outcomes."
            }
        }
    }
}

/// 意図と推奨ツールから JSON 応答を求めるプロンプトを作る
pub fn optimized_prompt(intent: &IntentResult) -> String {
    let intention = intent.matched_intention.as_deref().unwrap_or("Unknown");
    let Some(tool) = intent.top_tool() else {
        return format!(
            "Return a JSON with two fields:\n\n\
             1. **response**: Helpful answer to user's intent: \"{intention}\".\n\
             2. **code**: HTML + CSS code for a static website illustrating a useful method to address the user's query.\n\n\
             Be specific and relevant to the task."
        );
    };

    format!(
        "You are a helpful AI assistant.\n\n\
         User intent: \"{intention}\"\n\
         Top recommended tool:\n\
         - Name: {name}\n\
         - Description: {description}\n\n\
         Return a JSON with two fields:\n\n\
         1. \"response\": A helpful, concise explanation answering the user's intent.\n\
         2. \"code\": Complete HTML + CSS code for a static website section that visually demonstrates and explains the method \"{name}\" to help the user achieve their goal.\n\
         <html>...interactive flashcards or roadmap layout...</html>\n\n\
         Make the HTML self-contained, clean, modern, responsive, and visually appealing. Avoid external dependencies.\n\n\
         Only return the JSON object, no extra text.",
        name = tool.name,
        description = tool.description,
    )
}

/// 会話用プロンプト。ペルソナが揃っていればキャラクターとして振る舞わせる。
pub fn casual_prompt(character: Option<&CharacterData>) -> String {
    let Some(c) = character.filter(|c| c.has_persona()) else {
        return CASUAL_FALLBACK.to_string();
    };

    let stage = c
        .life_stage
        .as_ref()
        .map(|s| format!("Current Life Stage: \"{}\"\n{}", s.stage, s.description))
        .unwrap_or_default();

    format!(
        "You are {name}, a {role}.\n\n\
         Core Personality:\n\
         {personality}\n\n\
         {stage}\n\n\
         Behavior Guidelines:\n\
         - Stay in character and reflect both your core personality and current life stage.\n\
         - Respond briefly and clearly, avoiding unnecessary facts or digressions.\n\
         - Use language appropriate to your life stage and role.\n\
         - Keep the tone consistent (e.g., playful for child, witty for teen, professional for adult, wise for senior).\n\
         - Encourage learning with supportive and engaging answers.",
        name = c.name,
        role = c.role,
        personality = c.system_prompt,
    )
}

pub fn custom_prompt(style: PromptStyle, context: Option<&str>) -> String {
    match context.filter(|c| !c.is_empty()) {
        Some(context) => format!("{}\n\nContext: {}", style.base_prompt(), context),
        None => style.base_prompt().to_string(),
    }
}

/// 空白のみ・長すぎるプロンプトを拒否する
pub fn validate_prompt(prompt: &str) -> Result<(), Error> {
    if prompt.trim().is_empty() {
        return Err(Error::invalid_argument("System prompt must not be empty"));
    }
    let len = prompt.chars().count();
    if len > MAX_PROMPT_CHARS {
        return Err(Error::invalid_argument(format!(
            "System prompt is too long ({} > {} characters)",
            len, MAX_PROMPT_CHARS
        )));
    }
    Ok(())
}
