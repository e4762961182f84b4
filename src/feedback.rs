use crate::data::{self, KANA_DATA};

pub struct FeedbackGenerator;

impl FeedbackGenerator {
    /// Kana whose romaji the learner typed, if it is a different kana than the one asked.
    pub fn confused_with(correct_kana: &str, user_input: &str) -> Option<&'static str> {
        let trimmed_input = user_input.trim();
        if trimmed_input.is_empty() {
            return None;
        }

        let asked = data::lookup(correct_kana)?;
        KANA_DATA
            .iter()
            .find(|k| k.category == asked.category && k.romaji.eq_ignore_ascii_case(trimmed_input))
            .filter(|k| k.kana != correct_kana)
            .map(|k| k.kana)
    }

    pub fn generate_explanation(correct_kana: &str, user_input: &str) -> String {
        let trimmed_input = user_input.trim();
        let correct_romaji = data::lookup(correct_kana).map_or("?", |k| k.romaji);

        let mut msg = format!(
            "正确答案是 {} ({})。 你输入了: '{}'。 请继续加油！",
            correct_kana, correct_romaji, trimmed_input
        );

        if let Some(confused) = Self::confused_with(correct_kana, trimmed_input) {
            msg.push_str(&format!("\n你输入的 '{}' 对应的假名是 '{}'。", trimmed_input, confused));
        }

        msg
    }

    pub fn next_review(days: u32) -> String {
        match days {
            0 => "回答正确！".to_string(),
            1 => "回答正确！\n明天复习".to_string(),
            _ => format!("回答正确！\n下次复习: {}天后", days),
        }
    }
}
