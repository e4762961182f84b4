use chrono::{DateTime, Utc};

use crate::models::Deck;
use crate::scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KanaCategory {
    Hiragana,
    Katakana,
}

pub struct KanaPair {
    pub kana: &'static str,
    pub romaji: &'static str,
    pub category: KanaCategory,
}

pub const KANA_DATA: &[KanaPair] = &[
    KanaPair { kana: "あ", romaji: "a", category: KanaCategory::Hiragana },
    KanaPair { kana: "い", romaji: "i", category: KanaCategory::Hiragana },
    KanaPair { kana: "う", romaji: "u", category: KanaCategory::Hiragana },
    KanaPair { kana: "え", romaji: "e", category: KanaCategory::Hiragana },
    KanaPair { kana: "お", romaji: "o", category: KanaCategory::Hiragana },
    KanaPair { kana: "か", romaji: "ka", category: KanaCategory::Hiragana },
    KanaPair { kana: "き", romaji: "ki", category: KanaCategory::Hiragana },
    KanaPair { kana: "く", romaji: "ku", category: KanaCategory::Hiragana },
    KanaPair { kana: "け", romaji: "ke", category: KanaCategory::Hiragana },
    KanaPair { kana: "こ", romaji: "ko", category: KanaCategory::Hiragana },
    KanaPair { kana: "さ", romaji: "sa", category: KanaCategory::Hiragana },
    KanaPair { kana: "し", romaji: "shi", category: KanaCategory::Hiragana },
    KanaPair { kana: "す", romaji: "su", category: KanaCategory::Hiragana },
    KanaPair { kana: "せ", romaji: "se", category: KanaCategory::Hiragana },
    KanaPair { kana: "そ", romaji: "so", category: KanaCategory::Hiragana },
    KanaPair { kana: "た", romaji: "ta", category: KanaCategory::Hiragana },
    KanaPair { kana: "ち", romaji: "chi", category: KanaCategory::Hiragana },
    KanaPair { kana: "つ", romaji: "tsu", category: KanaCategory::Hiragana },
    KanaPair { kana: "て", romaji: "te", category: KanaCategory::Hiragana },
    KanaPair { kana: "と", romaji: "to", category: KanaCategory::Hiragana },
    KanaPair { kana: "な", romaji: "na", category: KanaCategory::Hiragana },
    KanaPair { kana: "に", romaji: "ni", category: KanaCategory::Hiragana },
    KanaPair { kana: "ぬ", romaji: "nu", category: KanaCategory::Hiragana },
    KanaPair { kana: "ね", romaji: "ne", category: KanaCategory::Hiragana },
    KanaPair { kana: "の", romaji: "no", category: KanaCategory::Hiragana },
    KanaPair { kana: "は", romaji: "ha", category: KanaCategory::Hiragana },
    KanaPair { kana: "ひ", romaji: "hi", category: KanaCategory::Hiragana },
    KanaPair { kana: "ふ", romaji: "fu", category: KanaCategory::Hiragana },
    KanaPair { kana: "へ", romaji: "he", category: KanaCategory::Hiragana },
    KanaPair { kana: "ほ", romaji: "ho", category: KanaCategory::Hiragana },
    KanaPair { kana: "ま", romaji: "ma", category: KanaCategory::Hiragana },
    KanaPair { kana: "み", romaji: "mi", category: KanaCategory::Hiragana },
    KanaPair { kana: "む", romaji: "mu", category: KanaCategory::Hiragana },
    KanaPair { kana: "め", romaji: "me", category: KanaCategory::Hiragana },
    KanaPair { kana: "も", romaji: "mo", category: KanaCategory::Hiragana },
    KanaPair { kana: "や", romaji: "ya", category: KanaCategory::Hiragana },
    KanaPair { kana: "ゆ", romaji: "yu", category: KanaCategory::Hiragana },
    KanaPair { kana: "よ", romaji: "yo", category: KanaCategory::Hiragana },
    KanaPair { kana: "ら", romaji: "ra", category: KanaCategory::Hiragana },
    KanaPair { kana: "り", romaji: "ri", category: KanaCategory::Hiragana },
    KanaPair { kana: "る", romaji: "ru", category: KanaCategory::Hiragana },
    KanaPair { kana: "れ", romaji: "re", category: KanaCategory::Hiragana },
    KanaPair { kana: "ろ", romaji: "ro", category: KanaCategory::Hiragana },
    KanaPair { kana: "わ", romaji: "wa", category: KanaCategory::Hiragana },
    KanaPair { kana: "を", romaji: "wo", category: KanaCategory::Hiragana },
    KanaPair { kana: "ん", romaji: "n", category: KanaCategory::Hiragana },
    KanaPair { kana: "ア", romaji: "a", category: KanaCategory::Katakana },
    KanaPair { kana: "イ", romaji: "i", category: KanaCategory::Katakana },
    KanaPair { kana: "ウ", romaji: "u", category: KanaCategory::Katakana },
    KanaPair { kana: "エ", romaji: "e", category: KanaCategory::Katakana },
    KanaPair { kana: "オ", romaji: "o", category: KanaCategory::Katakana },
    KanaPair { kana: "カ", romaji: "ka", category: KanaCategory::Katakana },
    KanaPair { kana: "キ", romaji: "ki", category: KanaCategory::Katakana },
    KanaPair { kana: "ク", romaji: "ku", category: KanaCategory::Katakana },
    KanaPair { kana: "ケ", romaji: "ke", category: KanaCategory::Katakana },
    KanaPair { kana: "コ", romaji: "ko", category: KanaCategory::Katakana },
    KanaPair { kana: "サ", romaji: "sa", category: KanaCategory::Katakana },
    KanaPair { kana: "シ", romaji: "shi", category: KanaCategory::Katakana },
    KanaPair { kana: "ス", romaji: "su", category: KanaCategory::Katakana },
    KanaPair { kana: "セ", romaji: "se", category: KanaCategory::Katakana },
    KanaPair { kana: "ソ", romaji: "so", category: KanaCategory::Katakana },
    KanaPair { kana: "タ", romaji: "ta", category: KanaCategory::Katakana },
    KanaPair { kana: "チ", romaji: "chi", category: KanaCategory::Katakana },
    KanaPair { kana: "ツ", romaji: "tsu", category: KanaCategory::Katakana },
    KanaPair { kana: "テ", romaji: "te", category: KanaCategory::Katakana },
    KanaPair { kana: "ト", romaji: "to", category: KanaCategory::Katakana },
    KanaPair { kana: "ナ", romaji: "na", category: KanaCategory::Katakana },
    KanaPair { kana: "ニ", romaji: "ni", category: KanaCategory::Katakana },
    KanaPair { kana: "ヌ", romaji: "nu", category: KanaCategory::Katakana },
    KanaPair { kana: "ネ", romaji: "ne", category: KanaCategory::Katakana },
    KanaPair { kana: "ノ", romaji: "no", category: KanaCategory::Katakana },
    KanaPair { kana: "ハ", romaji: "ha", category: KanaCategory::Katakana },
    KanaPair { kana: "ヒ", romaji: "hi", category: KanaCategory::Katakana },
    KanaPair { kana: "フ", romaji: "fu", category: KanaCategory::Katakana },
    KanaPair { kana: "ヘ", romaji: "he", category: KanaCategory::Katakana },
    KanaPair { kana: "ホ", romaji: "ho", category: KanaCategory::Katakana },
    KanaPair { kana: "マ", romaji: "ma", category: KanaCategory::Katakana },
    KanaPair { kana: "ミ", romaji: "mi", category: KanaCategory::Katakana },
    KanaPair { kana: "ム", romaji: "mu", category: KanaCategory::Katakana },
    KanaPair { kana: "メ", romaji: "me", category: KanaCategory::Katakana },
    KanaPair { kana: "モ", romaji: "mo", category: KanaCategory::Katakana },
    KanaPair { kana: "ヤ", romaji: "ya", category: KanaCategory::Katakana },
    KanaPair { kana: "ユ", romaji: "yu", category: KanaCategory::Katakana },
    KanaPair { kana: "ヨ", romaji: "yo", category: KanaCategory::Katakana },
    KanaPair { kana: "ラ", romaji: "ra", category: KanaCategory::Katakana },
    KanaPair { kana: "リ", romaji: "ri", category: KanaCategory::Katakana },
    KanaPair { kana: "ル", romaji: "ru", category: KanaCategory::Katakana },
    KanaPair { kana: "レ", romaji: "re", category: KanaCategory::Katakana },
    KanaPair { kana: "ロ", romaji: "ro", category: KanaCategory::Katakana },
    KanaPair { kana: "ワ", romaji: "wa", category: KanaCategory::Katakana },
    KanaPair { kana: "ヲ", romaji: "wo", category: KanaCategory::Katakana },
    KanaPair { kana: "ン", romaji: "n", category: KanaCategory::Katakana },
];

pub fn lookup(kana: &str) -> Option<&'static KanaPair> {
    KANA_DATA.iter().find(|k| k.kana == kana)
}

/// Accepted spellings besides the Hepburn romaji in `KANA_DATA`.
fn alternate_romaji(kana: &str) -> &'static [&'static str] {
    match kana {
        "し" | "シ" => &["si"],
        "ち" | "チ" => &["ti"],
        "つ" | "ツ" => &["tu"],
        "ふ" | "フ" => &["hu"],
        "を" | "ヲ" => &["o"],
        "ん" | "ン" => &["nn"],
        _ => &[],
    }
}

pub fn is_correct(kana: &str, answer: &str) -> bool {
    let answer = answer.trim();
    match lookup(kana) {
        Some(pair) => {
            pair.romaji.eq_ignore_ascii_case(answer)
                || alternate_romaji(kana).iter().any(|alt| alt.eq_ignore_ascii_case(answer))
        }
        None => false,
    }
}

/// Adds every kana of `category` (or all of them) to the deck. Existing items are left alone.
/// Returns how many were new.
pub fn seed_deck(deck: &mut Deck, category: Option<KanaCategory>, now: DateTime<Utc>) -> usize {
    let before = deck.len();
    for pair in KANA_DATA.iter().filter(|k| category.map_or(true, |c| k.category == c)) {
        scheduler::add_item(deck, pair.kana, now);
    }
    deck.len() - before
}
