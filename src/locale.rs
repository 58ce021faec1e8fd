/// Returns true when `text` contains at least one Han-script code point.
///
/// This is script identification, not language identification: it answers
/// "does this string contain CJK ideographs", which is all the server needs
/// to decide whether GLM should be asked to reply in Chinese. Latin text
/// with diacritics, Cyrillic, kana, etc. all report false.
pub fn is_chinese_text(text: &str) -> bool {
    text.chars().any(is_han)
}

// Han blocks: the URO plus Extension A cover effectively all modern
// simplified and traditional text; the supplementary-plane extensions and
// the compatibility blocks catch rare hanzi that IMEs still produce.
fn is_han(c: char) -> bool {
    matches!(
        u32::from(c),
        0x3400..=0x4DBF         // CJK Extension A
        | 0x4E00..=0x9FFF       // CJK Unified Ideographs
        | 0xF900..=0xFAFF       // CJK Compatibility Ideographs
        | 0x20000..=0x2A6DF     // CJK Extension B
        | 0x2A700..=0x2EBEF     // CJK Extensions C-F
        | 0x2F800..=0x2FA1F     // CJK Compatibility Supplement
    )
}
