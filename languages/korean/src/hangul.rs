/// Precomposed syllable, conjoining jamo or compatibility jamo
pub fn is_hangul(c: char) -> bool {
    matches!(c as u32,
        0xAC00..=0xD7A3
        | 0x1100..=0x11FF
        | 0x3130..=0x318F
        | 0xA960..=0xA97F
        | 0xD7B0..=0xD7FF)
}

/// Hangul characters and runs of other letters in `text`
fn counts(text: &str) -> (usize, usize) {
    let mut hangul = 0;
    let mut foreign_words = 0;
    let mut in_foreign = false;

    for c in text.chars() {
        if is_hangul(c) {
            hangul += 1;
            in_foreign = false;
        } else if c.is_alphabetic() {
            if !in_foreign {
                foreign_words += 1;
            }
            in_foreign = true;
        } else {
            in_foreign = false;
        }
    }
    (hangul, foreign_words)
}

/// Carries Hangul, with at least one Hangul character per foreign word.
/// Mixed input like "K-pop 노래" counts as Korean.
pub fn is_korean(text: &str) -> bool {
    let (hangul, foreign_words) = counts(text);
    hangul > 0 && hangul >= foreign_words
}
