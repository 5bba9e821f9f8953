//! Shared vocabularies for lexical command parsing.

use regex::Regex;
use std::sync::OnceLock;

/// Verbs that open a device command.
pub const ACTION_WORDS: [&str; 5] = ["turn", "set", "change", "increase", "decrease"];

/// English stop words. `on` and `off` are deliberately absent: they carry the
/// power state of a command.
pub const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "over", "under", "again", "further", "then", "once", "here",
    "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more", "most",
    "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now", "d",
    "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

const NUMBER_WORDS: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
    ("hundred", 100),
];

/// Lowercase, drop periods and split into word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = WORD_REGEX.get_or_init(|| {
        Regex::new(r"[a-z0-9]+(?:'[a-z]+)?").expect("Invalid regex pattern - this is a bug")
    });
    let normalized = text.replace('.', "").trim().to_lowercase();
    re.find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

pub fn is_action_word(word: &str) -> bool {
    ACTION_WORDS.contains(&word)
}

pub fn is_number_word(word: &str) -> bool {
    NUMBER_WORDS.iter().any(|(w, _)| *w == word)
}

pub fn is_integer_literal(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}

/// Digits or a spelled-out number word.
pub fn words_to_number(word: &str) -> Option<u32> {
    if is_integer_literal(word) {
        return word.parse().ok();
    }
    let word = word.to_lowercase();
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, n)| *n)
}

/// Value of a run of number tokens such as `["one", "hundred"]`,
/// `["twenty", "five"]` or `["40"]`. `None` when the words do not form a
/// single number.
pub fn phrase_to_number<S: AsRef<str>>(words: &[S]) -> Option<u32> {
    match words {
        [] => return None,
        [only] if is_integer_literal(only.as_ref()) => return only.as_ref().parse().ok(),
        _ => {}
    }

    let mut total: u32 = 0;
    let mut seen = false;
    for (i, word) in words.iter().enumerate() {
        let word = word.as_ref().to_lowercase();
        if word == "and" {
            // Only as in "one hundred and five".
            if !seen || total % 100 != 0 || i + 1 == words.len() {
                return None;
            }
            continue;
        }
        let value = NUMBER_WORDS.iter().find(|(w, _)| *w == word)?.1;
        let low = total % 100;
        match value {
            100 => {
                if total >= 100 || (low >= 10 && seen) {
                    return None;
                }
                total = total.max(1) * 100;
            }
            0 if seen => return None,
            20..=90 => {
                if low != 0 {
                    return None;
                }
                total += value;
            }
            _ => {
                // Units follow a bare ten ("twenty five"), nothing else.
                if low != 0 && (value >= 10 || low < 20 || low % 10 != 0) {
                    return None;
                }
                total += value;
            }
        }
        seen = true;
    }
    seen.then_some(total)
}
