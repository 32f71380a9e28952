//! Phonetic encoders: Soundex and a simplified, rule-driven Metaphone.
//!
//! Both encoders work over ASCII letters only. Anything else (digits,
//! punctuation, whitespace, non-ASCII letters) is stripped before encoding,
//! which can degrade matching for non-English names but never fails.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Maximum length of a [`metaphone`] code.
pub const METAPHONE_MAX_LEN: usize = 6;

/// Encode `text` with American Soundex.
///
/// The first letter is kept (upper-cased); following letters map to digit
/// groups, adjacent duplicates collapse, and the code is padded with `0` or
/// truncated to exactly four characters. Vowels and `y` produce no digit but
/// separate duplicates; `h` and `w` are skipped entirely.
///
/// Input without any ASCII letter encodes to the empty string.
///
/// # Examples
///
/// ```
/// use collegematch::phonetic::soundex;
///
/// assert_eq!(soundex("Robert"), "R163");
/// assert_eq!(soundex("Rupert"), "R163");
/// assert_eq!(soundex("Lee"), "L000");
/// assert_eq!(soundex("123"), "");
/// ```
pub fn soundex(text: &str) -> String {
    let mut letters = text
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase());

    let Some(first) = letters.next() else {
        return String::new();
    };

    let mut code = String::with_capacity(4);
    code.push(first as char);
    let mut prev = soundex_digit(first);

    for letter in letters {
        if code.len() == 4 {
            break;
        }
        if matches!(letter, b'H' | b'W') {
            continue;
        }
        let digit = soundex_digit(letter);
        if let Some(d) = digit {
            if digit != prev {
                code.push(d);
            }
        }
        prev = digit;
    }

    while code.len() < 4 {
        code.push('0');
    }
    code
}

fn soundex_digit(letter: u8) -> Option<char> {
    match letter {
        b'B' | b'F' | b'P' | b'V' => Some('1'),
        b'C' | b'G' | b'J' | b'K' | b'Q' | b'S' | b'X' | b'Z' => Some('2'),
        b'D' | b'T' => Some('3'),
        b'L' => Some('4'),
        b'M' | b'N' => Some('5'),
        b'R' => Some('6'),
        _ => None,
    }
}

/// Where a [`PhoneticRule`] is allowed to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Every occurrence is rewritten.
    #[default]
    Anywhere,
    /// Only a leading occurrence is rewritten.
    Start,
    /// Only a trailing occurrence is rewritten.
    End,
}

/// A single substring rewrite used by [`PhoneticRules::metaphone`].
///
/// `from` is matched against lower-case ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneticRule {
    /// Letters to rewrite.
    pub from: String,
    /// Replacement text.
    pub to: String,
    /// Where the rewrite applies.
    #[serde(default)]
    pub anchor: Anchor,
}

impl PhoneticRule {
    fn new(from: &str, to: &str, anchor: Anchor) -> Self {
        Self {
            from: from.to_owned(),
            to: to.to_owned(),
            anchor,
        }
    }

    fn apply(&self, word: &mut String) {
        if self.from.is_empty() {
            return;
        }
        match self.anchor {
            Anchor::Anywhere => {
                if word.contains(self.from.as_str()) {
                    *word = word.replace(self.from.as_str(), &self.to);
                }
            }
            Anchor::Start => {
                if word.starts_with(self.from.as_str()) {
                    word.replace_range(..self.from.len(), &self.to);
                }
            }
            Anchor::End => {
                if word.ends_with(self.from.as_str()) {
                    let at = word.len() - self.from.len();
                    word.replace_range(at.., &self.to);
                }
            }
        }
    }
}

/// Ordered rewrite rules for the simplified Metaphone transform.
///
/// Rules run in order, each over the output of the previous one, so longer
/// patterns (`sch`, `tch`) must precede the shorter ones they contain, and a
/// leading `x` is rewritten before `sh`/`ch` can produce one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneticRules {
    rules: Vec<PhoneticRule>,
}

impl Default for PhoneticRules {
    fn default() -> Self {
        use Anchor::{Anywhere, End, Start};
        let rules = [
            ("x", "s", Start),
            ("sch", "sk", Anywhere),
            ("tch", "x", Anywhere),
            ("ck", "k", Anywhere),
            ("ph", "f", Anywhere),
            ("th", "0", Anywhere),
            ("sh", "x", Anywhere),
            ("ch", "x", Anywhere),
            ("wh", "w", Anywhere),
            ("dg", "j", Anywhere),
            ("kn", "n", Start),
            ("wr", "r", Start),
            ("gn", "n", Start),
            ("mb", "m", End),
            ("q", "k", Anywhere),
            ("z", "s", Anywhere),
        ]
        .into_iter()
        .map(|(from, to, anchor)| PhoneticRule::new(from, to, anchor))
        .collect();
        Self { rules }
    }
}

impl PhoneticRules {
    /// Build a rule set from an explicit list.
    pub fn new(rules: Vec<PhoneticRule>) -> Self {
        Self { rules }
    }

    /// The default rule set, shared for the life of the process.
    pub fn builtin() -> &'static PhoneticRules {
        static BUILTIN: OnceLock<PhoneticRules> = OnceLock::new();
        BUILTIN.get_or_init(PhoneticRules::default)
    }

    /// The rules, in application order.
    pub fn rules(&self) -> &[PhoneticRule] {
        &self.rules
    }

    /// Encode `text`: strip non-letters, apply every rule in order, truncate
    /// to [`METAPHONE_MAX_LEN`] characters and upper-case.
    pub fn metaphone(&self, text: &str) -> String {
        let mut word: String = text
            .bytes()
            .filter(u8::is_ascii_alphabetic)
            .map(|b| b.to_ascii_lowercase() as char)
            .collect();

        for rule in &self.rules {
            if word.is_empty() {
                break;
            }
            rule.apply(&mut word);
        }

        word.chars()
            .take(METAPHONE_MAX_LEN)
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }
}

/// Encode `text` with the built-in simplified Metaphone rules.
///
/// This is a reduced approximation of Metaphone and intentionally lossy.
///
/// ```
/// use collegematch::phonetic::metaphone;
///
/// assert_eq!(metaphone("Phillips"), "FILLIP");
/// assert_eq!(metaphone("Knight"), "NIGHT");
/// assert_eq!(metaphone("Thomas"), "0OMAS");
/// ```
pub fn metaphone(text: &str) -> String {
    PhoneticRules::builtin().metaphone(text)
}

/// Whether `a` and `b` share a non-empty Soundex code.
pub fn soundex_match(a: &str, b: &str) -> bool {
    let code = soundex(a);
    !code.is_empty() && code == soundex(b)
}

/// Whether `a` and `b` share a non-empty Soundex or Metaphone code.
///
/// ```
/// use collegematch::phonetic::phonetic_match;
///
/// assert!(phonetic_match("Robert", "Rupert"));
/// assert!(!phonetic_match("Pune", "Delhi"));
/// ```
pub fn phonetic_match(a: &str, b: &str) -> bool {
    if soundex_match(a, b) {
        return true;
    }
    let code = metaphone(a);
    !code.is_empty() && code == metaphone(b)
}
