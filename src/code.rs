use crate::error::{MorseError, MorseResult};
use lazy_static::lazy_static;
use regex::Regex;

/// Longest text accepted by the sound paths.
pub const MAX_SOUND_CHARS: usize = 750;

/// Prosign returned for eight dits.
pub const ERROR_PROSIGN: &str = "ERR";

/// Characters and their codes, `0` for dit and `1` for dah.
const TABLE: &[(&str, &str)] = &[
    (" ", ""),
    ("!", "101011"),
    ("$", "0001001"),
    ("\"", "010010"),
    ("'", "011110"),
    ("(", "10110"),
    (")", "101101"),
    (",", "110011"),
    ("-", "100001"),
    (".", "010101"),
    ("/", "10010"),
    ("0", "11111"),
    ("1", "01111"),
    ("2", "00111"),
    ("3", "00011"),
    ("4", "00001"),
    ("5", "00000"),
    ("6", "10000"),
    ("7", "11000"),
    ("8", "11100"),
    ("9", "11110"),
    (":", "111000"),
    (";", "101010"),
    ("=", "10001"),
    ("?", "001100"),
    ("@", "011010"),
    ("A", "01"),
    ("B", "1000"),
    ("C", "1010"),
    ("D", "100"),
    ("E", "0"),
    ("F", "0010"),
    ("G", "110"),
    ("H", "0000"),
    ("I", "00"),
    ("J", "0111"),
    ("K", "101"),
    ("L", "0100"),
    ("M", "11"),
    ("N", "10"),
    ("O", "111"),
    ("P", "0110"),
    ("Q", "1101"),
    ("R", "010"),
    ("S", "000"),
    ("T", "1"),
    ("U", "001"),
    ("V", "0001"),
    ("W", "011"),
    ("X", "1001"),
    ("Y", "1011"),
    ("Z", "1100"),
    ("_", "001101"),
    (ERROR_PROSIGN, "00000000"),
];

/// Hex byte pairs used for dit and dah.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HexAlphabet {
    /// ASCII `.` and `-`: `2E` / `2D`.
    Morse,
    /// ASCII `0` and `1`: `30` / `31`.
    Binary,
}

impl HexAlphabet {
    fn symbols(self) -> (&'static str, &'static str) {
        match self {
            HexAlphabet::Morse => ("2E", "2D"),
            HexAlphabet::Binary => ("30", "31"),
        }
    }
}

const HEX_SPACE: &str = "20";

lazy_static! {
    static ref UNSUPPORTED: Regex = Regex::new(r#"[^a-zA-Z0-9!'"@/_=\s$(),.:;?\-]+"#).unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref MORSE: Regex = Regex::new(r"^[10\s.\-]+$").unwrap();
    static ref SPACE_RUNS: Regex = Regex::new(r"\s{2,}").unwrap();
}

fn binary_code(c: char) -> Option<&'static str> {
    let upper = c.to_ascii_uppercase();
    TABLE
        .iter()
        .find(|(key, _)| key.len() == 1 && key.starts_with(upper))
        .map(|&(_, code)| code)
}

fn character(code: &str) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|&&(key, value)| value == code && key != " ")
        .map(|&(key, _)| key)
}

/// Replace unsupported characters by spaces and collapse whitespace.
pub fn sanitize(text: &str) -> String {
    let text = UNSUPPORTED.replace_all(text, " ");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn encode_with(text: &str, dit: char, dah: char) -> String {
    let groups: Vec<String> = sanitize(text)
        .chars()
        .filter_map(binary_code)
        .map(|code| {
            code.chars()
                .map(|bit| if bit == '0' { dit } else { dah })
                .collect()
        })
        .collect();
    groups.join(" ").trim_matches(' ').to_string()
}

/// Dot/dash morse for `text`; letters are separated by one space, words by two.
pub fn encode(text: &str) -> String {
    encode_with(text, '.', '-')
}

/// Same as [`encode`] with `0` for dit and `1` for dah.
pub fn encode_binary(text: &str) -> String {
    encode_with(text, '0', '1')
}

/// Text for dot/dash or binary morse.
pub fn decode(morse: &str) -> MorseResult<String> {
    let morse = morse.replace('\t', " ");
    if !MORSE.is_match(&morse) {
        return Err(MorseError::InvalidMorse(morse));
    }
    let mut text = String::new();
    for group in morse.split(' ') {
        if group.is_empty() {
            text.push(' ');
            continue;
        }
        if group.len() > 8 {
            continue;
        }
        let code: String = group
            .chars()
            .map(|c| match c {
                '.' => '0',
                '-' => '1',
                other => other,
            })
            .collect();
        match character(&code) {
            Some(c) => text.push_str(c),
            None => log::debug!("skipping unknown morse group {group:?}"),
        }
    }
    Ok(SPACE_RUNS.replace_all(&text, " ").into_owned())
}

/// Space separated hex bytes for the morse of `text`.
pub fn encode_hex(text: &str, alphabet: HexAlphabet) -> String {
    let (dit, dah) = alphabet.symbols();
    let pairs: Vec<&str> = encode_binary(text)
        .chars()
        .map(|c| match c {
            '0' => dit,
            '1' => dah,
            _ => HEX_SPACE,
        })
        .collect();
    pairs.join(" ")
}

/// Text for hex morse produced by [`encode_hex`] with the same alphabet.
pub fn decode_hex(hex: &str, alphabet: HexAlphabet) -> MorseResult<String> {
    let (dit, dah) = alphabet.symbols();
    let compact: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() || compact.len() % 2 != 0 || !compact.is_ascii() {
        return Err(MorseError::InvalidHex(hex.to_string()));
    }
    let mut morse = String::with_capacity(compact.len() / 2);
    for i in (0..compact.len()).step_by(2) {
        let pair = compact[i..i + 2].to_ascii_uppercase();
        match pair.as_str() {
            p if p == dit => morse.push('0'),
            p if p == dah => morse.push('1'),
            HEX_SPACE => morse.push(' '),
            _ => return Err(MorseError::InvalidHex(hex.to_string())),
        }
    }
    decode(morse.trim_matches(' '))
}

/// First [`MAX_SOUND_CHARS`] characters of `text`.
pub fn limit_input(text: &str) -> &str {
    match text.char_indices().nth(MAX_SOUND_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Length of one element in milliseconds, 50 elements per word.
pub fn element_millis(wpm: f64) -> f64 {
    if wpm > 0.0 {
        60_000.0 / (50.0 * wpm)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encode_words() {
        assert_eq!(encode("sos sos"), "... --- ...  ... --- ...");
        assert_eq!(encode_binary("Paris"), "0110 01 010 00 000");
    }

    #[test]
    fn encode_drops_unsupported_characters() {
        assert_eq!(sanitize("  hi#~there\t\tyou "), "hi there you");
        assert_eq!(encode("e#t"), ".  -");
        assert_eq!(encode(""), "");
    }

    #[test]
    fn decode_words() {
        assert_eq!(decode("... ---  ...  ---").unwrap(), "SO S O");
        assert_eq!(decode("0110 01 010 00 000").unwrap(), "PARIS");
        assert_eq!(decode(&encode("hello, world?")).unwrap(), "HELLO, WORLD?");
    }

    #[test]
    fn decode_error_prosign_and_long_groups() {
        assert_eq!(decode("........").unwrap(), ERROR_PROSIGN);
        assert_eq!(decode("......... .").unwrap(), "E");
    }

    #[test]
    fn patterns_are_reused_across_calls() {
        for _ in 0..3 {
            assert_eq!(decode(&encode("cq  cq\tdx")).unwrap(), "CQ CQ DX");
        }
        assert!(MORSE.is_match(".- 01"));
        assert!(!MORSE.is_match("a"));
    }

    #[test]
    fn decode_rejects_text() {
        assert!(matches!(decode("sos"), Err(MorseError::InvalidMorse(_))));
    }

    #[test]
    fn hex_encoding() {
        assert_eq!(encode_hex("et", HexAlphabet::Morse), "2E 20 2D");
        assert_eq!(encode_hex("e t", HexAlphabet::Morse), "2E 20 20 2D");
        assert_eq!(encode_hex("a", HexAlphabet::Binary), "30 31");
        assert_eq!(encode_hex("an", HexAlphabet::Binary), "30 31 20 31 30");
    }

    #[test]
    fn hex_decoding() {
        let hex = encode_hex("cq de k1abc", HexAlphabet::Morse);
        assert_eq!(decode_hex(&hex, HexAlphabet::Morse).unwrap(), "CQ DE K1ABC");
        let hex = encode_hex("paris paris", HexAlphabet::Binary);
        assert_eq!(
            decode_hex(&hex, HexAlphabet::Binary).unwrap(),
            "PARIS PARIS"
        );
        assert!(decode_hex("2E 2D", HexAlphabet::Binary).is_err());
        assert!(decode_hex("zz", HexAlphabet::Morse).is_err());
    }

    #[test]
    fn sound_input_is_capped() {
        let text = "é".repeat(MAX_SOUND_CHARS + 10);
        assert_eq!(limit_input(&text).chars().count(), MAX_SOUND_CHARS);
        assert_eq!(limit_input("paris"), "paris");
    }

    #[test]
    fn element_duration() {
        assert_eq!(element_millis(20.), 60.);
        assert_eq!(element_millis(0.), 0.);
        assert_eq!(element_millis(-3.), 0.);
    }
}
