/// Denylist word filter applied to zinger bodies
///
/// Whole words only, case-insensitive. "stupid" also swallows one trailing "!".

use lazy_static::lazy_static;
use regex::Regex;

const REPLACEMENT: &str = "****";

lazy_static! {
    static ref DENYLIST: [Regex; 3] = [
        Regex::new(r"(?i)\bstupid\b!?").unwrap(),
        Regex::new(r"(?i)\bidiot\b").unwrap(),
        Regex::new(r"(?i)\bdumb\b").unwrap(),
    ];
}

pub fn censor_zinger(input: &str) -> String {
    DENYLIST.iter().fold(input.to_string(), |text, pattern| {
        pattern.replace_all(&text, REPLACEMENT).into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_is_unchanged() {
        let text = "I really need a kerfuffle to go to bed sooner";
        assert_eq!(censor_zinger(text), text);
    }

    #[test]
    fn test_denylisted_words_are_replaced() {
        assert_eq!(
            censor_zinger("That was a dumb idea, you idiot"),
            "That was a **** idea, you ****"
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(censor_zinger("STUPID Dumb IdIoT"), "**** **** ****");
    }

    #[test]
    fn test_stupid_swallows_exclamation() {
        assert_eq!(censor_zinger("so stupid! really"), "so **** really");
    }

    #[test]
    fn test_partial_words_are_kept() {
        assert_eq!(censor_zinger("stupidity dumbbell idiotic"), "stupidity dumbbell idiotic");
    }
}
