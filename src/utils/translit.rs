//! Russian Cyrillic to Latin transliteration.
//!
//! Matches the scheme the auditory table was seeded with: `ц` is `c`,
//! `й` is `j`, `ы` is `y` (`Лекционный зал` → `Lekcionnyj zal`).

fn latin_for(c: char) -> Option<&'static str> {
    let mapped = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "c",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shh",
        'ъ' => "",
        'ы' => "y",
        'ь' => "'",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(mapped)
}

/// Transliterates Cyrillic letters; everything else is copied as is.
pub fn to_latin(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        match latin_for(lower) {
            Some(latin) if lower != c => {
                let mut chars = latin.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                }
            }
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::auditory_names::AUDITORY_NAMES;

    #[test]
    fn test_seeded_labels_transliterate_to_canonical_names() {
        for (canonical, display) in AUDITORY_NAMES {
            assert_eq!(to_latin(display), *canonical, "label {display}");
        }
    }

    #[test]
    fn test_uppercase_digraphs() {
        assert_eq!(to_latin("Жуков"), "Zhukov");
        assert_eq!(to_latin("ЧАЙ"), "ChAJ");
    }

    #[test]
    fn test_latin_and_punctuation_untouched() {
        assert_eq!(to_latin("Room 4.2-b"), "Room 4.2-b");
        assert_eq!(to_latin(""), "");
    }
}
