//! URL-safe slug derivation and validation for catalog entries.

/// Maximum slug length, matching the catalog tables' check constraint.
pub const SLUG_MAX_LEN: usize = 50;

/// Transliterate a single Cyrillic letter to Latin, if it is one.
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
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
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Generate a URL-safe slug from a catalog name.
///
/// Lowercases, transliterates Cyrillic, replaces every other non-alphanumeric
/// run with a single hyphen, trims hyphens at both ends and truncates to
/// [`SLUG_MAX_LEN`]. The result is deterministic and may be empty when the
/// name has no usable characters.
pub fn generate_slug(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_hyphen = true;

    for c in name.to_lowercase().chars() {
        if let Some(latin) = transliterate(c) {
            result.push_str(latin);
            prev_hyphen = latin.is_empty() && prev_hyphen;
        } else if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    // Output is pure ASCII, so byte truncation is safe.
    result.truncate(SLUG_MAX_LEN);
    result.trim_matches('-').to_string()
}

/// Validate a client-supplied slug: non-empty, at most [`SLUG_MAX_LEN`]
/// characters, ASCII letters, digits, hyphens and underscores only.
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("This field may not be blank.".into());
    }
    if slug.len() > SLUG_MAX_LEN {
        return Err(format!(
            "Ensure this field has no more than {SLUG_MAX_LEN} characters."
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens.".into(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_basic_name() {
        assert_eq!(generate_slug("Science Fiction"), "science-fiction");
    }

    #[test]
    fn slug_punctuation_collapses() {
        assert_eq!(generate_slug("Rock & Roll!!"), "rock-roll");
        assert_eq!(generate_slug("  --Drama--  "), "drama");
    }

    #[test]
    fn slug_transliterates_cyrillic() {
        assert_eq!(generate_slug("Фильм"), "film");
        assert_eq!(generate_slug("Научная фантастика"), "nauchnaya-fantastika");
    }

    #[test]
    fn slug_is_deterministic() {
        assert_eq!(generate_slug("Film Noir"), generate_slug("Film Noir"));
    }

    #[test]
    fn slug_truncated_without_trailing_hyphen() {
        let name = format!("{} tail", "a".repeat(49));
        let slug = generate_slug(&name);
        assert!(slug.len() <= SLUG_MAX_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn slug_of_symbols_is_empty() {
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn generated_slugs_validate() {
        for name in ["Horror", "Арт-хаус", "Sci-Fi 2000"] {
            assert!(validate_slug(&generate_slug(name)).is_ok(), "{name}");
        }
    }

    #[test]
    fn slug_validation_rejects_bad_input() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("has space").is_err());
        assert!(validate_slug(&"x".repeat(51)).is_err());
        assert!(validate_slug("snake_case-ok").is_ok());
    }
}
