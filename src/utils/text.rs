//! Text normalization helpers for form input.

use chrono::NaiveDate;

/// Display format for dates in records, documents and emails.
///
/// Produces e.g. `Sunday, 01 June 2025`.
pub const DISPLAY_DATE_FORMAT: &str = "%A, %d %B %Y";

/// Title-cases `input`.
///
/// The first letter of every alphabetic run is upper-cased and the rest of the
/// run lower-cased, so `"o'neil DE souza"` becomes `"O'Neil De Souza"`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}

/// Formats a date with [`DISPLAY_DATE_FORMAT`].
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Reduces a name to characters safe for a file name.
///
/// Keeps letters, digits, spaces, dots, hyphens and underscores; everything
/// else is dropped. Falls back to `"Intern"` when nothing survives.
pub fn file_safe_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .collect();
    let cleaned = cleaned.trim().trim_matches('.').trim();

    if cleaned.is_empty() {
        "Intern".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_simple() {
        assert_eq!(title_case("asha rao"), "Asha Rao");
        assert_eq!(title_case("BACKEND"), "Backend");
    }

    #[test]
    fn test_title_case_punctuation_starts_new_word() {
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("data-science"), "Data-Science");
        assert_eq!(title_case("web3 dev"), "Web3 Dev");
    }

    #[test]
    fn test_title_case_keeps_whitespace() {
        assert_eq!(title_case("machine  learning"), "Machine  Learning");
    }

    #[test]
    fn test_format_display_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(format_display_date(date), "Sunday, 01 June 2025");

        let date = NaiveDate::from_ymd_opt(2025, 8, 31).unwrap();
        assert_eq!(format_display_date(date), "Sunday, 31 August 2025");
    }

    #[test]
    fn test_file_safe_name() {
        assert_eq!(file_safe_name("Asha Rao"), "Asha Rao");
        assert_eq!(file_safe_name("../../etc/passwd"), "etcpasswd");
        assert_eq!(file_safe_name("///"), "Intern");
    }
}
