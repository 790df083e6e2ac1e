//! Contact-detail extraction for the fallback responder.

use std::sync::OnceLock;

use regex::Regex;

use crate::tools::ContactRecord;

const MIN_PHONE_DIGITS: usize = 9;
const MAX_PHONE_DIGITS: usize = 15;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("Invalid email regex")
    })
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\+?\d[\d\s().-]{6,}\d").expect("Invalid phone regex"))
}

/// Two long digit runs around a spaced hyphen: "120000 - 150000", "2015 -2020".
fn range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\d{4,}(?:\s+-\s*|\s*-\s+)\d{4,}").expect("Invalid range regex")
    })
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i:\bmy name is|\bi am|\bi'm)\s+([A-Z][A-Za-z'-]+(?:\s+[A-Z][A-Za-z'-]+)?)")
            .expect("Invalid name regex")
    })
}

pub fn find_email(text: &str) -> Option<&str> {
    email_regex().find(text).map(|m| m.as_str())
}

/// First run of 9 to 15 digits (with common separators) in `text` that is
/// not a numeric range or a list of years.
pub fn find_phone(text: &str) -> Option<&str> {
    phone_regex()
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
            (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
                && !range_regex().is_match(candidate)
                && !is_year_list(candidate)
        })
}

/// "2015-2020 2021": every digit group is a plausible year.
fn is_year_list(candidate: &str) -> bool {
    let groups: Vec<&str> = candidate
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect();
    groups.len() > 1
        && groups.iter().all(|g| {
            g.len() == 4 && g.parse::<u16>().is_ok_and(|year| (1900..=2099).contains(&year))
        })
}

/// A capitalized name introduced by "my name is", "I am" or "I'm".
pub fn find_name(text: &str) -> Option<&str> {
    name_regex()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Removes email addresses from `text`.
pub fn strip_emails(text: &str) -> String {
    email_regex().replace_all(text, " ").into_owned()
}

/// Builds a contact record when `message` carries an email or phone number.
/// The whole message is kept as notes.
pub fn extract_contact(message: &str) -> Option<ContactRecord> {
    let email = find_email(message);
    // an email's digits are not a phone number
    let phone = find_phone(&strip_emails(message)).map(str::to_string);
    if email.is_none() && phone.is_none() {
        return None;
    }

    Some(ContactRecord {
        name: find_name(message).map(str::to_string),
        email: email.map(str::to_string),
        phone,
        notes: Some(message.trim().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_email_excludes_trailing_period() {
        assert_eq!(find_email("mail me at ann.lee@example.com."), Some("ann.lee@example.com"));
    }

    #[test]
    fn test_find_email_none() {
        assert_eq!(find_email("my handle is @ann"), None);
    }

    #[test]
    fn test_find_phone_with_separators() {
        assert_eq!(find_phone("call +1 (555) 123-4567 today"), Some("+1 (555) 123-4567"));
    }

    #[test]
    fn test_year_range_is_not_a_phone() {
        assert_eq!(find_phone("worked there 2017-2020"), None);
    }

    #[test]
    fn test_salary_range_is_not_a_phone() {
        assert_eq!(find_phone("a salary of 120000 - 150000 works"), None);
        assert!(extract_contact("Is a salary of 120000 - 150000 in your experience range?").is_none());
    }

    #[test]
    fn test_year_lists_are_not_phones() {
        assert_eq!(find_phone("at Acme 2015 - 2020 2021"), None);
        assert_eq!(find_phone("at Acme 2015-2020 2021"), None);
    }

    #[test]
    fn test_hyphenated_phone_still_matches() {
        assert_eq!(find_phone("call 0161-496-0000"), Some("0161-496-0000"));
    }

    #[test]
    fn test_find_name_requires_capitalized_name() {
        assert_eq!(find_name("Hi, my name is Ann Lee and I'm hiring"), Some("Ann Lee"));
        assert_eq!(find_name("I am interested in your work"), None);
        assert_eq!(find_name("This is Great work, ping me at a@b.io"), None);
    }

    #[test]
    fn test_extract_contact_builds_record() {
        let contact = extract_contact("I'm Bob, reach me at bob@corp.io").unwrap();
        assert_eq!(contact.name.as_deref(), Some("Bob"));
        assert_eq!(contact.email.as_deref(), Some("bob@corp.io"));
        assert_eq!(contact.phone, None);
        assert_eq!(contact.notes.as_deref(), Some("I'm Bob, reach me at bob@corp.io"));
    }

    #[test]
    fn test_extract_contact_phone_only() {
        let contact = extract_contact("ring me on 07700 900123").unwrap();
        assert_eq!(contact.email, None);
        assert_eq!(contact.phone.as_deref(), Some("07700 900123"));
    }

    #[test]
    fn test_email_digits_are_not_a_phone() {
        let contact = extract_contact("ann123456789@example.com").unwrap();
        assert_eq!(contact.phone, None);
    }

    #[test]
    fn test_extract_contact_none() {
        assert!(extract_contact("what are your skills?").is_none());
    }
}
