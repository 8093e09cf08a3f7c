use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\.-]+@[\w\.-]+\.\w+$").expect("Invalid email regex"));

pub(crate) static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?\d{10,15}$").expect("Invalid phone regex"));

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?linkedin\.com/.*$").expect("Invalid linkedin regex")
});

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_EXPERIENCE_YEARS: i32 = 50;

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Invalid email format.");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone) {
        return Err("Invalid phone number. Must be 10-15 digits, optionally starting with +.");
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Username is required.");
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err("Username must be at most 150 characters.");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters long.");
    }
    Ok(())
}

pub fn validate_linkedin_url(url: &str) -> Result<(), &'static str> {
    if !LINKEDIN_RE.is_match(url) {
        return Err("Enter a valid LinkedIn URL.");
    }
    Ok(())
}

pub fn validate_experience_years(years: i32) -> Result<(), &'static str> {
    if !(0..=MAX_EXPERIENCE_YEARS).contains(&years) {
        return Err("Experience years must be between 0 and 50.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("jane.doe@example.com").is_ok());
        assert!(validate_email("a-b@mail.example.org").is_ok());
        assert_eq!(validate_email("jane@"), Err("Invalid email format."));
        assert!(validate_email("plainaddress").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+919876543210").is_ok());
        assert!(validate_phone("123456789").is_err());
        assert!(validate_phone("1234567890123456").is_err());
        assert!(validate_phone("98765-43210").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("longenough").is_ok());
        assert_eq!(
            validate_password("short"),
            Err("Password must be at least 8 characters long.")
        );
    }

    #[test]
    fn test_username() {
        assert!(validate_username("student_01").is_ok());
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"x".repeat(151)).is_err());
    }

    #[test]
    fn test_linkedin_and_experience() {
        assert!(validate_linkedin_url("https://www.linkedin.com/in/someone").is_ok());
        assert!(validate_linkedin_url("http://linkedin.com/in/x").is_ok());
        assert!(validate_linkedin_url("https://example.com/in/x").is_err());
        assert!(validate_experience_years(0).is_ok());
        assert!(validate_experience_years(50).is_ok());
        assert!(validate_experience_years(51).is_err());
        assert!(validate_experience_years(-1).is_err());
    }
}
