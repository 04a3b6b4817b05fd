//! Quote request form: the submitted fields and their validation

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{ContactFormConfig, FormOption};

/// A quote request as posted by the contact page form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    /// Community or town, free text
    pub location: String,
    /// Insurance line of interest (an option value)
    pub interest: String,
    /// How the visitor heard about the brokerage (an option value)
    pub referral: String,
    pub comments: String,
    #[serde(deserialize_with = "checkbox")]
    pub consent: bool,
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// HTML checkboxes post "on" when ticked and nothing otherwise
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "yes" | "1"
    ))
}

const MAX_FIELD_LEN: usize = 200;
const MAX_COMMENTS_LEN: usize = 5000;

impl QuoteRequest {
    /// Check every field, collecting all problems rather than the first
    pub fn validate(&self, form: &ContactFormConfig) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        for (field, value, label) in [
            ("first_name", &self.first_name, "First name"),
            ("last_name", &self.last_name, "Last name"),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, &format!("{} is required", label)));
            } else if value.chars().count() > MAX_FIELD_LEN {
                errors.push(FieldError::new(field, &format!("{} is too long", label)));
            }
        }

        if self.phone.trim().is_empty() {
            errors.push(FieldError::new("phone", "Phone number is required"));
        } else if !is_valid_phone(&self.phone) {
            errors.push(FieldError::new("phone", "Phone number must have 7 to 15 digits"));
        }

        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "Email address is required"));
        } else if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Email address is not valid"));
        }

        if self.location.chars().count() > MAX_FIELD_LEN {
            errors.push(FieldError::new("location", "Location is too long"));
        }

        if self.interest.trim().is_empty() {
            errors.push(FieldError::new("interest", "Please choose an insurance interest"));
        } else if !is_option(&form.interests, &self.interest) {
            errors.push(FieldError::new("interest", "Unknown insurance interest"));
        }

        if !self.referral.trim().is_empty() && !is_option(&form.referrals, &self.referral) {
            errors.push(FieldError::new("referral", "Unknown referral source"));
        }

        if self.comments.chars().count() > MAX_COMMENTS_LEN {
            errors.push(FieldError::new("comments", "Comments are too long"));
        }

        if !self.consent {
            errors.push(FieldError::new(
                "consent",
                "Please agree to be contacted about your quote",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Label of the chosen interest, falling back to the raw value
    pub fn interest_label<'a>(&'a self, form: &'a ContactFormConfig) -> &'a str {
        form.interests
            .iter()
            .find(|o| o.value == self.interest.trim())
            .map(|o| o.label.as_str())
            .unwrap_or(self.interest.as_str())
    }
}

fn is_option(options: &[FormOption], value: &str) -> bool {
    let value = value.trim();
    options.iter().any(|o| o.value == value)
}

/// Digits plus common separators, 7 to 15 digits (E.164 upper bound)
fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '.' | '+'));
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    allowed && (7..=15).contains(&digits)
}

/// One `@`, a non-empty local part, and a dotted domain
fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> QuoteRequest {
        QuoteRequest {
            first_name: "Lena".to_string(),
            last_name: "Begay".to_string(),
            phone: "(928) 871-4000".to_string(),
            email: "lena@example.com".to_string(),
            location: "Window Rock".to_string(),
            interest: "homeowners".to_string(),
            referral: "community".to_string(),
            comments: String::new(),
            consent: true,
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_request() {
        let form = ContactFormConfig::default();
        assert!(valid().validate(&form).is_ok());
        assert_eq!(valid().interest_label(&form), "Homeowners Insurance");
        assert_eq!(valid().full_name(), "Lena Begay");
    }

    #[test]
    fn test_empty_request_reports_every_required_field() {
        let errors = QuoteRequest::default()
            .validate(&ContactFormConfig::default())
            .unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["first_name", "last_name", "phone", "email", "interest", "consent"]
        );
    }

    #[test]
    fn test_bad_contact_details() {
        let mut req = valid();
        req.phone = "call me".to_string();
        req.email = "lena@localhost".to_string();
        let errors = req.validate(&ContactFormConfig::default()).unwrap_err();
        assert_eq!(fields(&errors), vec!["phone", "email"]);

        req.phone = "+1 800 346 3365".to_string();
        req.email = "a@@b.com".to_string();
        let errors = req.validate(&ContactFormConfig::default()).unwrap_err();
        assert_eq!(fields(&errors), vec!["email"]);
    }

    #[test]
    fn test_unknown_options_rejected() {
        let mut req = valid();
        req.interest = "boats".to_string();
        req.referral = "billboard".to_string();
        let errors = req.validate(&ContactFormConfig::default()).unwrap_err();
        assert_eq!(fields(&errors), vec!["interest", "referral"]);
    }

    #[test]
    fn test_form_decoding() {
        let body = "first_name=Lena&last_name=Begay&phone=5053684000&email=l%40x.org&interest=auto&consent=on";
        let req: QuoteRequest = serde_json::from_value(form_to_json(body)).unwrap();
        assert!(req.consent);
        assert_eq!(req.email, "l@x.org");
        assert!(req.referral.is_empty());
        assert!(req.validate(&ContactFormConfig::default()).is_ok());
    }

    // Decode an urlencoded body into a JSON object of strings, the same
    // shape the server's form extractor hands to serde
    fn form_to_json(body: &str) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = body
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| {
                let v = percent_encoding::percent_decode_str(v)
                    .decode_utf8_lossy()
                    .to_string();
                (k.to_string(), serde_json::Value::String(v))
            })
            .collect();
        serde_json::Value::Object(map)
    }
}
