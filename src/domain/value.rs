use crate::domain::validation::ValidationError;

use phonenumber::country;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
/// Sender id shown to the recipient (`from`).
///
/// Invariant: non-empty after trimming. Gateways conventionally cap this at
/// 11 alphanumeric characters; that convention is not enforced here.
pub struct SenderId(String);

impl SenderId {
    /// Wire field name (`from`).
    pub const FIELD: &'static str = "from";

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
/// Destination phone number as handed to the notifier (`to`).
///
/// Invariant: non-empty after trimming. This type does not normalize; if you
/// want E.164 normalization, parse into [`PhoneNumber`] and convert it into
/// [`Recipient`].
pub struct Recipient(String);

impl Recipient {
    /// Wire field name (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated (non-empty) recipient.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as handed to the notifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for Recipient {
    /// Convert an already-parsed phone number to a normalized recipient (E.164).
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
}

impl PhoneNumber {
    /// Wire field name (`to`).
    pub const FIELD: &'static str = "to";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit
    /// country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164 })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway API key sent with every dispatch request.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// HTTP header carrying the key.
    pub const HEADER: &'static str = "X-Api-Key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "api key" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_newtypes_trim_or_reject() {
        let sender = SenderId::new(" ACME ").unwrap();
        assert_eq!(sender.as_str(), "ACME");
        assert!(SenderId::new("   ").is_err());

        let recipient = Recipient::new(" +15551234567 ").unwrap();
        assert_eq!(recipient.as_str(), "+15551234567");
        assert!(Recipient::new("").is_err());

        let key = ApiKey::new(" secret ").unwrap();
        assert_eq!(key.as_str(), "secret");
        assert!(ApiKey::new("  ").is_err());
    }

    #[test]
    fn phone_number_parsing_and_equality_use_e164() {
        let p1 = PhoneNumber::parse(None, "+15551234567").unwrap();
        let p2 = PhoneNumber::parse(None, "+1 555-123-4567").unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p1.e164(), "+15551234567");
        assert_eq!(p1.raw(), "+15551234567");

        let recipient: Recipient = p1.into();
        assert_eq!(recipient.as_str(), "+15551234567");
        assert!(PhoneNumber::parse(None, "not-a-number").is_err());
    }

    #[test]
    fn sender_and_recipient_serialize_as_plain_strings() {
        let sender = SenderId::new("ACME").unwrap();
        assert_eq!(serde_json::to_value(&sender).unwrap(), "ACME");

        let recipient = Recipient::new("+15551234567").unwrap();
        assert_eq!(serde_json::to_value(&recipient).unwrap(), "+15551234567");
    }
}
