use serde::{Serialize, Serializer};

use crate::domain::value::{Recipient, SenderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
/// Transport route a message may be restricted to.
pub enum Channel {
    Sms,
    Viber,
    Whatsapp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// File attached to a message: a display name and a path.
///
/// The pair is opaque to this crate and passed through unmodified.
pub struct Attachment {
    #[serde(rename = "filename")]
    file_name: String,
    path: String,
}

impl Attachment {
    /// Create an attachment from a display name and a path.
    pub fn new(file_name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            path: path.into(),
        }
    }

    /// Display name (`name.ext`).
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Path to the file contents.
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Fully-resolved message in its serialized wire shape.
///
/// Field names follow the gateway contract: `from`, `to`, `allowedChannels`,
/// `body`, `attachment`. The channel restriction serializes as a one-element
/// array of route names and is omitted entirely when no restriction was set;
/// the attachment is likewise omitted when absent. Subject and scheduling are
/// transport-level metadata and are never part of this shape.
pub struct Message {
    from: Option<SenderId>,
    to: Vec<Recipient>,
    #[serde(
        rename = "allowedChannels",
        skip_serializing_if = "Option::is_none",
        serialize_with = "channel_names"
    )]
    allowed_channels: Option<Channel>,
    body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<Attachment>,
}

impl Message {
    /// Assemble a message from its resolved parts.
    pub fn new(
        from: Option<SenderId>,
        to: Vec<Recipient>,
        allowed_channels: Option<Channel>,
        body: impl Into<String>,
        attachment: Option<Attachment>,
    ) -> Self {
        Self {
            from,
            to,
            allowed_channels,
            body: body.into(),
            attachment,
        }
    }

    /// Sender id, if one was set.
    pub fn from(&self) -> Option<&SenderId> {
        self.from.as_ref()
    }

    /// Destination recipients in insertion order.
    pub fn recipients(&self) -> &[Recipient] {
        &self.to
    }

    /// Channel restriction, if one was set.
    pub fn allowed_channels(&self) -> Option<Channel> {
        self.allowed_channels
    }

    /// Resolved text body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Attachment, if one was set.
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }
}

fn channel_names<S>(value: &Option<Channel>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(channel) => [*channel].serialize(serializer),
        // skip_serializing_if drops the field before this is reached
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn recipients() -> Vec<Recipient> {
        vec![Recipient::new("+15551234567").unwrap()]
    }

    #[test]
    fn message_serializes_with_wire_field_names() {
        let message = Message::new(
            Some(SenderId::new("ACME").unwrap()),
            recipients(),
            Some(Channel::Viber),
            "Hello",
            Some(Attachment::new("invoice.pdf", "/tmp/invoice.pdf")),
        );

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "from": "ACME",
                "to": ["+15551234567"],
                "allowedChannels": ["viber"],
                "body": "Hello",
                "attachment": { "filename": "invoice.pdf", "path": "/tmp/invoice.pdf" },
            })
        );
    }

    #[test]
    fn unset_channel_and_attachment_are_omitted() {
        let message = Message::new(None, recipients(), None, "Hello", None);

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "from": null,
                "to": ["+15551234567"],
                "body": "Hello",
            })
        );
    }

    #[test]
    fn channel_names_are_lowercase() {
        assert_eq!(serde_json::to_value(Channel::Sms).unwrap(), "sms");
        assert_eq!(serde_json::to_value(Channel::Viber).unwrap(), "viber");
        assert_eq!(serde_json::to_value(Channel::Whatsapp).unwrap(), "whatsapp");
    }
}
