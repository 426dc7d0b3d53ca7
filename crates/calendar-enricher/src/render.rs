//! Invitation body rendering.

use cms_client::JoinDetails;

/// Text substituted for a placeholder whose value is absent from the mapping.
pub const MISSING_VALUE: &str = "-";

const WEB_LINK_PLACEHOLDER: &str = "{{WEB_LINK}}";
const SIP_ADDRESS_PLACEHOLDER: &str = "{{SIP_ADDRESS}}";
const PIN_PLACEHOLDER: &str = "{{PIN}}";
const CALL_ID_PLACEHOLDER: &str = "{{callid}}";

/// The detail mapping consumed by the renderer.
///
/// Every field is optional; absent values render as [`MISSING_VALUE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvitationFields {
    pub web_link: Option<String>,
    pub sip_address: Option<String>,
    pub pin: Option<String>,
    pub call_id: Option<String>,
}

impl From<&JoinDetails> for InvitationFields {
    fn from(details: &JoinDetails) -> Self {
        Self {
            web_link: Some(details.web_link.clone()),
            sip_address: Some(details.sip_address.clone()),
            pin: Some(details.pin.clone()),
            call_id: Some(details.call_id.clone()),
        }
    }
}

/// Append the rendered join-details template to an existing event body.
///
/// Pure and deterministic: the existing body is kept as-is, followed by a
/// `<br><br>` separator and the template with all four placeholders
/// substituted. No placeholder survives in the output.
pub fn render_invitation(existing_body: &str, template: &str, fields: &InvitationFields) -> String {
    let value = |field: &Option<String>| -> String {
        field.clone().unwrap_or_else(|| MISSING_VALUE.to_string())
    };

    let rendered = template
        .replace(WEB_LINK_PLACEHOLDER, &value(&fields.web_link))
        .replace(SIP_ADDRESS_PLACEHOLDER, &value(&fields.sip_address))
        .replace(PIN_PLACEHOLDER, &value(&fields.pin))
        .replace(CALL_ID_PLACEHOLDER, &value(&fields.call_id));

    format!("{existing_body}<br><br>{rendered}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str =
        "Join: {{WEB_LINK}}<br>SIP: {{SIP_ADDRESS}}<br>ID: {{callid}}<br>PIN: {{PIN}}";

    fn full_fields() -> InvitationFields {
        InvitationFields {
            web_link: Some("https://wb/meeting/123?secret=abc".to_string()),
            sip_address: Some("sip123@x.com".to_string()),
            pin: Some("нет".to_string()),
            call_id: Some("123".to_string()),
        }
    }

    #[test]
    fn test_all_placeholders_substituted() {
        let body = render_invitation("<p>agenda</p>", TEMPLATE, &full_fields());

        assert!(body.starts_with("<p>agenda</p><br><br>"));
        assert!(body.contains("https://wb/meeting/123?secret=abc"));
        assert!(body.contains("sip123@x.com"));
        assert!(body.contains("ID: 123"));
        assert!(body.contains("PIN: нет"));
        assert!(!body.contains("{{"));
    }

    #[test]
    fn test_missing_pin_renders_dash() {
        let mut fields = full_fields();
        fields.pin = None;

        let body = render_invitation("", TEMPLATE, &fields);
        assert!(body.contains("PIN: -"));
        assert!(body.contains("sip123@x.com"));
        assert!(body.contains("ID: 123"));
        assert!(!body.contains("{{"));
    }

    #[test]
    fn test_empty_mapping_renders_dashes_everywhere() {
        let body = render_invitation("", TEMPLATE, &InvitationFields::default());
        assert_eq!(body, "<br><br>Join: -<br>SIP: -<br>ID: -<br>PIN: -");
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let first = render_invitation("<p>agenda</p>", TEMPLATE, &full_fields());
        let second = render_invitation("<p>agenda</p>", TEMPLATE, &full_fields());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_body_keeps_separator() {
        let body = render_invitation("", "text", &InvitationFields::default());
        assert_eq!(body, "<br><br>text");
    }

    #[test]
    fn test_repeated_placeholders_all_substituted() {
        let body = render_invitation(
            "",
            "{{PIN}} and again {{PIN}}",
            &InvitationFields {
                pin: Some("42".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(body, "<br><br>42 and again 42");
    }
}
