//! SOAP request builders for the three EWS operations the gateway uses.

use chrono::{DateTime, Utc};

const ENVELOPE_OPEN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"
               xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types"
               xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages">"#;

/// Escape text for inclusion in XML content or attribute values.
pub(crate) fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn header(mailbox: &str) -> String {
    format!(
        r#"<soap:Header>
    <t:RequestServerVersion Version="Exchange2013_SP1"/>
    <t:ExchangeImpersonation>
      <t:ConnectingSID>
        <t:PrimarySmtpAddress>{}</t:PrimarySmtpAddress>
      </t:ConnectingSID>
    </t:ExchangeImpersonation>
  </soap:Header>"#,
        xml_escape(mailbox)
    )
}

/// `FindItem` on the mailbox's calendar folder: events starting strictly
/// after `after`, sorted by start descending, at most `limit` entries.
pub(crate) fn find_item_request(mailbox: &str, after: DateTime<Utc>, limit: usize) -> String {
    format!(
        r#"{open}
  {header}
  <soap:Body>
    <m:FindItem Traversal="Shallow">
      <m:ItemShape>
        <t:BaseShape>IdOnly</t:BaseShape>
        <t:AdditionalProperties>
          <t:FieldURI FieldURI="item:Subject"/>
          <t:FieldURI FieldURI="item:DateTimeCreated"/>
          <t:FieldURI FieldURI="calendar:Start"/>
          <t:FieldURI FieldURI="calendar:Location"/>
          <t:FieldURI FieldURI="calendar:Organizer"/>
        </t:AdditionalProperties>
      </m:ItemShape>
      <m:IndexedPageItemView MaxEntriesReturned="{limit}" Offset="0" BasePoint="Beginning"/>
      <m:Restriction>
        <t:IsGreaterThan>
          <t:FieldURI FieldURI="calendar:Start"/>
          <t:FieldURIOrConstant>
            <t:Constant Value="{after}"/>
          </t:FieldURIOrConstant>
        </t:IsGreaterThan>
      </m:Restriction>
      <m:SortOrder>
        <t:FieldOrder Order="Descending">
          <t:FieldURI FieldURI="calendar:Start"/>
        </t:FieldOrder>
      </m:SortOrder>
      <m:ParentFolderIds>
        <t:DistinguishedFolderId Id="calendar">
          <t:Mailbox>
            <t:EmailAddress>{mailbox}</t:EmailAddress>
          </t:Mailbox>
        </t:DistinguishedFolderId>
      </m:ParentFolderIds>
    </m:FindItem>
  </soap:Body>
</soap:Envelope>"#,
        open = ENVELOPE_OPEN,
        header = header(mailbox),
        limit = limit,
        after = after.format("%Y-%m-%dT%H:%M:%SZ"),
        mailbox = xml_escape(mailbox),
    )
}

/// `GetItem` fetching the HTML bodies of the given `(id, change_key)` items.
pub(crate) fn get_item_request(mailbox: &str, items: &[(String, String)]) -> String {
    let mut item_ids = String::new();
    for (id, change_key) in items {
        item_ids.push_str(&format!(
            r#"<t:ItemId Id="{}" ChangeKey="{}"/>"#,
            xml_escape(id),
            xml_escape(change_key)
        ));
    }

    format!(
        r#"{open}
  {header}
  <soap:Body>
    <m:GetItem>
      <m:ItemShape>
        <t:BaseShape>IdOnly</t:BaseShape>
        <t:BodyType>HTML</t:BodyType>
        <t:AdditionalProperties>
          <t:FieldURI FieldURI="item:Body"/>
        </t:AdditionalProperties>
      </m:ItemShape>
      <m:ItemIds>{item_ids}</m:ItemIds>
    </m:GetItem>
  </soap:Body>
</soap:Envelope>"#,
        open = ENVELOPE_OPEN,
        header = header(mailbox),
        item_ids = item_ids,
    )
}

/// `UpdateItem` replacing the event body. The save persists the change and
/// sends updated invitations to every attendee with a copy for the organizer.
pub(crate) fn update_body_request(
    mailbox: &str,
    event_id: &str,
    change_key: &str,
    body: &str,
) -> String {
    format!(
        r#"{open}
  {header}
  <soap:Body>
    <m:UpdateItem MessageDisposition="SaveOnly" ConflictResolution="AlwaysOverwrite" SendMeetingInvitationsOrCancellations="SendToAllAndSaveCopy">
      <m:ItemChanges>
        <t:ItemChange>
          <t:ItemId Id="{id}" ChangeKey="{change_key}"/>
          <t:Updates>
            <t:SetItemField>
              <t:FieldURI FieldURI="item:Body"/>
              <t:CalendarItem>
                <t:Body BodyType="HTML">{body}</t:Body>
              </t:CalendarItem>
            </t:SetItemField>
          </t:Updates>
        </t:ItemChange>
      </m:ItemChanges>
    </m:UpdateItem>
  </soap:Body>
</soap:Envelope>"#,
        open = ENVELOPE_OPEN,
        header = header(mailbox),
        id = xml_escape(event_id),
        change_key = xml_escape(change_key),
        body = xml_escape(body),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_xml_escape() {
        assert_eq!(
            xml_escape(r#"<a href="x">Q&A's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Q&amp;A&apos;s&lt;/a&gt;"
        );
        assert_eq!(xml_escape("plain"), "plain");
    }

    #[test]
    fn test_find_item_request_shape() {
        let after = Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap();
        let request = find_item_request("a@x.com", after, 20);

        assert!(request.contains("<t:PrimarySmtpAddress>a@x.com</t:PrimarySmtpAddress>"));
        assert!(request.contains(r#"MaxEntriesReturned="20""#));
        assert!(request.contains(r#"<t:Constant Value="2026-08-06T10:00:00Z"/>"#));
        assert!(request.contains(r#"<t:FieldOrder Order="Descending">"#));
        assert!(request.contains(r#"<t:DistinguishedFolderId Id="calendar">"#));
    }

    #[test]
    fn test_update_request_escapes_body() {
        let request = update_body_request("a@x.com", "AA==", "CK", "<p>join & dial</p>");
        assert!(request.contains("&lt;p&gt;join &amp; dial&lt;/p&gt;"));
        assert!(request.contains(r#"SendMeetingInvitationsOrCancellations="SendToAllAndSaveCopy""#));
        assert!(request.contains(r#"MessageDisposition="SaveOnly""#));
    }
}
