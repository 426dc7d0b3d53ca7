//! Parsing of EWS SOAP responses.

use std::collections::HashMap;

use calendar_core::{CalendarError, CalendarEvent};
use chrono::{DateTime, Utc};
use roxmltree::{Document, Node};

/// Extract the calendar items of a `FindItem` response.
///
/// Bodies are not part of the find shape; they are filled in by a follow-up
/// `GetItem` call.
pub(crate) fn parse_find_item(xml: &str, mailbox: &str) -> Result<Vec<CalendarEvent>, CalendarError> {
    let doc = parse_document(xml)?;
    check_response_message(&doc, "FindItemResponseMessage", mailbox)?;

    let mut events = Vec::new();
    for item in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "CalendarItem")
    {
        let Some(item_id) = child_element(&item, "ItemId") else {
            continue;
        };
        let Some(id) = item_id.attribute("Id") else {
            continue;
        };
        let Some(start) = child_text(&item, "Start").and_then(parse_timestamp) else {
            continue;
        };

        let mut event = CalendarEvent::new(id, start)
            .with_change_key(item_id.attribute("ChangeKey").unwrap_or_default());
        if let Some(created) = child_text(&item, "DateTimeCreated").and_then(parse_timestamp) {
            event = event.with_created(created);
        }
        if let Some(subject) = child_text(&item, "Subject") {
            event = event.with_subject(subject);
        }
        if let Some(location) = child_text(&item, "Location") {
            event = event.with_location(location);
        }
        if let Some(organizer) = item
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "EmailAddress")
            .and_then(|n| n.text())
        {
            event = event.with_organizer(organizer);
        }

        events.push(event);
    }

    Ok(events)
}

/// Extract `item id -> HTML body` from a `GetItem` response.
///
/// Items whose response message failed are simply absent from the map; their
/// events keep an empty body.
pub(crate) fn parse_item_bodies(
    xml: &str,
    mailbox: &str,
) -> Result<HashMap<String, String>, CalendarError> {
    let doc = parse_document(xml)?;
    check_response_message(&doc, "GetItemResponseMessage", mailbox)?;

    let mut bodies = HashMap::new();
    for item in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "CalendarItem")
    {
        let id = child_element(&item, "ItemId").and_then(|n| n.attribute("Id"));
        let body = child_text(&item, "Body");
        if let (Some(id), Some(body)) = (id, body) {
            bodies.insert(id.to_string(), body);
        }
    }

    Ok(bodies)
}

/// Check that an `UpdateItem` response reports success.
pub(crate) fn parse_update_response(xml: &str, mailbox: &str) -> Result<(), CalendarError> {
    let doc = parse_document(xml)?;
    check_response_message(&doc, "UpdateItemResponseMessage", mailbox)
}

fn parse_document(xml: &str) -> Result<Document<'_>, CalendarError> {
    Document::parse(xml).map_err(|e| CalendarError::Malformed(e.to_string()))
}

/// Validate the first response message of the given kind, classifying error
/// responses. A SOAP fault (e.g. denied impersonation) is reported as a
/// service error.
fn check_response_message(
    doc: &Document<'_>,
    message_tag: &str,
    mailbox: &str,
) -> Result<(), CalendarError> {
    let root = doc.root_element();

    let Some(message) = root
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == message_tag)
    else {
        if let Some(fault) = root
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "Fault")
        {
            let text = child_text(&fault, "faultstring").unwrap_or_default();
            return Err(CalendarError::Service {
                code: "SoapFault".to_string(),
                message: text,
            });
        }
        return Err(CalendarError::Malformed(format!(
            "response contains no {message_tag}"
        )));
    };

    if message.attribute("ResponseClass") == Some("Error") {
        let code = child_text(&message, "ResponseCode").unwrap_or_default();
        let text = child_text(&message, "MessageText").unwrap_or_default();

        if code == "ErrorNonExistentMailbox"
            || text.to_lowercase().contains("no mailbox associated")
        {
            return Err(CalendarError::NoMailbox {
                mailbox: mailbox.to_string(),
            });
        }
        return Err(CalendarError::Service {
            code,
            message: text,
        });
    }

    Ok(())
}

fn child_element<'a, 'input>(node: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

fn child_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|n| n.text())
        .map(str::to_string)
}

fn parse_timestamp(text: String) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
