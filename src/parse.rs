//! Turn HTML code into a sequence of [`Event`]s.
//!
//! This module uses [`lol_html`] under the hood. The rewriter output is
//! discarded; only its handlers are used, in document order.

use std::{cell::RefCell, mem::take, rc::Rc};

use lol_html::{
    doc_comments, doc_text, doctype, element, errors::RewritingError, html_content::EndTag,
    HandlerResult, RewriteStrSettings,
};

use crate::event::{Attribute, Event};

/// Parse HTML code into events.
///
/// Each text node produces a single [`Event::Text`], however the rewriter
/// splits it. Elements that cannot have an end tag (e.g. `<br>`), or whose
/// end tag is missing, produce no [`Event::Close`].
pub fn events(input: impl AsRef<str>) -> Result<Vec<Event>, RewritingError> {
    let input = input.as_ref();
    let events = Rc::new(RefCell::new(Vec::new()));

    let element_events = Rc::clone(&events);
    let doctype_events = Rc::clone(&events);
    let comment_events = Rc::clone(&events);
    let text_events = Rc::clone(&events);
    let mut text_node = String::new();

    lol_html::rewrite_str(input, RewriteStrSettings {
        element_content_handlers: vec![element!("*", move |element| {
            let attributes = element
                .attributes()
                .iter()
                .map(|attribute| Attribute::new(attribute.name(), attribute.value()))
                .collect();

            element_events.borrow_mut().push(Event::Open {
                tag: element.tag_name(),
                attributes,
            });

            if let Some(handlers) = element.end_tag_handlers() {
                let close_events = Rc::clone(&element_events);
                handlers.push(Box::new(move |end: &mut EndTag<'_>| -> HandlerResult {
                    close_events.borrow_mut().push(Event::Close(end.name()));
                    Ok(())
                }));
            }

            Ok(())
        })],
        document_content_handlers: vec![
            doctype!(move |doctype| {
                doctype_events.borrow_mut().push(Event::Doctype(doctype_source(
                    doctype.name().as_deref(),
                    doctype.public_id().as_deref(),
                    doctype.system_id().as_deref(),
                )));
                Ok(())
            }),
            doc_comments!(move |comment| {
                comment_events
                    .borrow_mut()
                    .push(Event::Comment(comment.text()));
                Ok(())
            }),
            doc_text!(move |text| {
                text_node.push_str(text.as_str());
                if text.last_in_text_node() && !text_node.is_empty() {
                    text_events
                        .borrow_mut()
                        .push(Event::text(take(&mut text_node)));
                }
                Ok(())
            }),
        ],
        ..RewriteStrSettings::default()
    })?;

    let events = events.borrow().clone();
    Ok(events)
}

/// Write a document type declaration back as source.
fn doctype_source(name: Option<&str>, public_id: Option<&str>, system_id: Option<&str>) -> String {
    let mut source = String::from("<!DOCTYPE");

    if let Some(name) = name {
        source.push(' ');
        source.push_str(name);
    }

    match (public_id, system_id) {
        (Some(public_id), system_id) => {
            source.push_str(&format!(" PUBLIC \"{public_id}\""));
            if let Some(system_id) = system_id {
                source.push_str(&format!(" \"{system_id}\""));
            }
        },
        (None, Some(system_id)) => source.push_str(&format!(" SYSTEM \"{system_id}\"")),
        (None, None) => {},
    }

    source.push('>');
    source
}
