use crate::components::google_calendar::ExternalEvent;
use crate::components::notion::properties::{self, PropertyMap, PropertyNames};

/// Title written for events that have none
pub const UNTITLED: &str = "(no title)";

/// Title as it is stored, placeholder included
pub fn display_title(event: &ExternalEvent) -> &str {
    match event.title.as_deref() {
        Some(title) if !title.is_empty() => title,
        _ => UNTITLED,
    }
}

/// Label for the source select: the configured one, else the calendar name
pub fn source_label<'a>(event: &'a ExternalEvent, configured: Option<&'a str>) -> &'a str {
    configured.unwrap_or(&event.calendar_name)
}

/// Map an event onto the managed database properties.
///
/// Location and notes are always present, empty when the event has none.
/// The link is only present when the event has one.
pub fn event_properties(event: &ExternalEvent, names: &PropertyNames, source: &str) -> PropertyMap {
    let end = event.end.clone().unwrap_or_else(|| event.start.default_end());
    let start = event.start.to_string();
    let end = end.to_string();

    let mut props = PropertyMap::new();
    props.insert(names.title.clone(), properties::title(display_title(event)));
    props.insert(names.date.clone(), properties::date(&start, Some(&end)));
    props.insert(names.source.clone(), properties::select(source));
    props.insert(names.uid.clone(), properties::rich_text(&event.id));
    props.insert(
        names.location.clone(),
        properties::rich_text(event.location.as_deref().unwrap_or_default()),
    );
    props.insert(
        names.notes.clone(),
        properties::rich_text(event.description.as_deref().unwrap_or_default()),
    );

    if let Some(link) = event.link.as_deref().filter(|l| !l.trim().is_empty()) {
        props.insert(names.link.clone(), properties::url(link));
    }

    props
}
