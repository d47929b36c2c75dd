//! iCalendar export and "add to Google Calendar" links.

use akwaaba_models::Event;
use chrono::{DateTime, Utc};
use url::Url;

const GOOGLE_CALENDAR_URL: &str = "https://calendar.google.com/calendar/render";

/// Formats a timestamp as `YYYYMMDDTHHMMSSZ`.
pub fn ics_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Renders a single-event VCALENDAR with CRLF line endings.
pub fn to_ics(event: &Event, now: DateTime<Utc>) -> String {
    let title = if event.title.trim().is_empty() {
        "Event".to_string()
    } else {
        single_line(&event.title)
    };

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//AkwaabaTickets//EN".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@akwaaba", event.id),
        format!("DTSTAMP:{}", ics_stamp(now)),
        format!("DTSTART:{}", ics_stamp(event.starts_at)),
        format!("DTEND:{}", ics_stamp(event.ends_at_or_default())),
        format!("SUMMARY:{}", title),
        format!("LOCATION:{}", single_line(&event.where_text())),
        format!("DESCRIPTION:{}", single_line(&event.description)),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

/// Download filename for an event's calendar file.
pub fn ics_filename(event: &Event) -> String {
    let stem: String = event
        .title
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "event.ics".to_string()
    } else {
        format!("{}.ics", stem)
    }
}

/// Google Calendar template link; `detail_url` goes in the details field.
pub fn google_calendar_link(event: &Event, detail_url: &str) -> String {
    let dates = format!(
        "{}/{}",
        ics_stamp(event.starts_at),
        ics_stamp(event.ends_at_or_default())
    );
    let location = event.where_text();
    let params = [
        ("action", "TEMPLATE"),
        ("text", event.title.as_str()),
        ("dates", dates.as_str()),
        ("details", detail_url),
        ("location", location.as_str()),
    ];
    match Url::parse_with_params(GOOGLE_CALENDAR_URL, &params) {
        Ok(url) => url.to_string(),
        Err(_) => GOOGLE_CALENDAR_URL.to_string(),
    }
}
