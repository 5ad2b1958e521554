//! Server-side HTML rendering of a [`View`].
//!
//! The page is a single self-contained document: inline CSS, a small inline
//! script that reloads on session events, and plain HTML forms for the
//! start, record, and reset actions so it also works with scripts disabled.

use crate::view::{Bubble, Control, View};
use std::fmt::Write;

pub const START_PATH: &str = "/session/start";
pub const RECORDING_PATH: &str = "/session/recording";
pub const RESET_PATH: &str = "/session/reset";
pub const EVENTS_PATH: &str = "/events";

/// Seconds between automatic reloads while a reply is pending.
const WAITING_REFRESH_SECS: u32 = 2;

const PAGE_STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; height: 100vh; overflow-y: hidden; }
header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 1.25rem; background: #4c1d95; color: white; }
header button { background: none; border: 1px solid white; color: white; border-radius: 4px; padding: .25rem .75rem; cursor: pointer; }
main { height: 100%; overflow-y: scroll; padding: 0 1.25rem 24rem; }
.bubble { display: flex; flex-direction: column; margin-top: 1rem; }
.bubble.rachel { align-items: flex-end; }
.sender { font-style: italic; margin: 0 .5rem; }
.bubble.me .sender { color: #3b82f6; }
.bubble.rachel .sender { color: #22c55e; text-align: right; }
.placeholder { text-align: center; font-weight: 300; font-style: italic; margin-top: 2.5rem; }
.pulse { animation: pulse 2s cubic-bezier(.4,0,.6,1) infinite; }
@keyframes pulse { 50% { opacity: .5; } }
table { border-collapse: collapse; }
th, td { padding: .25rem .75rem; text-align: left; }
footer { position: fixed; bottom: 0; width: 100%; padding: 1.5rem 0; text-align: center; border-top: 1px solid #ddd; background: linear-gradient(to right, #0ea5e9, #22c55e); color: white; }
footer button { background: white; color: #0ea5e9; padding: 1rem; border: none; border-radius: 9999px; cursor: pointer; }
"#;

/// Reloads when the session moves away from the state the page was rendered
/// in, or the conversation is cleared. Holds off while this page has a form
/// post of its own in flight, since reloading would abort the post.
const RELOAD_SCRIPT: &str = r#"
let submitting = false;
for (const form of document.querySelectorAll("form")) {
  form.addEventListener("submit", () => { submitting = true; });
}
if (window.EventSource) {
  const events = new EventSource("/events");
  events.onmessage = (e) => {
    if (submitting) {
      return;
    }
    const event = JSON.parse(e.data);
    const moved = event.event === "state_changed" && event.state !== document.body.dataset.state;
    if (moved || event.event === "cleared") {
      window.location.reload();
    }
  };
}
"#;

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_bubble(out: &mut String, bubble: &Bubble) {
    let label = bubble.sender.label();
    let _ = write!(
        out,
        r#"<div class="bubble {label}"><div><p class="sender">{label}</p>"#
    );

    if let Some(text) = &bubble.text {
        let _ = write!(out, "<p>{}</p>", escape_html(text));
    }

    if !bubble.availability.is_empty() {
        out.push_str("<div><h2>Availability</h2><table><thead><tr><th>Day</th><th>Times</th></tr></thead><tbody>");
        for row in &bubble.availability {
            let _ = write!(
                out,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&row.day),
                escape_html(&row.times)
            );
        }
        out.push_str("</tbody></table></div>");
    }

    // Played once as soon as the bubble appears; there is no replay control.
    if let Some(url) = &bubble.audio_url {
        let _ = write!(
            out,
            r#"<audio src="{}" autoplay hidden style="visibility: hidden"></audio>"#,
            escape_html(url)
        );
    }

    out.push_str("</div></div>");
}

fn render_control(out: &mut String, control: Control) {
    match control {
        Control::StartButton => {
            let _ = write!(
                out,
                r#"<form method="post" action="{START_PATH}"><button type="submit" aria-label="start">&#127908;</button><p>start</p></form>"#
            );
        }
        Control::Recorder => {
            let _ = write!(
                out,
                r#"<form method="post" action="{RECORDING_PATH}" enctype="multipart/form-data"><input type="file" name="file" accept="audio/*" capture="user" required> <button type="submit">send</button></form>"#
            );
        }
    }
}

/// Renders the full page for `view`.
pub fn render_page(view: &View) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    if view.is_waiting() {
        let _ = write!(
            out,
            r#"<meta http-equiv="refresh" content="{WAITING_REFRESH_SECS}">"#
        );
    }
    let _ = write!(
        out,
        r#"<title>Rachel</title><style>{PAGE_STYLE}</style></head><body data-state="{}">"#,
        view.state
    );

    let _ = write!(
        out,
        r#"<header><strong>Rachel</strong><form method="post" action="{RESET_PATH}"><button type="submit">reset</button></form></header>"#
    );

    out.push_str("<main>");
    for bubble in &view.bubbles {
        render_bubble(&mut out, bubble);
    }
    if let Some(placeholder) = view.placeholder {
        let class = if view.is_waiting() {
            "placeholder pulse"
        } else {
            "placeholder"
        };
        let _ = write!(out, r#"<div class="{class}">{}</div>"#, placeholder.text());
    }
    out.push_str("</main>");

    out.push_str("<footer>");
    render_control(&mut out, view.control);
    out.push_str("</footer>");

    let _ = write!(out, "<script>{RELOAD_SCRIPT}</script></body></html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Placeholder;
    use voicebook_session::{SessionSnapshot, SessionState};
    use voicebook_types::{Alternative, Message};

    fn page(state: SessionState, messages: Vec<Message>) -> String {
        render_page(&View::from_snapshot(&SessionSnapshot { state, messages }))
    }

    #[test]
    fn page_is_a_complete_document() {
        let html = page(SessionState::Idle, vec![]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<html"));
        assert!(html.ends_with("</html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains(EVENTS_PATH));
    }

    #[test]
    fn idle_page_shows_prompt_and_start_button() {
        let html = page(SessionState::Idle, vec![]);
        assert!(html.contains(Placeholder::Empty.text()));
        assert!(!html.contains(Placeholder::Waiting.text()));
        assert!(html.contains(START_PATH));
        assert!(!html.contains(RECORDING_PATH));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn waiting_page_pulses_and_refreshes() {
        let html = page(SessionState::Awaiting, vec![Message::from_me("hi")]);
        assert!(html.contains("placeholder pulse"));
        assert!(html.contains(Placeholder::Waiting.text()));
        assert!(!html.contains(Placeholder::Empty.text()));
        assert!(html.contains("http-equiv=\"refresh\""));
        assert!(html.contains(RECORDING_PATH));
    }

    #[test]
    fn bubbles_render_text_audio_and_availability() {
        let html = page(
            SessionState::Listening,
            vec![
                Message::from_me("friday please"),
                Message::from_rachel("Friday is full", "http://svc/r.mp3").with_alternatives(
                    vec![Alternative {
                        day: "Saturday".to_string(),
                        times: vec!["10:00".to_string(), "12:30".to_string()],
                    }],
                ),
            ],
        );

        assert!(html.contains(r#"<div class="bubble me">"#));
        assert!(html.contains(r#"<div class="bubble rachel">"#));
        assert!(html.contains("<p>friday please</p>"));
        assert!(html.contains(r#"<audio src="http://svc/r.mp3" autoplay hidden"#));
        assert!(html.contains("<h2>Availability</h2>"));
        assert!(html.contains("<td>Saturday</td><td>10:00 AM, 12:30 PM</td>"));
        assert!(!html.contains(Placeholder::Empty.text()));
    }

    #[test]
    fn no_availability_table_without_alternatives() {
        let html = page(
            SessionState::Listening,
            vec![Message::from_rachel("Booked", "a.mp3")],
        );
        assert!(!html.contains("Availability"));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = page(
            SessionState::Listening,
            vec![Message::from_me("<script>alert(\"x\")</script> & more")],
        );
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; more"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn body_carries_rendered_state() {
        assert!(page(SessionState::Idle, vec![]).contains(r#"<body data-state="idle">"#));
        assert!(page(SessionState::Awaiting, vec![]).contains(r#"<body data-state="awaiting">"#));
    }

    #[test]
    fn reload_script_holds_off_during_own_submission() {
        let html = page(SessionState::Listening, vec![]);
        let script = &html[html.find("<script>").unwrap()..];
        assert!(script.contains(r#"addEventListener("submit""#));
        let guard = script.find("if (submitting)").unwrap();
        let reload = script.find("window.location.reload()").unwrap();
        assert!(guard < reload);
    }

    #[test]
    fn escape_covers_attribute_quotes() {
        assert_eq!(escape_html(r#"a"b'c"#), "a&quot;b&#39;c");
        assert_eq!(escape_html("plain"), "plain");
    }
}
