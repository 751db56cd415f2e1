//! Markup rendering of the conversation, used by `/export`.

use std::collections::VecDeque;

use crate::core::format::escape_html;
use crate::core::message::{ImageRef, Message, Sender};

const TYPING_INDICATOR: &str = "<div class=\"typing-indicator\">...</div>";

const STYLE: &str = "\
body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
.user-message,.assistant-message{margin:0.75rem 0;padding:0.75rem 1rem;border-radius:0.5rem;white-space:pre-wrap}\
.user-message{background:#e8f0fe;margin-left:4rem}\
.assistant-message{background:#f1f3f4;margin-right:4rem}\
.code-block-wrapper{margin:0.5rem 0;border:1px solid #ccc;border-radius:0.25rem}\
.code-block-header{display:flex;justify-content:space-between;padding:0.25rem 0.5rem;background:#333;color:#eee}\
pre{margin:0;padding:0.5rem;overflow-x:auto}\
img{max-width:100%;display:block;margin-top:0.5rem}\
.typing-indicator{color:#888}";

/// Render a single message as one `div`.
pub fn render_message(message: &Message) -> String {
    let (class, body) = match message.sender {
        Sender::User => ("user-message", escape_html(&message.content)),
        Sender::Assistant => (
            "assistant-message",
            message
                .formatted()
                .map(|formatted| formatted.to_html())
                .unwrap_or_default(),
        ),
    };

    let image = match &message.image {
        Some(image @ ImageRef::Uploaded { file_name, .. }) => format!(
            "<img class=\"uploaded-image\" src=\"{}\" alt=\"{}\">",
            escape_html(&image.source()),
            escape_html(file_name)
        ),
        Some(ImageRef::Generated { url }) => format!(
            "<img class=\"generated-image\" src=\"{}\" alt=\"Generated image\">",
            escape_html(url)
        ),
        None => String::new(),
    };

    format!("<div class=\"{class}\">{body}{image}</div>")
}

/// The message list, with the typing indicator last while a reply is pending.
pub fn render_transcript_html(messages: &VecDeque<Message>, pending: bool) -> String {
    let mut html: String = messages.iter().map(render_message).collect::<Vec<_>>().join("\n");
    if pending {
        if !html.is_empty() {
            html.push('\n');
        }
        html.push_str(TYPING_INDICATOR);
    }
    html
}

/// A standalone page holding the transcript.
pub fn render_transcript_document(messages: &VecDeque<Message>, pending: bool) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>VistaChat transcript</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"chat-box\">\n{}\n</div>\n</body>\n</html>\n",
        render_transcript_html(messages, pending)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn messages(list: Vec<Message>) -> VecDeque<Message> {
        list.into_iter().collect()
    }

    #[test]
    fn user_text_is_escaped() {
        let html = render_message(&Message::user("<b>hi</b>", None));
        assert_eq!(
            html,
            "<div class=\"user-message\">&lt;b&gt;hi&lt;/b&gt;</div>"
        );
    }

    #[test]
    fn assistant_code_blocks_are_wrapped() {
        let html = render_message(&Message::assistant("Try:\n```js\nconsole.log(1)\n```"));
        assert!(html.starts_with("<div class=\"assistant-message\">Try:\n"));
        assert!(html.contains("<span class=\"language-name\">js</span>"));
        assert!(html.contains("<code class=\"language-js\">console.log(1)</code>"));
    }

    #[test]
    fn images_render_after_text() {
        let uploaded = Message::user(
            "what is this?",
            Some(ImageRef::Uploaded {
                file_name: "cat.png".to_string(),
                path: PathBuf::from("/tmp/cat.png"),
            }),
        );
        assert_eq!(
            render_message(&uploaded),
            "<div class=\"user-message\">what is this?\
             <img class=\"uploaded-image\" src=\"/tmp/cat.png\" alt=\"cat.png\"></div>"
        );

        let generated = Message::generated_image("https://img.example/a.png?x=1&y=\"2\"");
        let html = render_message(&generated);
        assert!(html.contains(
            "src=\"https://img.example/a.png?x=1&amp;y=&quot;2&quot;\""
        ));
    }

    #[test]
    fn typing_indicator_follows_messages_only_while_pending() {
        let list = messages(vec![Message::user("hello", None)]);
        let idle = render_transcript_html(&list, false);
        assert!(!idle.contains("typing-indicator"));

        let pending = render_transcript_html(&list, true);
        assert!(pending.ends_with(TYPING_INDICATOR));
        assert_eq!(
            render_transcript_html(&VecDeque::new(), true),
            TYPING_INDICATOR
        );
    }

    #[test]
    fn document_wraps_transcript() {
        let list = messages(vec![Message::assistant_error("rate limited")]);
        let doc = render_transcript_document(&list, false);
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<div class=\"assistant-message\">Error: rate limited</div>"));
    }
}
