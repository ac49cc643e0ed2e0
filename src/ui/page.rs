//! Server-rendered HTML for the launch page.

use html_escape::encode_text;

use crate::config::TavusConfig;

/// Generate the HTML shell for the application.
pub fn html_shell(title: &str, content: &str) -> String {
    let title = encode_text(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Conversational video coaching session launcher">
    <title>{title}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; padding: 1.5rem; }}
        #frame {{ width: 100%; height: 70vh; border: 1px solid #ccc; border-radius: 8px; }}
        dl {{ display: grid; grid-template-columns: max-content auto; gap: 0.25rem 1rem; }}
        dt {{ font-weight: 600; }}
    </style>
</head>
<body>
    <main id="app">
        {content}
    </main>
    <script src="/static/main.js"></script>
</body>
</html>"#
    )
}

/// Launch controls plus a summary of what `/start` will use.
pub fn index_content(tavus: &TavusConfig) -> String {
    let persona = encode_text(tavus.persona_id().unwrap_or("(unset)")).into_owned();
    let replica = encode_text(tavus.replica_id().unwrap_or("(unset)")).into_owned();
    let documents = if tavus.document_ids.is_empty() {
        "(none)".to_string()
    } else {
        encode_text(&tavus.document_ids.join(", ")).into_owned()
    };
    let require_auth = tavus.require_auth;

    format!(
        r#"<h1>Public Speaking Coach</h1>
        <dl id="session-config">
            <dt>Persona</dt><dd>{persona}</dd>
            <dt>Replica</dt><dd>{replica}</dd>
            <dt>Documents</dt><dd>{documents}</dd>
            <dt>Require auth</dt><dd>{require_auth}</dd>
        </dl>
        <p>
            <button id="startBtn" type="button">Start session</button>
            <span id="status"></span>
            <a id="openLink" href="" target="_blank" rel="noopener" style="display: none">Open in new tab</a>
        </p>
        <iframe id="frame" src="" allow="camera; microphone; fullscreen; display-capture"></iframe>"#
    )
}

/// Complete index page.
pub fn index_page(tavus: &TavusConfig) -> String {
    html_shell("Public Speaking Coach", &index_content(tavus))
}
