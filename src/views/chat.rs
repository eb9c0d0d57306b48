use crate::session::ChatSession;
use crate::types::{ChatMessage, Role};
use crate::views::shared::{format_message_timestamp, markdown_to_html, role_class, role_label};
use dioxus::events::Key;
use dioxus::prelude::*;

const SCROLL_TO_LATEST: &str =
    "document.getElementById('chat-end')?.scrollIntoView({ behavior: 'smooth', block: 'end' });";

/// Floating assistant: a toggle button plus the chat panel when open.
#[component]
pub fn ChatWidget(title: String) -> Element {
    let session = use_context::<Signal<ChatSession>>();
    let mut open = use_signal(|| false);
    let mut input = use_signal(String::new);

    // Re-run whenever the transcript grows or the in-flight flag flips.
    use_effect(move || {
        let session = session.read();
        let _ = (session.messages().len(), session.is_sending());
        if open() {
            let _ = document::eval(SCROLL_TO_LATEST);
        }
    });

    let mut send_message = {
        let mut session = session;
        let mut input_signal = input;
        move |text: String| {
            let turn = match session.write().begin_turn(&text) {
                Ok(turn) => turn,
                Err(rejected) => {
                    tracing::debug!(%rejected, "submission ignored");
                    return;
                }
            };
            input_signal.set(String::new());

            let client = session.read().client().clone();
            spawn(async move {
                let result = client.complete(&turn.user_text, &turn.prior).await;
                session.write().finish_turn(turn.token, result);
            });
        }
    };

    let messages_snapshot = session.read().messages().to_vec();
    let sending = session.read().is_sending();
    let toggle_title = if open() { "Close chat" } else { "Open chat" };

    rsx! {
        button {
            class: "chat-toggle",
            r#type: "button",
            title: toggle_title,
            onclick: move |_| {
                let is_open = open();
                open.set(!is_open);
            },
            "💬"
        }
        if open() {
            div { class: "chat-panel",
                div { class: "chat-header", "{title}" }
                div { class: "chat-list",
                    for (i, msg) in messages_snapshot.into_iter().enumerate() {
                        MessageRow { key: "{i}", message: msg }
                    }
                    if sending {
                        div { class: "message-row assistant",
                            span { class: "shimmer-text", "Thinking..." }
                        }
                    }
                    div { id: "chat-end" }
                }
                form { class: "composer",
                    onsubmit: move |ev| ev.prevent_default(),
                    input {
                        r#type: "text",
                        placeholder: "Ask me anything…",
                        value: "{input}",
                        disabled: sending,
                        oninput: move |ev| input.set(ev.value()),
                        onkeydown: move |ev| {
                            if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                ev.prevent_default();
                                let text = input();
                                send_message(text);
                            }
                        },
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: sending || input().trim().is_empty(),
                        onclick: move |_| {
                            let text = input();
                            send_message(text);
                        },
                        "Send"
                    }
                }
            }
        }
    }
}

#[component]
fn MessageRow(message: ChatMessage) -> Element {
    let class = role_class(message.role);
    let label = role_label(message.role);
    let timestamp = format_message_timestamp(message.created_at);

    rsx! {
        div { class: "message-row {class}",
            b { class: "message-label", "{label}: " }
            if matches!(message.role, Role::Assistant) {
                div { class: "bubble md", dangerous_inner_html: markdown_to_html(&message.content) }
            } else {
                div { class: "bubble", "{message.content}" }
            }
            if let Some(ts) = timestamp {
                span { class: "message-timestamp", "{ts}" }
            }
        }
    }
}
