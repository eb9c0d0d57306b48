use crate::ai::CompletionClient;
use crate::config::ChatConfig;
use crate::conversation::Conversation;
use crate::profile::PROFILE;
use crate::session::ChatSession;
use crate::views::{About, ChatWidget, Contact, EducationSection, Experience, Hero, NavBar, Skills};
use dioxus::prelude::*;

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Build the session the chat widget works against.
///
/// A broken config is logged and replaced with defaults so the page still
/// renders; the widget then shows fallback text for every turn.
pub fn new_session() -> ChatSession {
    let config = ChatConfig::load().unwrap_or_else(|err| {
        tracing::error!(error = %err, "invalid chat configuration, using defaults");
        ChatConfig::default()
    });
    tracing::info!(endpoint = %config.endpoint, model = %config.model, "chat configured");

    let client = CompletionClient::hosted(config, PROFILE.system_prompt());
    ChatSession::new(client, Conversation::with_greeting(PROFILE.greeting()))
}

#[component]
pub fn App() -> Element {
    let session = use_signal(new_session);
    use_context_provider(|| session);
    let chat_title = format!("{} AI", PROFILE.first_name());

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        NavBar {}
        main { class: "page",
            Hero {}
            About {}
            Skills {}
            EducationSection {}
            Experience {}
            Contact {}
        }
        ChatWidget { title: chat_title }
    }
}
