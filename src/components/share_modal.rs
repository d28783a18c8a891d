//! Share Modal Component
//!
//! Links that post the current recipe URL to WhatsApp, X and Facebook.

use leptos::prelude::*;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::context::use_locale;

/// Text sent along with the link
pub const SHARE_TEXT: &str = "¡Mira esta receta!";

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareTarget {
    WhatsApp,
    X,
    Facebook,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 3] = [ShareTarget::WhatsApp, ShareTarget::X, ShareTarget::Facebook];

    pub fn label(&self) -> &'static str {
        match self {
            ShareTarget::WhatsApp => "WhatsApp",
            ShareTarget::X => "X",
            ShareTarget::Facebook => "Facebook",
        }
    }

    fn class(&self) -> &'static str {
        match self {
            ShareTarget::WhatsApp => "share-btn share-whatsapp",
            ShareTarget::X => "share-btn share-x",
            ShareTarget::Facebook => "share-btn share-facebook",
        }
    }

    /// Intent URL posting `page_url`; Facebook takes the link only
    pub fn link(&self, page_url: &str) -> String {
        match self {
            ShareTarget::WhatsApp => format!(
                "https://api.whatsapp.com/send?text={}%20{}",
                encode(SHARE_TEXT),
                encode(page_url)
            ),
            ShareTarget::X => format!(
                "https://twitter.com/intent/tweet?text={}%20{}",
                encode(SHARE_TEXT),
                encode(page_url)
            ),
            ShareTarget::Facebook => {
                format!("https://www.facebook.com/sharer/sharer.php?u={}", encode(page_url))
            }
        }
    }
}

#[component]
pub fn ShareModal(#[prop(into)] page_url: String, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let i18n = use_locale();
    let links = ShareTarget::ALL.map(|target| (target, target.link(&page_url)));

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal share-modal" role="dialog" on:click=|ev| ev.stop_propagation()>
                <button class="modal-close" on:click=move |_| on_close.run(())>"✕"</button>
                <h2>{move || i18n.t("share_recipe")}</h2>
                <p>{move || i18n.t("share_recipe_description")}</p>
                <input class="share-url" type="text" readonly=true value=page_url />
                <div class="share-links">
                    {links.into_iter().map(|(target, href)| view! {
                        <a class=target.class() href=href target="_blank" rel="noopener noreferrer">
                            {target.label()}
                        </a>
                    }).collect_view()}
                </div>
            </div>
        </div>
    }
}
