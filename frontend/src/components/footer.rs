//! Footer component

use leptos::*;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <div>"Cartola Import • Powered by " <span class="rust-badge">"🦀 Rust + Leptos"</span></div>
            <div class="footer-links">
                <a href="https://developers.notion.com/reference/post-page" class="footer-link" target="_blank">
                    "Notion API"
                </a>
            </div>
        </footer>
    }
}
