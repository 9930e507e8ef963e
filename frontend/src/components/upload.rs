//! Statement upload form.
//!
//! Wires the DOM to an [`UploadSubmitter`]: the file input is read through
//! a node ref, the transport is browser fetch, and every state change is
//! pushed into a signal the view reads from.

use leptos::html::Input;
use leptos::*;
use std::rc::Rc;
use web_sys::{File, SubmitEvent};

use crate::services::{FetchTransport, FileInput, SubmitConfig, UploadSubmitter, UploadView};
use crate::types::{SelectedFile, ViewState};

/// File input bound through a Leptos node ref.
#[derive(Clone, Copy)]
pub struct NodeFileInput(pub NodeRef<Input>);

impl FileInput for NodeFileInput {
    type File = File;

    fn selected_file(&self) -> Option<SelectedFile<File>> {
        let file = self.0.get_untracked()?.files()?.get(0)?;
        Some(SelectedFile::new(file.name(), file))
    }
}

/// View that publishes each state into a signal.
#[derive(Clone, Copy)]
pub struct SignalView(pub WriteSignal<ViewState>);

impl UploadView for SignalView {
    fn render(&self, state: &ViewState) {
        self.0.set(state.clone());
    }
}

/// Statement upload form.
///
/// `config` overrides the endpoint, field name or messages.
#[component]
pub fn UploadForm(#[prop(optional)] config: Option<SubmitConfig>) -> impl IntoView {
    let file_input = create_node_ref::<Input>();
    let (view_state, set_view_state) = create_signal(ViewState::default());

    let submitter = Rc::new(
        UploadSubmitter::new(
            NodeFileInput(file_input),
            FetchTransport::default(),
            SignalView(set_view_state),
        )
        .with_config(config.unwrap_or_default()),
    );

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitter.is_busy() {
            return;
        }

        let submitter = Rc::clone(&submitter);
        spawn_local(async move {
            submitter.submit().await;
        });
    };

    view! {
        <form class="upload-form" id="upload-form" on:submit=on_submit>
            <input
                type="file"
                id="file-input"
                name="file"
                accept=".xlsx"
                node_ref=file_input
            />
            <button
                type="submit"
                id="upload-button"
                class="upload-button"
                disabled=move || !view_state.get().submit_enabled
            >
                "Upload statement"
            </button>
        </form>

        <Show
            when=move || view_state.get().busy
            fallback=|| view! { }
        >
            <div class="loading" id="loading">
                <div class="spinner"></div>
                <span>"⏳ Uploading and importing..."</span>
            </div>
        </Show>

        {move || {
            view_state
                .get()
                .notice
                .map(|notice| {
                    view! {
                        <div class=notice.kind.css_class() id="message">
                            {notice.text}
                        </div>
                    }
                })
        }}
    }
}
