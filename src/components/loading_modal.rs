use super::Spinner;
use leptos::{html::Dialog, prelude::*};

#[component]
pub fn LoadingModal(
    #[prop(into)] when: Signal<bool>,
    #[prop(into)] message: String,
) -> impl IntoView {
    let dialog_ref = NodeRef::<Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if when.get() {
                let _ = dialog.show_modal();
            } else {
                dialog.close();
            }
        }
    });

    view! {
        <dialog node_ref=dialog_ref>
            // prevent focus ring from showing around the main div
            <div tabindex="0"></div>
            <div class="align-middle inline-flex items-center justify-center gap-3">
                <Spinner size=24 />
                <div class="font-bold">{message}</div>
            </div>
        </dialog>
    }
}
