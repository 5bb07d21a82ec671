use leptos::prelude::*;
use lucide_leptos::LoaderCircle;

#[component]
pub fn Spinner(#[prop(default = 16)] size: usize) -> impl IntoView {
    view! {
        <div class="inline-flex animate-spin text-muted-foreground">
            <LoaderCircle size=size />
        </div>
    }
}
