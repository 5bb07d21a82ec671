use crate::{
    constants::CHAIN,
    toaster::{Toast, ToastKind, Toaster},
};
use super::Spinner;
use leptos::prelude::*;
use lucide_leptos::{CircleAlert, CircleCheck, ExternalLink, X};

/// Fixed container that renders every toast in the [`Toaster`].
#[component]
pub fn Toasts() -> impl IntoView {
    let toaster = use_context::<Toaster>().expect("toaster context missing!");

    view! {
        <div class="fixed bottom-4 right-4 z-50 flex flex-col gap-2 w-80">
            <For each=move || toaster.toasts() key=|toast| (toast.id, toast.kind, toast.tx) let:toast>
                <ToastCard toast=toast />
            </For>
        </div>
    }
}

#[component]
fn ToastCard(toast: Toast) -> impl IntoView {
    let toaster = use_context::<Toaster>().expect("toaster context missing!");
    let id = toast.id;

    let icon = match toast.kind {
        ToastKind::Loading => view! { <Spinner /> }.into_any(),
        ToastKind::Success => view! { <CircleCheck size=16 color="#22c55e" /> }.into_any(),
        ToastKind::Error => view! { <CircleAlert size=16 color="#ef4444" /> }.into_any(),
    };
    let tx_link = toast
        .tx
        .map(|hash| format!("{}/tx/{hash}", CHAIN.explorer_url()));
    let retry = toast.retry;
    // Loading toasts can't be closed by hand.
    let closable = toast.kind != ToastKind::Loading;

    view! {
        <div class="flex flex-col gap-1 p-3 rounded-md border border-solid border-border bg-popover text-popover-foreground shadow-lg">
            <div class="flex items-center gap-2">
                {icon}
                <h3 class="flex-1 m-0 text-sm font-semibold">{toast.notice.title}</h3>
                <Show when=move || closable>
                    <button
                        title="Close"
                        on:click=move |_| toaster.dismiss(id)
                        class="p-1 bg-transparent border-none text-muted-foreground"
                    >
                        <X size=14 />
                    </button>
                </Show>
            </div>
            <p class="m-0 mb-2 text-sm">{toast.notice.content}</p>
            {tx_link
                .map(|href| {
                    view! {
                        <div class="flex justify-end">
                            <a
                                href=href
                                target="_blank"
                                rel="noopener"
                                class="inline-flex items-center gap-1 px-2.5 py-1 rounded-md text-xs font-medium no-underline bg-primary text-primary-foreground"
                            >
                                "Open on explorer"
                                <ExternalLink size=12 />
                            </a>
                        </div>
                    }
                })}
            {retry
                .map(|retry| {
                    view! {
                        <div class="flex justify-end">
                            <button
                                on:click=move |_| retry.run(())
                                class="px-2.5 py-1 rounded-md text-xs font-medium border-none bg-primary text-primary-foreground"
                            >
                                "Try again"
                            </button>
                        </div>
                    }
                })}
        </div>
    }
}
