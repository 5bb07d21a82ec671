use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav>
            <A href="/" exact=true>"Markets"</A>
            <A href="/relayer">"Relayer"</A>
            <A href="/faucet">"Faucet"</A>
        </nav>
    }
}
