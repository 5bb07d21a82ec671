use crate::types::Asset;
use leptos::prelude::*;

/// Logo, name and symbol of an asset, as shown in the first column of every table.
#[component]
pub fn TokenLabel(asset: &'static Asset) -> impl IntoView {
    view! {
        <div class="flex p-2 items-center">
            <img src=asset.logo width="52" height="52" alt=asset.symbol />
            <div class="flex flex-col justify-center ml-2">
                <span class="text-xl font-bold">{asset.name}</span>
                <span class="text-sm text-muted-foreground">{asset.symbol}</span>
            </div>
        </div>
    }
}
