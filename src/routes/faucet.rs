use crate::{
    actions::Actions,
    components::TokenLabel,
    constants::ASSETS,
    state::{ConnectWallet, Dashboard, DashboardStoreFields, WalletSignals},
    utils::human_balance,
};
use leptos::{prelude::*, task::spawn_local};
use reactive_stores::Store;
use tracing::info;

#[component]
pub fn Faucet() -> impl IntoView {
    info!("rendering <Faucet/>");

    on_cleanup(move || {
        info!("cleaning up <Faucet/>");
    });

    let wallet = use_context::<WalletSignals>().expect("wallet signals context missing!");
    let dashboard = use_context::<Store<Dashboard>>().expect("dashboard context missing!");
    let actions = use_context::<Actions>().expect("actions context missing!");
    let ConnectWallet(connect) =
        use_context::<ConnectWallet>().expect("connect wallet context missing!");

    let rows = ASSETS
        .iter()
        .map(|&asset| {
            let balance = move || {
                dashboard.balances().with(|balances| {
                    human_balance(balances, asset.address, asset.decimals, asset.symbol)
                })
            };

            view! {
                <tr>
                    <td>
                        <TokenLabel asset=asset />
                    </td>
                    <td>{balance}</td>
                    <td>
                        <Show
                            when=move || wallet.is_connected()
                            fallback=move || {
                                view! {
                                    <button
                                        disabled=move || wallet.connecting.get()
                                        on:click=move |_| connect.run(())
                                    >
                                        "Connect Wallet"
                                    </button>
                                }
                            }
                        >
                            <button on:click=move |_| spawn_local(actions.get_free_token(asset))>
                                "Get Free Token"
                            </button>
                        </Show>
                    </td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <h1>"Faucets"</h1>
        <table class="w-full">
            <thead>
                <tr>
                    <th>"Asset"</th>
                    <th>"Balance"</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>
    }
}
