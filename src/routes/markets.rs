use crate::{
    components::{ActionModal, TokenLabel},
    constants::POOLS,
    state::{Dashboard, DashboardStoreFields},
    types::{Direction, ModalTab, Pool},
    utils::human_balance,
};
use leptos::prelude::*;
use reactive_stores::Store;
use tracing::info;

#[component]
pub fn Markets() -> impl IntoView {
    info!("rendering <Markets/>");

    on_cleanup(move || {
        info!("cleaning up <Markets/>");
    });

    let dashboard = use_context::<Store<Dashboard>>().expect("dashboard context missing!");

    let selected = RwSignal::new(None::<(Pool, Direction)>);
    let tab = RwSignal::new(ModalTab::default());

    let open = move |pool: Pool, direction: Direction, which: ModalTab| {
        tab.set(which);
        selected.set(Some((pool, direction)));
    };

    let rows = POOLS
        .iter()
        .map(|&&pool| {
            let asset = pool.asset;
            let pool_balance = move || {
                dashboard.balances().with(|balances| {
                    human_balance(balances, pool.address, pool.decimals(), pool.symbol)
                })
            };
            let asset_balance = move || {
                dashboard.balances().with(|balances| {
                    human_balance(balances, asset.address, asset.decimals, asset.symbol)
                })
            };

            view! {
                <tr>
                    <td>
                        <TokenLabel asset=asset />
                    </td>
                    <td>{pool_balance}</td>
                    <td>{asset_balance}</td>
                    <td>
                        <div class="flex gap-2">
                            <button on:click=move |_| {
                                open(pool, Direction::Deposit, ModalTab::Wrap)
                            }>"Wrap request"</button>
                            <button on:click=move |_| {
                                open(pool, Direction::Deposit, ModalTab::Redeem)
                            }>{format!("Redeem {}", pool.symbol)}</button>
                        </div>
                    </td>
                    <td>
                        <div class="flex gap-2">
                            <button on:click=move |_| {
                                open(pool, Direction::Withdraw, ModalTab::Wrap)
                            }>"Wrap request"</button>
                            <button on:click=move |_| {
                                open(pool, Direction::Withdraw, ModalTab::Redeem)
                            }>{format!("Redeem {}", asset.symbol)}</button>
                        </div>
                    </td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <h1>"Markets"</h1>
        <table class="w-full">
            <thead>
                <tr>
                    <th>"Market"</th>
                    <th>"Pool Balance"</th>
                    <th>"Asset Balance"</th>
                    <th>"Deposit to Aave"</th>
                    <th>"Withdraw from Aave"</th>
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>
        {move || {
            selected
                .get()
                .map(|(pool, direction)| {
                    view! {
                        <ActionModal
                            pool=pool
                            direction=direction
                            tab=tab
                            on_close=move || selected.set(None)
                        />
                    }
                })
        }}
    }
}
