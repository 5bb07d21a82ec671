use crate::{
    actions::Actions,
    state::{Dashboard, DashboardStoreFields},
    toaster::{Notice, Toaster},
    types::{Direction, EpochEntry, ModalTab, Pool, RedeemableEntry},
    utils::{display_token_amount, human_balance, parse_token_amount},
};
use alloy_primitives::U256;
use leptos::{html::Dialog, prelude::*, task::spawn_local};
use lucide_leptos::X;
use reactive_stores::Store;
use std::collections::HashMap;
use tracing::{debug, info};

/// Plaintexts revealed while the modal is open, keyed by handle.
type Revealed = HashMap<U256, U256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDisplay {
    /// Epoch info not loaded yet.
    Unknown,
    Nothing,
    Encrypted(U256),
    Revealed(U256),
}

pub fn pending_display(entry: Option<&EpochEntry>, revealed: &Revealed) -> PendingDisplay {
    let Some(entry) = entry else {
        return PendingDisplay::Unknown;
    };
    let handle = entry.pending_user_request;

    if handle.is_zero() {
        PendingDisplay::Nothing
    } else if let Some(amount) = revealed.get(&handle) {
        PendingDisplay::Revealed(*amount)
    } else {
        PendingDisplay::Encrypted(handle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemLine {
    Revealed { epoch: u64, amount: U256 },
    Encrypted { epoch: u64, handle: U256 },
}

impl RedeemLine {
    pub fn epoch(&self) -> u64 {
        match self {
            RedeemLine::Revealed { epoch, .. } | RedeemLine::Encrypted { epoch, .. } => *epoch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemDisplay {
    Unknown,
    Nothing,
    Lines(Vec<RedeemLine>),
}

pub fn redeem_display(entry: Option<&RedeemableEntry>, revealed: &Revealed) -> RedeemDisplay {
    match entry {
        None => RedeemDisplay::Unknown,
        Some(entry) if entry.is_empty() => RedeemDisplay::Nothing,
        Some(entry) => RedeemDisplay::Lines(
            entry
                .iter()
                .map(|(epoch, handle)| match revealed.get(&handle) {
                    Some(amount) => RedeemLine::Revealed {
                        epoch,
                        amount: *amount,
                    },
                    None => RedeemLine::Encrypted { epoch, handle },
                })
                .collect(),
        ),
    }
}

/// Parses the amount typed into the wrap tab. Anything that is not a positive amount of the
/// token becomes the error toast shown instead of sending a transaction.
pub fn validate_request_amount(input: &str, decimals: u8) -> Result<U256, Notice> {
    match parse_token_amount(input, decimals) {
        Ok(value) if value.is_zero() => Err(Notice::new(
            "Invalid amount",
            "Amount must be greater than zero.",
        )),
        Ok(value) => Ok(value),
        Err(error) => Err(Notice::new("Invalid amount", error.to_string())),
    }
}

#[component]
pub fn ActionModal(
    pool: Pool,
    direction: Direction,
    tab: RwSignal<ModalTab>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    info!("rendering <ActionModal/>");

    let actions = use_context::<Actions>().expect("actions context missing!");
    let dashboard = use_context::<Store<Dashboard>>().expect("dashboard context missing!");
    let toaster = use_context::<Toaster>().expect("toaster context missing!");

    let dialog_ref = NodeRef::<Dialog>::new();
    let revealed = RwSignal::new(Revealed::new());
    let amount = RwSignal::new(String::new());

    let decimals = pool.decimals();
    let spent_token = direction.spent_token(&pool);
    let spent_symbol = direction.spent_symbol(&pool);
    let redeemed_symbol = direction.redeemed_symbol(&pool);

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            let _ = dialog.show_modal();
        }
    });

    let close = move |_| {
        if let Some(dialog) = dialog_ref.get() {
            dialog.close();
        }
    };

    let reveal = move |handle: U256| {
        spawn_local(async move {
            if let Some(value) = actions.decrypt_euint256(handle).await {
                // The modal may be gone by the time the gateway answers.
                revealed.try_update(|revealed| revealed.insert(handle, value));
            }
        })
    };

    let redeem = move |epoch: u64| spawn_local(actions.redeem(pool, epoch, direction));

    // wrap tab

    let balance = move || {
        dashboard
            .balances()
            .with(|balances| balances.get(&spent_token).copied())
    };
    let max_label = move || {
        dashboard
            .balances()
            .with(|balances| human_balance(balances, spent_token, decimals, spent_symbol))
    };
    let fill_max = move |_| {
        if let Some(balance) = balance() {
            amount.set(display_token_amount(balance, decimals));
        }
    };

    let send_request = Action::new_local(move |amount: &U256| {
        let amount = *amount;
        async move {
            if actions.approve_token(pool, direction, amount).await {
                actions.wrap_request(direction, pool, amount).await;
            }
        }
    });

    let submit = move |_| match validate_request_amount(&amount.get_untracked(), decimals) {
        Ok(value) => {
            debug!("requesting {} wrap of {value}", direction.verb());
            send_request.dispatch(value);
        }
        Err(notice) => {
            toaster.error(None, notice);
        }
    };

    let pending_line = move || {
        let display = dashboard.epoch_info().with(|info| {
            revealed.with(|revealed| pending_display(info.get(&spent_token), revealed))
        });

        match display {
            PendingDisplay::Unknown => ().into_any(),
            PendingDisplay::Nothing => view! { <p>"No pending amount"</p> }.into_any(),
            PendingDisplay::Encrypted(handle) => view! {
                <p>
                    "Your pending amount has been encrypted. "
                    <button class="link-button" on:click=move |_| reveal(handle)>
                        "Reveal it?"
                    </button>
                </p>
            }
            .into_any(),
            PendingDisplay::Revealed(value) => view! {
                <p>
                    {format!(
                        "Your pending amount: {}{spent_symbol}",
                        display_token_amount(value, decimals),
                    )}
                </p>
            }
            .into_any(),
        }
    };

    // redeem tab

    let redeem_lines = move || {
        let display = dashboard.redeemable_info().with(|info| {
            revealed.with(|revealed| redeem_display(info.get(&spent_token), revealed))
        });

        match display {
            RedeemDisplay::Unknown => ().into_any(),
            RedeemDisplay::Nothing => view! { <p>"Nothing available to redeem"</p> }.into_any(),
            RedeemDisplay::Lines(lines) => view! {
                <p>"You have redeemable amount at the following epoches:"</p>
                <ul class="list-none p-0 flex flex-col gap-2">
                    {lines
                        .into_iter()
                        .map(|line| {
                            let epoch = line.epoch();
                            match line {
                                RedeemLine::Revealed { amount, .. } => view! {
                                    <li>
                                        <button class="w-full" on:click=move |_| redeem(epoch)>
                                            {format!(
                                                "You have {}{redeemed_symbol} redeemable at #{epoch}. Click to redeem.",
                                                display_token_amount(amount, decimals),
                                            )}
                                        </button>
                                    </li>
                                }
                                .into_any(),
                                RedeemLine::Encrypted { handle, .. } => view! {
                                    <li class="flex items-center justify-between gap-2">
                                        <span>
                                            {format!("You have something at #{epoch}. Reveal it or just Redeem?")}
                                        </span>
                                        <div class="flex gap-1">
                                            <button on:click=move |_| reveal(handle)>"Reveal"</button>
                                            <button on:click=move |_| redeem(epoch)>"Redeem"</button>
                                        </div>
                                    </li>
                                }
                                .into_any(),
                            }
                        })
                        .collect_view()}
                </ul>
            }
            .into_any(),
        }
    };

    let tab_class = move |this: ModalTab| {
        if tab.get() == this {
            "flex-1 py-2 font-semibold bg-primary text-primary-foreground"
        } else {
            "flex-1 py-2 font-semibold bg-muted text-muted-foreground"
        }
    };

    let (wrap_label, submit_label) = match direction {
        Direction::Deposit => ("Deposit wrap request", "Deposit request"),
        Direction::Withdraw => ("Withdraw wrap request", "Withdrawal request"),
    };

    view! {
        <dialog
            node_ref=dialog_ref
            on:close=move |_| on_close.run(())
            class="w-[28rem] p-0 rounded-lg border border-solid border-border bg-popover text-popover-foreground"
        >
            <div class="flex items-center justify-between px-4 py-2">
                <span class="font-semibold">{pool.asset.name}</span>
                <button title="Close" on:click=close class="p-1 bg-transparent border-none">
                    <X size=16 />
                </button>
            </div>
            <div class="flex">
                <button
                    class=move || tab_class(ModalTab::Wrap)
                    on:click=move |_| tab.set(ModalTab::Wrap)
                >
                    {wrap_label}
                </button>
                <button
                    class=move || tab_class(ModalTab::Redeem)
                    on:click=move |_| tab.set(ModalTab::Redeem)
                >
                    {format!("Redeem {redeemed_symbol}")}
                </button>
            </div>
            <div class="p-4">
                <Show when=move || tab.get() == ModalTab::Wrap fallback=redeem_lines>
                    {pending_line}
                    <label class="block mb-2 text-sm">
                        {format!("Input {spent_symbol} amount to send {} request:", direction.verb())}
                    </label>
                    <div class="flex gap-2 mb-4">
                        <input
                            type="text"
                            inputmode="decimal"
                            placeholder="0.0"
                            class="flex-1"
                            prop:value=move || amount.get()
                            on:input=move |ev| amount.set(event_target_value(&ev))
                        />
                        <button on:click=fill_max>{move || format!("Max: {}", max_label())}</button>
                    </div>
                    <button
                        class="w-full py-2 bg-primary text-primary-foreground"
                        disabled=move || send_request.pending().get()
                        on:click=submit
                    >
                        {submit_label}
                    </button>
                </Show>
            </div>
        </dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(handle: u64) -> EpochEntry {
        EpochEntry {
            current_epoch: 3,
            last_wrapped_time: 1_700_000_000,
            has_request: handle != 0,
            pending_user_request: U256::from(handle),
        }
    }

    #[test]
    fn pending_amount_states() {
        let mut revealed = Revealed::new();

        assert_eq!(pending_display(None, &revealed), PendingDisplay::Unknown);
        assert_eq!(
            pending_display(Some(&entry(0)), &revealed),
            PendingDisplay::Nothing
        );
        assert_eq!(
            pending_display(Some(&entry(77)), &revealed),
            PendingDisplay::Encrypted(U256::from(77u64))
        );

        revealed.insert(U256::from(77u64), U256::from(5_000_000u64));
        assert_eq!(
            pending_display(Some(&entry(77)), &revealed),
            PendingDisplay::Revealed(U256::from(5_000_000u64))
        );
    }

    #[test]
    fn redeem_lines_follow_epochs() {
        let mut revealed = Revealed::new();
        revealed.insert(U256::from(11u64), U256::from(250u64));

        let entry = RedeemableEntry {
            amounts: vec![U256::from(11u64), U256::from(12u64)],
            epochs: vec![0, 2],
        };

        assert_eq!(
            redeem_display(Some(&entry), &revealed),
            RedeemDisplay::Lines(vec![
                RedeemLine::Revealed {
                    epoch: 0,
                    amount: U256::from(250u64)
                },
                RedeemLine::Encrypted {
                    epoch: 2,
                    handle: U256::from(12u64)
                },
            ])
        );
    }

    #[test]
    fn request_amounts_are_validated() {
        assert_eq!(validate_request_amount("12.5", 6), Ok(U256::from(12_500_000u64)));

        for input in ["0", "0.000", "", "abc", "-1", "1.0000001"] {
            let notice = validate_request_amount(input, 6).unwrap_err();
            assert_eq!(notice.title, "Invalid amount", "{input:?} was accepted");
        }
        assert_eq!(
            validate_request_amount("0", 18).unwrap_err().content,
            "Amount must be greater than zero."
        );
    }

    #[test]
    fn redeem_placeholders() {
        let revealed = Revealed::new();

        assert_eq!(redeem_display(None, &revealed), RedeemDisplay::Unknown);
        assert_eq!(
            redeem_display(Some(&RedeemableEntry::default()), &revealed),
            RedeemDisplay::Nothing
        );
    }
}
