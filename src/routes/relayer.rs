use crate::{
    actions::Actions,
    components::TokenLabel,
    constants::{MIN_WRAP_THRESHOLD, POOLS},
    state::{Dashboard, DashboardStoreFields},
    types::{Direction, EpochEntry, Pool},
    utils::{format_local_time, unix_now},
};
use leptos::{prelude::*, task::spawn_local};
use reactive_stores::Store;
use tracing::info;

/// Whether the relayer may batch the pending requests of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapAvailability {
    Unknown,
    NoRequests,
    /// Unix seconds at which the next wrap is accepted.
    OpensAt(u64),
    Ready,
}

pub fn wrap_availability(entry: Option<&EpochEntry>, now: u64) -> WrapAvailability {
    let Some(entry) = entry else {
        return WrapAvailability::Unknown;
    };
    if !entry.has_request {
        return WrapAvailability::NoRequests;
    }

    let opens_at = entry.last_wrapped_time.saturating_add(MIN_WRAP_THRESHOLD);
    if opens_at > now {
        WrapAvailability::OpensAt(opens_at)
    } else {
        WrapAvailability::Ready
    }
}

#[component]
pub fn Relayer() -> impl IntoView {
    info!("rendering <Relayer/>");

    on_cleanup(move || {
        info!("cleaning up <Relayer/>");
    });

    let rows = POOLS
        .iter()
        .map(|&&pool| {
            view! {
                <tr>
                    <td>
                        <TokenLabel asset=pool.asset />
                    </td>
                    <td>
                        <EpochCell pool=pool direction=Direction::Deposit />
                    </td>
                    <td>
                        <NextWrapCell pool=pool direction=Direction::Deposit />
                    </td>
                    <td>
                        <EpochCell pool=pool direction=Direction::Withdraw />
                    </td>
                    <td>
                        <NextWrapCell pool=pool direction=Direction::Withdraw />
                    </td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <h1>"Relayer"</h1>
        <table class="w-full">
            <thead>
                <tr>
                    <th>"Asset"</th>
                    <th>"Deposit epoch"</th>
                    <th>"Next deposit"</th>
                    <th>"Withdraw epoch"</th>
                    <th>"Next withdraw"</th>
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>
    }
}

#[component]
fn EpochCell(pool: Pool, direction: Direction) -> impl IntoView {
    let dashboard = use_context::<Store<Dashboard>>().expect("dashboard context missing!");
    let token = direction.spent_token(&pool);

    move || {
        dashboard.epoch_info().with(|info| {
            info.get(&token)
                .map(|entry| format!("#{}", entry.current_epoch))
                .unwrap_or_else(|| "--".to_string())
        })
    }
}

#[component]
fn NextWrapCell(pool: Pool, direction: Direction) -> impl IntoView {
    let dashboard = use_context::<Store<Dashboard>>().expect("dashboard context missing!");
    let actions = use_context::<Actions>().expect("actions context missing!");
    let token = direction.spent_token(&pool);

    let label = match direction {
        Direction::Deposit => "Deposit to Aave",
        Direction::Withdraw => "Withdraw from Aave",
    };

    // Re-evaluated on every epoch refresh, which also moves `now` forward.
    move || {
        let availability = dashboard
            .epoch_info()
            .with(|info| wrap_availability(info.get(&token), unix_now()));

        match availability {
            WrapAvailability::Unknown => "--".into_any(),
            WrapAvailability::NoRequests => "No requests".into_any(),
            WrapAvailability::OpensAt(time) => format_local_time(time).into_any(),
            WrapAvailability::Ready => view! {
                <button on:click=move |_| spawn_local(actions.wrap(pool, direction))>
                    {label}
                </button>
            }
            .into_any(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    const NOW: u64 = 1_700_000_000;

    fn entry(has_request: bool, last_wrapped_time: u64) -> EpochEntry {
        EpochEntry {
            current_epoch: 4,
            last_wrapped_time,
            has_request,
            pending_user_request: U256::ZERO,
        }
    }

    #[test]
    fn unknown_without_epoch_info() {
        assert_eq!(wrap_availability(None, NOW), WrapAvailability::Unknown);
    }

    #[test]
    fn nothing_to_wrap_without_requests() {
        assert_eq!(
            wrap_availability(Some(&entry(false, 0)), NOW),
            WrapAvailability::NoRequests
        );
    }

    #[test]
    fn waits_for_the_threshold() {
        let recent = entry(true, NOW - 10);

        assert_eq!(
            wrap_availability(Some(&recent), NOW),
            WrapAvailability::OpensAt(NOW - 10 + MIN_WRAP_THRESHOLD)
        );
    }

    #[test]
    fn ready_once_the_threshold_passed() {
        let exactly = entry(true, NOW - MIN_WRAP_THRESHOLD);
        let long_ago = entry(true, 0);

        assert_eq!(wrap_availability(Some(&exactly), NOW), WrapAvailability::Ready);
        assert_eq!(wrap_availability(Some(&long_ago), NOW), WrapAvailability::Ready);
    }
}
