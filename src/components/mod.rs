mod action_modal;
mod loading_modal;
mod spinner;
mod toasts;
mod token_label;
mod wallet_menu;

pub use action_modal::ActionModal;
pub use loading_modal::LoadingModal;
pub use spinner::Spinner;
pub use toasts::Toasts;
pub use token_label::TokenLabel;
pub use wallet_menu::WalletMenu;
