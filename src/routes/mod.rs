pub mod faucet;
pub mod markets;
pub mod nav;
pub mod relayer;

pub use faucet::Faucet;
pub use markets::Markets;
pub use nav::Nav;
pub use relayer::Relayer;
