pub mod constants;
pub mod contract_interfaces;
