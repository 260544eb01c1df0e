pub mod group;
pub mod ledger;
pub mod principal;
pub mod user;
