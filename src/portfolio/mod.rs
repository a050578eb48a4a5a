//! Portfolio holdings: the CD ladder and the invested remainder

pub mod account;
pub mod ladder;

pub use account::InvestmentAccount;
pub use ladder::{Cd, Ladder};
