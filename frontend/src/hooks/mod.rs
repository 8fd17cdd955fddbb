pub mod use_coins;
pub mod use_csrf_token;

pub use use_coins::*;
pub use use_csrf_token::*;
