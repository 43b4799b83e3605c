use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Per-transaction withdrawal ceiling, shared by every account kind.
pub const WITHDRAWAL_LIMIT: Decimal = dec!(1000);

/// Interest rate (percent per period) for newly opened savings accounts.
pub const DEFAULT_INTEREST_RATE: Decimal = dec!(0.5);

/// Flat maintenance fee charged on checking accounts.
pub const CHECKING_MAINTENANCE_FEE: Decimal = dec!(0);

/// Balances are kept in cents.
pub const MONEY_SCALE: u32 = 2;

/// Name printed on exported reports.
pub const BANK_NAME: &str = "NEO Bank";
