/// Persisted account type tags.
///
/// These are the values of the `tipo` field in the accounts table. Goal boxes
/// are savings accounts on disk; the goal flag travels in its own fields.
pub mod account_types {
    pub const SAVINGS: &str = "ContaPoupanca";
    pub const CHECKING: &str = "ContaCorrente";
}
