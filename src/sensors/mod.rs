//! Sensor boards: typed readings built on single board transactions.
//!
//! | Sensor    | Board command    | Fields            |
//! |-----------|------------------|-------------------|
//! | moisture  | channel symbol   | `percent`         |
//! | thermal   | `T`              | `ambient,object`  |
//! | vision    | `C`              | `r,g,b`           |
//!
//! Each sensor holds its endpoint and command; the caller lends it the
//! [`TransactionManager`](crate::link::TransactionManager) so exchanges
//! stay strictly sequential across boards.

pub mod moisture;
pub mod thermal;
pub mod vision;
