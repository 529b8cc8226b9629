//! Positional field protocol.
//!
//! The gateway never names fields inside rows. Reads carry an ordered
//! field list in `metadata` and per-row values under `f0`, `f1`, ...;
//! writes carry an ordered `fields` array and a `values` map keyed by the
//! stringified index. [`FieldLayout`] is that ordered list on both sides.

mod decode;
mod encode;
mod query;
mod record;

pub use decode::decode_entities;
pub use encode::{PrimaryKey, SaveRequest};
pub use query::{LoadRequest, SortOrder};
pub use record::{FieldLayout, GatewayRecord, PositionalValues};
