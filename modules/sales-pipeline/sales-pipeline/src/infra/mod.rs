//! Gateway-facing mapping for each entity: table and field names, the
//! queries and writes built from drafts, and record to model conversion.

pub(crate) mod funnels;
pub(crate) mod leads;
pub(crate) mod stages;
mod wire;
