//! Graph query bodies for the flow backend.
//!
//! Only the request body lives here. Sending it (auth headers, timeouts) is the
//! caller's transport concern.

pub mod vocab;
pub mod builder;

pub use vocab::{Dimension, LimitType, QueryError, Units, GRAPH_LINE_PATH, GRAPH_SANKEY_PATH};
pub use builder::{FlowQuery, QueryBuilder};
