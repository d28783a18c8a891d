//! List Sync
//!
//! Incremental list synchronizer for paginated REST feeds.
//!
//! - `pagination`: page cursor state machine with stale-response drop
//! - `debounce`: cancellable debounce over a start/cancel timer
//! - `optimistic`: optimistic field patches and removals with rollback
//! - `feed`: async driver tying a gateway to the state above

mod debounce;
mod error;
mod feed;
mod gateway;
mod optimistic;
mod page;
mod pagination;
#[cfg(test)]
mod testing;

pub use debounce::{Debouncer, GlooTimer, QueryState, Timer, QUIET_PERIOD_MS};
pub use error::ApiError;
pub use feed::{FeedState, ListSync, StateCell, SyncOutcome};
pub use gateway::{Ack, FetchGateway, Notifier};
pub use optimistic::{Change, Field, KeyOf, Keyed, MutationIntent, MutationStatus, Mutations};
pub use page::{Page, PageCursor, PageRequest};
pub use pagination::{Completion, Pager, Phase, Ticket};
