mod live;
mod mock;

pub use live::{LiveAdapter, LIVE_SOURCE};
pub use mock::{MockAdapter, MOCK_SOURCE};
