pub mod flaky;
pub mod store;

pub use flaky::FlakyStore;
pub use store::TestStore;
