//! Remote store capability the sync and read paths depend on.

mod remote_traits;

pub use remote_traits::RemoteStore;
