pub mod poller;
pub mod reconciler;

pub use poller::StatusPoller;
pub use reconciler::Reconciler;
