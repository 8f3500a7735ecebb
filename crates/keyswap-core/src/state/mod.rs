// Keyswap State Management
// Physical key state observed by the hook

mod tracker;

pub use tracker::{KeyStateTracker, PressedKeys};
