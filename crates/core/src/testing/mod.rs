//! Testing utilities and mock implementations.
//!
//! Mocks for the pipeline's storage and deploy seams, so the whole request
//! flow can be exercised without spawning processes.
//!
//! # Example
//!
//! ```rust,ignore
//! use buildhook_core::testing::{MockBuildStore, MockDeployer};
//!
//! let store = Arc::new(MockBuildStore::new());
//! let deployer = Arc::new(MockDeployer::new());
//! deployer.fail_next();
//!
//! // Build a Pipeline with them, run it, then inspect:
//! assert_eq!(store.records().len(), 1);
//! assert!(deployer.launches().is_empty());
//! ```

mod mock_deployer;
mod mock_store;

pub use mock_deployer::MockDeployer;
pub use mock_store::MockBuildStore;
