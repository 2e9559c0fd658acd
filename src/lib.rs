//! Rungs - an ordered key-value skip list with deterministic levels.
//!
//! Callers pick each node's level on insert. When the list outgrows its
//! height, it is rebuilt at double height with levels assigned by position,
//! giving the shape of a perfectly balanced skip list.
//!
//! # Quick Start
//!
//! ```
//! use rungs::SkipList;
//!
//! let mut list = SkipList::new(2);
//! list.insert(10, "ten", 0);
//! list.insert(30, "thirty", 1);
//! list.insert(20, "twenty", 0);
//!
//! assert_eq!(list.get(&20), Some(&"twenty"));
//!
//! // The search trace lists the keys walked past, then the value.
//! let trace = list.search(&30);
//! assert_eq!(trace.value(), Some(&"thirty"));
//!
//! list.delete(&30);
//! assert!(!list.search(&30).is_found());
//! ```

pub mod config;
pub mod error;
pub mod key;
pub mod render;
pub mod script;
pub mod skip_list;

pub use config::Config;
pub use error::Error;
pub use key::Key;
pub use skip_list::SkipList;
