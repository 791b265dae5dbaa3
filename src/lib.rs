//! # a3s-signal
//!
//! Typed synchronous signals with scoped subscriptions for the A3S ecosystem.
//!
//! ## Overview
//!
//! `a3s-signal` lets one component fire an event without knowing who observes
//! it. Observers attach and detach at any time, including from inside a
//! callback that is running because the event fired.
//!
//! ## Quick Start
//!
//! ```rust
//! use a3s_signal::{Event, Mut, Val};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let placed: Event<(Val<u32>, Mut<Vec<String>>)> = Event::named("order.placed");
//! let total = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&total);
//! let subscription = placed.bind(move |(qty, log): (u32, &mut Vec<String>)| {
//!     counter.set(counter.get() + qty);
//!     log.push(format!("placed {qty}"));
//! });
//!
//! placed.permanent_bind(|(_, log): (u32, &mut Vec<String>)| log.push("audited".to_string()));
//!
//! let mut log = Vec::new();
//! placed.fire((3, &mut log));
//!
//! // Dropping the handle unbinds its callback
//! drop(subscription);
//! placed.fire((5, &mut log));
//!
//! assert_eq!(total.get(), 3);
//! assert_eq!(log, ["placed 3", "audited", "audited"]);
//! ```
//!
//! ## Architecture
//!
//! - **Event**: ordered callback registry, fired synchronously
//! - **Subscription**: handle that unbinds its callback when dropped
//! - **Signature**: argument list built from `Val`, `Mut` and `Ref` slots
//! - **EventConfig** / **EventInfo**: serde config and registry snapshot

pub mod error;
pub mod event;
pub mod signature;
pub mod subscription;
pub mod types;

// Re-export core types
pub use error::{EventError, Result};
pub use event::{Callback, Event};
pub use signature::{Arg, Mut, Ref, Signature, Val};
pub use subscription::Subscription;
pub use types::{EventConfig, EventInfo, SubscriptionState, DEFAULT_EVENT_NAME};
