// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The observable core and the combinators layered on it.
//!
//! * `cell` - value slot, subscriber registry, `subscribe` / `update`
//! * `subscription` - tokens for deregistering callbacks
//! * `combinators` - `map` and `flat_map`
//! * `result` - `then`, `try_then` and `then_async` on `Observable<Result<V, E>>`
//! * `timing` - `delay`, `debounce` and `hop_to`

mod cell;
mod combinators;
mod result;
mod subscription;
mod timing;


pub use cell::{Observable, ObservableOptions};
pub use subscription::Subscription;
