// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `then` combinators for observables carrying a `Result`.
//!
//! A chain of `then` calls only ever runs user transforms on `Ok` values.
//! Once an `Err` enters the chain it is passed through every later step
//! untouched, so error handling can wait until the final `subscribe`.
//!
//! ```
//! use the_observable::Observable;
//!
//! let greeting: Observable<Result<String, String>> =
//!     Observable::with_value(Ok("Hello World".to_string()));
//!
//! let shouted = greeting.then(|text| text.to_uppercase());
//!
//! assert_eq!(shouted.value(), Some(Ok("HELLO WORLD".to_string())));
//! ```

use crate::observable::Observable;

impl<V, E> Observable<Result<V, E>>
where
    V: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Apply an infallible transform to every `Ok` value.
    pub fn then<U, F>(&self, transform: F) -> Observable<Result<U, E>>
    where
        U: Clone + Send + 'static,
        F: Fn(V) -> U + Send + Sync + 'static,
    {
        self.map(move |result| result.map(&transform))
    }

    /// Apply a fallible transform to every `Ok` value; its `Err` becomes the
    /// downstream value instead of escaping the chain.
    pub fn try_then<U, F>(&self, transform: F) -> Observable<Result<U, E>>
    where
        U: Clone + Send + 'static,
        F: Fn(V) -> Result<U, E> + Send + Sync + 'static,
    {
        self.map(move |result| result.and_then(&transform))
    }

    /// Continue with an asynchronous step for every `Ok` value.
    ///
    /// On `Err` the transform is never called and the error is republished
    /// synchronously. Like `flat_map`, only the step for the latest source
    /// value is followed.
    pub fn then_async<U, F>(&self, transform: F) -> Observable<Result<U, E>>
    where
        U: Clone + Send + 'static,
        F: Fn(V) -> Observable<Result<U, E>> + Send + Sync + 'static,
    {
        self.flat_map(move |result| match result {
            Ok(value) => transform(value),
            Err(error) => Observable::with_value(Err(error)),
        })
    }
}
