//! Lifecycle layer for asynchronous annotation producers.
//!
//! Producers are expensive, long-lived objects that recompute overlay
//! annotations in the background for one document (or one view of it).
//! This crate decides whether and when one is created, caches it per
//! (view, document) identity, evicts it the moment its disposal signal
//! fires, and hands consumers short-lived [`Tagger`] handles that wrap it.
//!
//! The center is [`TaggerProvider`]: one per feature, configured with that
//! feature's flag gates, creation strategy, and debounce tier. Everything
//! around it is a seam — [`ProducerCache`] for storage, [`ProducerFactory`]
//! for construction, [`AnnotationProducer`] for the producer itself.

pub mod cache;
pub mod delay;
pub mod dispose;
pub mod factory;
pub mod gate;
pub mod key;
pub mod producer;
pub mod provider;
pub mod tagger;

pub use cache::{CachedProducer, KeyedProducerCache, ProducerCache};
pub use delay::TaggerDelay;
pub use dispose::{DisposeSignal, Subscription};
pub use factory::ProducerFactory;
pub use key::ResourceKey;
pub use producer::{AnnotationProducer, ProducerRef};
pub use provider::{CounterSnapshot, TaggerProvider};
pub use tagger::Tagger;
