//! Queue transport implementations.

pub mod redis_queue;

pub use redis_queue::RedisQueue;
