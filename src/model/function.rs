//! Callable values: synchronous and asynchronous functions

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::value::{Deferred, Value};

/// Synchronous function that can be stored in a [`Value`]
pub trait Function: Send + Sync {
    /// Get the function name
    fn name(&self) -> &str;

    /// Call the function with the given arguments
    fn call(&self, args: &[Value]) -> anyhow::Result<Value>;
}

/// Asynchronous function that can be stored in a [`Value`]
#[async_trait]
pub trait AsyncFunction: Send + Sync {
    /// Get the function name
    fn name(&self) -> &str;

    /// Call the function with the given arguments (async)
    async fn call(&self, args: Vec<Value>) -> anyhow::Result<Value>;
}

/// Closure-backed synchronous function
struct FnFunction<F> {
    name: String,
    func: F,
}

impl<F> Function for FnFunction<F>
where
    F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: &[Value]) -> anyhow::Result<Value> {
        (self.func)(args)
    }
}

/// Closure-backed asynchronous function
struct AsyncFnFunction<F> {
    name: String,
    func: F,
}

#[async_trait]
impl<F, Fut> AsyncFunction for AsyncFnFunction<F>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        (self.func)(args).await
    }
}

/// A function value, either synchronous or asynchronous
#[derive(Clone)]
pub enum Callable {
    /// Returns its result directly
    Sync(Arc<dyn Function>),
    /// Returns a deferred result
    Async(Arc<dyn AsyncFunction>),
}

impl Callable {
    /// Wrap a synchronous closure
    pub fn from_fn<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Callable::Sync(Arc::new(FnFunction {
            name: name.into(),
            func,
        }))
    }

    /// Wrap an asynchronous closure
    pub fn from_async_fn<F, Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Callable::Async(Arc::new(AsyncFnFunction {
            name: name.into(),
            func,
        }))
    }

    /// Get the function name
    pub fn name(&self) -> &str {
        match self {
            Callable::Sync(f) => f.name(),
            Callable::Async(f) => f.name(),
        }
    }

    /// Check if calling this function yields a deferred result
    pub fn is_async(&self) -> bool {
        matches!(self, Callable::Async(_))
    }

    /// Call the function
    ///
    /// Asynchronous functions return their pending result as [`Value::Promise`];
    /// the function body runs when the promise is awaited.
    pub fn invoke(&self, args: &[Value]) -> anyhow::Result<Value> {
        match self {
            Callable::Sync(f) => f.call(args),
            Callable::Async(f) => {
                let f = Arc::clone(f);
                let args = args.to_vec();
                Ok(Value::Promise(Deferred::new(async move {
                    f.call(args).await
                })))
            }
        }
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Sync(a), Callable::Sync(b)) => Arc::ptr_eq(a, b),
            (Callable::Async(a), Callable::Async(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Sync(func) => write!(f, "[Function: {}]", func.name()),
            Callable::Async(func) => write!(f, "[AsyncFunction: {}]", func.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrimitiveType;

    #[test]
    fn test_sync_invoke() {
        let len = Callable::from_fn("len", |args| Ok(Value::from(args.len() as u32)));
        assert_eq!(len.name(), "len");
        assert!(!len.is_async());
        assert_eq!(
            len.invoke(&[Value::Null, Value::Null]).unwrap(),
            Value::from(2)
        );
    }

    #[tokio::test]
    async fn test_async_invoke_returns_promise() {
        let echo = Callable::from_async_fn("echo", |mut args: Vec<Value>| async move {
            anyhow::Ok(args.pop().unwrap_or_default())
        });
        let pending = echo.invoke(&[Value::from("hi")]).unwrap();
        assert_eq!(pending.primitive_type(), PrimitiveType::Promise);

        let Value::Promise(deferred) = pending else {
            panic!("expected a promise");
        };
        assert_eq!(deferred.settle().await.unwrap(), Value::from("hi"));
    }

    #[test]
    fn test_identity() {
        let a = Callable::from_fn("a", |_| Ok(Value::Undefined));
        let b = Callable::from_fn("a", |_| Ok(Value::Undefined));
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }
}
