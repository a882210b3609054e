//! Guarded functions: wrappers that check arguments before calling their target

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use std::fmt;
use std::sync::Arc;

use super::constraint::{constrain_types, loose_types};
use crate::error::{GuardError, Result};
use crate::model::{AsyncFunction, Callable, Function, TypeSpec, Value};
use crate::registry::{TypeRegistry, global_registry};

/// How a guarded function checks its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardMode {
    /// One specification per position; extra arguments are rejected
    Strong(Vec<TypeSpec>),
    /// One specification applied to every argument
    Weak(TypeSpec),
}

/// A function whose arguments are type-checked before its target runs
///
/// Checks are synchronous for both kinds of target, so a mismatch is reported
/// before an asynchronous target is even started.
pub struct GuardedFunction {
    name: String,
    mode: GuardMode,
    target: Callable,
    registry: Arc<TypeRegistry>,
}

impl GuardedFunction {
    fn new(registry: Arc<TypeRegistry>, mode: GuardMode, target: Value) -> Result<Self> {
        let Some(target) = target.as_callable().cloned() else {
            return Err(GuardError::NotCallable {
                actual: registry.type_of(&target),
            });
        };

        log::trace!(
            "guarding {} function '{}' with {:?}",
            if target.is_async() { "async" } else { "sync" },
            target.name(),
            mode
        );

        Ok(Self {
            name: target.name().to_string(),
            mode,
            target,
            registry,
        })
    }

    /// Name copied from the target
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if arguments are checked position by position
    pub fn is_strong_function(&self) -> bool {
        matches!(self.mode, GuardMode::Strong(_))
    }

    /// Check if every argument is checked against the same specification
    pub fn is_weak_function(&self) -> bool {
        matches!(self.mode, GuardMode::Weak(_))
    }

    /// The wrapped function
    pub fn untyped_function(&self) -> &Callable {
        &self.target
    }

    /// Check if the wrapped function is asynchronous
    pub fn is_async(&self) -> bool {
        self.target.is_async()
    }

    /// The checking mode and its specifications
    pub fn mode(&self) -> &GuardMode {
        &self.mode
    }

    /// Run the argument checks without calling the target
    pub fn check(&self, args: &[Value]) -> Result<()> {
        match &self.mode {
            GuardMode::Strong(types) => constrain_types(&self.registry, types, args),
            GuardMode::Weak(spec) => loose_types(&self.registry, spec, args),
        }
    }

    /// Check the arguments, then call the target
    ///
    /// For an asynchronous target the pending result is returned as
    /// [`Value::Promise`] and runs when awaited.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        self.check(args)?;
        Ok(self.target.invoke(args)?)
    }

    /// Check the arguments, then call the target and wait for its result
    ///
    /// The check runs before this returns; a failing check yields an already
    /// completed future.
    pub fn call_async(&self, args: Vec<Value>) -> BoxFuture<'static, Result<Value>> {
        if let Err(err) = self.check(&args) {
            return future::ready(Err(err)).boxed();
        }

        match &self.target {
            Callable::Sync(f) => future::ready(f.call(&args).map_err(GuardError::from)).boxed(),
            Callable::Async(f) => {
                let f = Arc::clone(f);
                async move { f.call(args).await.map_err(GuardError::from) }.boxed()
            }
        }
    }

    /// Turn the guard into a callable value of the same kind as its target
    pub fn into_callable(self) -> Callable {
        if self.is_async() {
            Callable::Async(Arc::new(self))
        } else {
            Callable::Sync(Arc::new(self))
        }
    }
}

fn into_anyhow(err: GuardError) -> anyhow::Error {
    match err {
        GuardError::Call(inner) => inner,
        other => anyhow::Error::new(other),
    }
}

impl Function for GuardedFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: &[Value]) -> anyhow::Result<Value> {
        GuardedFunction::call(self, args).map_err(into_anyhow)
    }
}

#[async_trait]
impl AsyncFunction for GuardedFunction {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        self.call_async(args).await.map_err(into_anyhow)
    }
}

impl fmt::Debug for GuardedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedFunction")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("async", &self.is_async())
            .finish()
    }
}

impl fmt::Display for GuardedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        match &self.mode {
            GuardMode::Strong(types) => {
                for (i, spec) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{spec}")?;
                }
            }
            GuardMode::Weak(spec) => write!(f, "...{spec}")?,
        }
        write!(f, ")")
    }
}

impl TypeRegistry {
    /// Guard `target` with one specification per argument position
    ///
    /// Fails if `target` is not a function.
    pub fn strong_function<I, S>(
        self: &Arc<Self>,
        types: I,
        target: impl Into<Value>,
    ) -> Result<GuardedFunction>
    where
        I: IntoIterator<Item = S>,
        S: Into<TypeSpec>,
    {
        let types = types.into_iter().map(Into::into).collect();
        GuardedFunction::new(Arc::clone(self), GuardMode::Strong(types), target.into())
    }

    /// Guard `target` with one specification applied to every argument
    ///
    /// Fails if `target` is not a function.
    pub fn weak_function(
        self: &Arc<Self>,
        spec: impl Into<TypeSpec>,
        target: impl Into<Value>,
    ) -> Result<GuardedFunction> {
        GuardedFunction::new(Arc::clone(self), GuardMode::Weak(spec.into()), target.into())
    }
}

/// [`TypeRegistry::strong_function`] on the default registry
pub fn strong_function<I, S>(types: I, target: impl Into<Value>) -> Result<GuardedFunction>
where
    I: IntoIterator<Item = S>,
    S: Into<TypeSpec>,
{
    global_registry().strong_function(types, target)
}

/// [`TypeRegistry::weak_function`] on the default registry
pub fn weak_function(
    spec: impl Into<TypeSpec>,
    target: impl Into<Value>,
) -> Result<GuardedFunction> {
    global_registry().weak_function(spec, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrimitiveType;
    use pretty_assertions::assert_eq;

    fn concat() -> Callable {
        Callable::from_fn("concat", |args| {
            let text: String = args
                .iter()
                .map(|a| match a {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    other => format!("{other:?}"),
                })
                .collect();
            Ok(Value::from(text))
        })
    }

    #[test]
    fn test_introspection() {
        let registry = Arc::new(TypeRegistry::new());
        let target = concat();
        let strong = registry
            .strong_function(["string", "number"], target.clone())
            .unwrap();

        assert_eq!(strong.name(), "concat");
        assert!(strong.is_strong_function());
        assert!(!strong.is_weak_function());
        assert!(!strong.is_async());
        assert!(strong.untyped_function().ptr_eq(&target));
        assert_eq!(strong.to_string(), "concat(string, number)");
        assert_eq!(
            strong.mode(),
            &GuardMode::Strong(vec![TypeSpec::from("string"), TypeSpec::from("number")])
        );

        let weak = registry
            .weak_function(TypeSpec::from(["string", "number"]), target)
            .unwrap();
        assert!(weak.is_weak_function());
        assert!(!weak.is_strong_function());
        assert_eq!(weak.to_string(), "concat(...string,number)");
        assert_eq!(weak.mode(), &GuardMode::Weak(TypeSpec::from(["string", "number"])));
    }

    #[test]
    fn test_rejects_non_callable_target() {
        let registry = Arc::new(TypeRegistry::new());
        let err = registry.strong_function(["string"], "nope").unwrap_err();
        assert!(matches!(
            err,
            GuardError::NotCallable { ref actual } if *actual == PrimitiveType::String
        ));

        let err = registry.weak_function("string", Value::Null).unwrap_err();
        assert!(matches!(err, GuardError::NotCallable { .. }));
    }

    #[test]
    fn test_into_callable_keeps_kind_and_checks() {
        let registry = Arc::new(TypeRegistry::new());
        let guard = registry.weak_function("string", concat()).unwrap();
        let callable = guard.into_callable();

        assert!(!callable.is_async());
        assert_eq!(callable.name(), "concat");
        assert_eq!(
            callable.invoke(&[Value::from("a"), Value::from("b")]).unwrap(),
            Value::from("ab")
        );

        let err = callable.invoke(&[Value::from(1)]).unwrap_err();
        let guard_err = err.downcast_ref::<GuardError>().unwrap();
        assert_eq!(guard_err.position(), Some(0));
    }

    #[test]
    fn test_target_errors_pass_through() {
        let registry = Arc::new(TypeRegistry::new());
        let failing = Callable::from_fn("failing", |_| anyhow::bail!("target failed"));
        let guard = registry.weak_function("number", failing).unwrap();

        let err = guard.call(&[Value::from(1)]).unwrap_err();
        assert!(matches!(err, GuardError::Call(_)));
        assert_eq!(err.to_string(), "target failed");
    }
}
