//! Built-in helpers registered on every engine the plugin drives.
//!
//! - `call`: `{{call "name" a b}}` invokes the callable registered under
//!   `name` (see [`Options::function`](crate::config::Options::function)) with
//!   the evaluated arguments `[a, b]` and yields its return value, so it also
//!   works as a subexpression: `{{#if (call "isDraft" this)}}`.
//! - `set`: `{{set "name" value}}` stores `value` under `name` in the root
//!   context of the template being rendered. It renders nothing; expressions
//!   after it in the same template see the new value.
//!
//! Template data is plain JSON and cannot carry host functions, so `call`
//! resolves its first argument as a *name* in a [`FunctionRegistry`] rather
//! than as a function value.

use std::collections::BTreeMap;
use std::sync::Arc;

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
    RenderErrorReason, ScopedJson,
};
use serde_json::Value;
use tracing::{debug, trace};

/// Names of the helpers installed by [`register_builtin_helpers`].
pub const BUILTIN_HELPERS: &[&str] = &["call", "set"];

/// A host function reachable from templates through the `call` helper.
pub type Callable = Arc<dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// Named callables for the `call` helper.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, Callable>,
}

impl FunctionRegistry {
    /// Wraps an existing name → callable map.
    pub fn new(functions: BTreeMap<String, Callable>) -> Self {
        Self {
            functions,
        }
    }

    /// Invokes `name` with `args`.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, RenderError> {
        let function = self.functions.get(name).ok_or_else(|| {
            RenderErrorReason::Other(format!("call: no function registered as '{name}'"))
        })?;
        function(args).map_err(|e| RenderErrorReason::Other(format!("call '{name}': {e}")).into())
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.functions.keys()).finish()
    }
}

/// The `call` helper.
#[derive(Debug, Clone)]
pub struct CallHelper {
    functions: FunctionRegistry,
}

impl CallHelper {
    /// Creates the helper over `functions`.
    pub fn new(functions: FunctionRegistry) -> Self {
        Self {
            functions,
        }
    }
}

impl HelperDef for CallHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let name = h
            .param(0)
            .and_then(|p| p.value().as_str())
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("call", 0))?;
        let args: Vec<Value> = h.params().iter().skip(1).map(|p| p.value().clone()).collect();

        trace!("call '{}' with {} argument(s)", name, args.len());
        let result = self.functions.invoke(name, &args)?;
        Ok(ScopedJson::Derived(result))
    }
}

/// The `set` helper.
pub fn set_helper(
    h: &Helper,
    _: &Handlebars,
    ctx: &Context,
    rc: &mut RenderContext,
    _: &mut dyn Output,
) -> HelperResult {
    let name = h
        .param(0)
        .and_then(|p| p.value().as_str())
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("set", 0))?;
    let value = h.param(1).map_or(Value::Null, |p| p.value().clone());

    // An earlier `set` may already have replaced the root.
    let mut root = match rc.context() {
        Some(current) => current.data().clone(),
        None => ctx.data().clone(),
    };
    let Some(map) = root.as_object_mut() else {
        return Err(RenderErrorReason::Other(format!(
            "set: cannot assign '{name}' on a non-object root context"
        ))
        .into());
    };
    map.insert(name.to_string(), value);

    rc.set_context(Context::wraps(root)?);
    Ok(())
}

/// Installs `call` and `set` on `engine`.
pub fn register_builtin_helpers(engine: &mut Handlebars<'static>, functions: FunctionRegistry) {
    debug!("Registering built-in helpers {:?} (callables: {:?})", BUILTIN_HELPERS, functions);
    engine.register_helper("call", Box::new(CallHelper::new(functions)));
    engine.register_helper("set", Box::new(set_helper));
}
