use std::collections::BTreeMap;
use std::f64::consts;
use std::fmt;
use std::rc::Rc;

/// A callable built-in: receives its already evaluated arguments in order.
pub type Builtin = Rc<dyn Fn(&[f64]) -> f64>;

/// Name-to-function table consulted by the grammar (which names are
/// callable) and by the interpreter (what a call computes).
///
/// The grammar copies the set of names when it is built, so every function
/// must be registered before the [`Grammar`](crate::parser::Grammar) that
/// should recognise it is constructed.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, Builtin>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the standard math functions
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register("sqrt", |args| arg(args, 0).sqrt());
        registry.register("abs", |args| arg(args, 0).abs());
        registry.register("mod", |args| arg(args, 0) % arg(args, 1));
        registry.register("round", |args| arg(args, 0).round());
        registry.register("floor", |args| arg(args, 0).floor());
        registry.register("ceil", |args| arg(args, 0).ceil());

        registry.register("sin", |args| arg(args, 0).sin());
        registry.register("cos", |args| arg(args, 0).cos());
        registry.register("tan", |args| arg(args, 0).tan());
        registry.register("asin", |args| arg(args, 0).asin());
        registry.register("acos", |args| arg(args, 0).acos());
        registry.register("atan", |args| arg(args, 0).atan());
        registry.register("atan2", |args| arg(args, 0).atan2(arg(args, 1)));
        registry.register("sinh", |args| arg(args, 0).sinh());
        registry.register("cosh", |args| arg(args, 0).cosh());
        registry.register("tanh", |args| arg(args, 0).tanh());

        // log(x) is the natural log, log(base, x) uses the given base
        registry.register("log", |args| match args {
            [x] => x.ln(),
            _ => arg(args, 1).ln() / arg(args, 0).ln(),
        });
        registry.register("ln", |args| arg(args, 0).ln());
        registry.register("log2", |args| arg(args, 0).log2());
        registry.register("log10", |args| arg(args, 0).log10());
        registry.register("exp", |args| arg(args, 0).exp());

        registry.register("min", |args| args.iter().copied().fold(f64::NAN, f64::min));
        registry.register("max", |args| args.iter().copied().fold(f64::NAN, f64::max));

        registry.register("pi", |_| consts::PI);
        registry.register("e", |_| consts::E);
        registry.register("rand", |_| rand::random::<f64>());

        registry
    }

    /// Add or replace a function
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&[f64]) -> f64 + 'static,
    {
        self.functions.insert(name.into(), Rc::new(f));
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Missing arguments read as NaN
fn arg(args: &[f64], index: usize) -> f64 {
    args.get(index).copied().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(registry: &FunctionRegistry, name: &str, args: &[f64]) -> f64 {
        registry.get(name).map(|f| f(args)).unwrap_or(f64::NAN)
    }

    #[test]
    fn builtins_are_registered() {
        let registry = FunctionRegistry::with_builtins();
        for name in ["sqrt", "mod", "round", "floor", "ceil", "atan2", "log", "exp", "rand"] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn log_takes_base_first() {
        let registry = FunctionRegistry::with_builtins();
        assert!((call(&registry, "log", &[2.0, 8.0]) - 3.0).abs() < 1e-12);
        assert!((call(&registry, "log", &[consts::E]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_arguments_are_nan() {
        let registry = FunctionRegistry::with_builtins();
        assert!(call(&registry, "sqrt", &[]).is_nan());
        assert!(call(&registry, "atan2", &[1.0]).is_nan());
    }

    #[test]
    fn variadic_min_max() {
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(call(&registry, "max", &[3.0, 9.0, -1.0]), 9.0);
        assert_eq!(call(&registry, "min", &[3.0, 9.0, -1.0]), -1.0);
        assert!(call(&registry, "max", &[]).is_nan());
    }

    #[test]
    fn rand_is_unit_interval() {
        let registry = FunctionRegistry::with_builtins();
        let value = call(&registry, "rand", &[]);
        assert!((0.0..1.0).contains(&value));
    }

    #[test]
    fn register_replaces_existing() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.is_empty());
        registry.register("twice", |args| arg(args, 0) * 2.0);
        registry.register("twice", |args| arg(args, 0) + arg(args, 0));
        assert_eq!(registry.len(), 1);
        assert_eq!(call(&registry, "twice", &[4.0]), 8.0);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["twice"]);
    }
}
