use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// A zero-argument function evaluated every time an event is rendered.
///
/// Cloning is cheap and shares the underlying function, so the same generator
/// can back several events or streams.
pub struct Generator<T>(Arc<dyn Fn() -> Result<T, BoxError> + Send + Sync>);

impl<T> Generator<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self(Arc::new(move || Ok(f())))
    }

    /// Wraps a generator that can fail. Failures surface as render errors.
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn() -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self) -> Result<T, BoxError> {
        (self.0)()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Generator<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Generator<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Generator(..)")
    }
}
