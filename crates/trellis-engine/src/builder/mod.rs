/*!
Scoped building of nested sequences and mappings.

A [`Builder`] holds a single "current container" slot. Opening a scope
swaps a fresh container (or none, for a plain value scope) into the slot,
runs the caller's body against the same builder, then swaps the previous
container back. The swap-back happens on the error path too, so a failed
nested scope never leaves a stale container behind. A closing container
scope yields what it accumulated and discards the body's own return value;
a value scope yields exactly what its body returned.

Inserts go through three surfaces: positional ([`Builder::item`]), keyed
([`Builder::pair`]) and name-dispatched ([`Builder::call`]). All of them
are thin layers over the shape-directed [`Builder::write`] primitive.

```
use trellis_engine::{Builder, Hint};

let mut builder = Builder::new();
let value = builder.build(|m| {
    m.hash(|m| {
        m.pair("name", "toast")?;
        m.pair_with("tags", Hint::Array, |m| m.item("breakfast"))
    })
})?;

assert_eq!(value.to_string(), "{name: toast, tags: [breakfast]}");
# Ok::<(), trellis_engine::BuildError>(())
```
*/

use crate::value::{Mapping, Value};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("unsupported call `{name}`: no array or hash scope is open")]
    UnsupportedCall { name: String },
    #[error("`item` called outside an array scope")]
    ItemOutsideArray,
    #[error("`pair` called outside a hash scope")]
    PairOutsideHash,
}

/// Selects what a nested scope builds when a body is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hint {
    /// The body fills a fresh sequence.
    Array,
    /// The body fills a fresh mapping.
    Hash,
    /// The scope evaluates to the body's own return value.
    #[default]
    Value,
}

/// The container currently accepting inserts. One slot; scopes swap it in
/// and out around the body call.
#[derive(Debug)]
enum Current {
    None,
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

#[derive(Debug)]
pub struct Builder {
    current: Current,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            current: Current::None,
        }
    }

    /// Build an arbitrary value.
    ///
    /// Opens a value scope: the body's return value is the result, so
    /// `build(|_| Ok(()))` yields [`Value::Null`] and a body that opens a
    /// `hash` or `array` scope yields that structure.
    pub fn build<F, R>(&mut self, body: F) -> Result<Value, BuildError>
    where
        F: FnOnce(&mut Self) -> Result<R, BuildError>,
        R: Into<Value>,
    {
        self.open_scope(Current::None, body)
    }

    /// Build a mapping. The body's own return value is discarded; the
    /// accumulated mapping is the result.
    pub fn hash<F, R>(&mut self, body: F) -> Result<Value, BuildError>
    where
        F: FnOnce(&mut Self) -> Result<R, BuildError>,
        R: Into<Value>,
    {
        self.open_scope(Current::Mapping(Mapping::new()), body)
    }

    /// Build a sequence. The body's own return value is discarded; the
    /// accumulated sequence is the result.
    pub fn array<F, R>(&mut self, body: F) -> Result<Value, BuildError>
    where
        F: FnOnce(&mut Self) -> Result<R, BuildError>,
        R: Into<Value>,
    {
        self.open_scope(Current::Sequence(Vec::new()), body)
    }

    /// Append a value to the current sequence.
    pub fn item<V: Into<Value>>(&mut self, value: V) -> Result<(), BuildError> {
        match &mut self.current {
            Current::Sequence(items) => {
                items.push(value.into());
                Ok(())
            }
            _ => Err(BuildError::ItemOutsideArray),
        }
    }

    /// Append the result of a nested scope to the current sequence.
    ///
    /// The hint picks the nested scope: [`Hint::Array`] and [`Hint::Hash`]
    /// accumulate a fresh container, [`Hint::Value`] takes the body's
    /// return value as is.
    pub fn item_with<F, R>(&mut self, hint: Hint, body: F) -> Result<(), BuildError>
    where
        F: FnOnce(&mut Self) -> Result<R, BuildError>,
        R: Into<Value>,
    {
        let value = self.resolve_hint(hint, body)?;
        match &mut self.current {
            Current::Sequence(items) => {
                items.push(value);
                Ok(())
            }
            _ => Err(BuildError::ItemOutsideArray),
        }
    }

    /// Set a key in the current mapping. `pair(key, ())` stores Null.
    pub fn pair<K, V>(&mut self, key: K, value: V) -> Result<(), BuildError>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        match &mut self.current {
            Current::Mapping(map) => {
                map.insert(key, value.into());
                Ok(())
            }
            _ => Err(BuildError::PairOutsideHash),
        }
    }

    /// Set a key in the current mapping to the result of a nested scope,
    /// with the same hint resolution as [`Builder::item_with`].
    pub fn pair_with<K, F, R>(&mut self, key: K, hint: Hint, body: F) -> Result<(), BuildError>
    where
        K: Into<String>,
        F: FnOnce(&mut Self) -> Result<R, BuildError>,
        R: Into<Value>,
    {
        let value = self.resolve_hint(hint, body)?;
        match &mut self.current {
            Current::Mapping(map) => {
                map.insert(key, value);
                Ok(())
            }
            _ => Err(BuildError::PairOutsideHash),
        }
    }

    /// Shape-directed insert: appends in an array scope (the key is
    /// ignored), assigns by key in a hash scope, and does nothing when no
    /// scope is open.
    pub fn write<K, V>(&mut self, key: K, value: V) -> Result<(), BuildError>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        match &mut self.current {
            Current::Sequence(items) => items.push(value.into()),
            Current::Mapping(map) => map.insert(key, value.into()),
            Current::None => {}
        }
        Ok(())
    }

    /// [`Builder::write`] with a nested scope for the value.
    pub fn write_with<K, F, R>(&mut self, key: K, hint: Hint, body: F) -> Result<(), BuildError>
    where
        K: Into<String>,
        F: FnOnce(&mut Self) -> Result<R, BuildError>,
        R: Into<Value>,
    {
        let value = self.resolve_hint(hint, body)?;
        match &mut self.current {
            Current::Sequence(items) => items.push(value),
            Current::Mapping(map) => map.insert(key, value),
            Current::None => {}
        }
        Ok(())
    }

    /// Open dispatch: an arbitrary call name resolved by the shape of the
    /// current container, never by the name itself.
    ///
    /// In an array scope this appends the value and discards `name`; in a
    /// hash scope it assigns the value under `name`. With no open
    /// container there is nothing to receive the call and it fails with
    /// [`BuildError::UnsupportedCall`].
    pub fn call<V: Into<Value>>(&mut self, name: &str, value: V) -> Result<(), BuildError> {
        match self.current {
            Current::Sequence(_) => self.item(value),
            Current::Mapping(_) => self.pair(name, value),
            Current::None => Err(BuildError::UnsupportedCall {
                name: name.to_string(),
            }),
        }
    }

    /// [`Builder::call`] with a nested scope for the value.
    pub fn call_with<F, R>(&mut self, name: &str, hint: Hint, body: F) -> Result<(), BuildError>
    where
        F: FnOnce(&mut Self) -> Result<R, BuildError>,
        R: Into<Value>,
    {
        match self.current {
            Current::Sequence(_) => self.item_with(hint, body),
            Current::Mapping(_) => self.pair_with(name, hint, body),
            Current::None => Err(BuildError::UnsupportedCall {
                name: name.to_string(),
            }),
        }
    }

    fn resolve_hint<F, R>(&mut self, hint: Hint, body: F) -> Result<Value, BuildError>
    where
        F: FnOnce(&mut Self) -> Result<R, BuildError>,
        R: Into<Value>,
    {
        match hint {
            Hint::Array => self.array(body),
            Hint::Hash => self.hash(body),
            Hint::Value => self.build(body),
        }
    }

    /// Run `body` with `container` as the current container, restoring the
    /// previous one afterwards. Container scopes yield the container they
    /// accumulated; value scopes fall through to the body's return value.
    fn open_scope<F, R>(&mut self, container: Current, body: F) -> Result<Value, BuildError>
    where
        F: FnOnce(&mut Self) -> Result<R, BuildError>,
        R: Into<Value>,
    {
        let parent = std::mem::replace(&mut self.current, container);
        let result = body(self);
        let finished = std::mem::replace(&mut self.current, parent);

        // Restore happened above, so a body error propagates cleanly.
        let value = result?;

        Ok(match finished {
            Current::Sequence(items) => Value::Sequence(items),
            Current::Mapping(map) => Value::Mapping(map),
            Current::None => value.into(),
        })
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
