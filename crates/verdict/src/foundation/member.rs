//! Member accessors
//!
//! A [`MemberAccessor`] binds a rule to one member of the object under
//! validation: a stable name string plus a getter closure, both fixed at
//! rule-declaration time. The engine performs no reflection; it is handed a
//! ready accessor. The optional setter exists for test tooling only and is
//! never used by rule execution.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type Getter<T, V> = Arc<dyn Fn(&T) -> &V + Send + Sync>;
type Setter<T, V> = Arc<dyn Fn(&mut T, V) + Send + Sync>;

/// Read (and optionally write) access to one member of `T` with value type
/// `V`.
///
/// # Examples
///
/// ```rust,ignore
/// use verdict::foundation::MemberAccessor;
///
/// let surname = MemberAccessor::new("Surname", |p: &Person| &p.surname);
/// assert_eq!(surname.name(), "Surname");
/// ```
///
/// The [`member!`](crate::member) macro builds an accessor straight from a
/// field name.
pub struct MemberAccessor<T, V> {
    name: Cow<'static, str>,
    get: Getter<T, V>,
    set: Option<Setter<T, V>>,
}

impl<T, V> MemberAccessor<T, V> {
    /// Creates an accessor from a member name and a getter.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, get: F) -> Self
    where
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            get: Arc::new(get),
            set: None,
        }
    }

    /// Adds a setter. Only test tooling writes through accessors.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_setter<F>(mut self, set: F) -> Self
    where
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.set = Some(Arc::new(set));
        self
    }

    /// The member's stable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the member's value from an instance.
    pub fn get<'a>(&self, instance: &'a T) -> &'a V {
        (self.get)(instance)
    }

    /// Writes the member if a setter was configured; returns whether a write
    /// happened.
    pub fn set(&self, instance: &mut T, value: V) -> bool {
        match &self.set {
            Some(set) => {
                set(instance, value);
                true
            }
            None => false,
        }
    }
}

impl<T, V> Clone for MemberAccessor<T, V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            get: Arc::clone(&self.get),
            set: self.set.as_ref().map(Arc::clone),
        }
    }
}

impl<T, V> fmt::Debug for MemberAccessor<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberAccessor")
            .field("name", &self.name)
            .field("writable", &self.set.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person {
        surname: String,
    }

    #[test]
    fn reads_member_value() {
        let accessor = MemberAccessor::new("Surname", |p: &Person| &p.surname);
        let person = Person {
            surname: "Smith".into(),
        };
        assert_eq!(accessor.name(), "Surname");
        assert_eq!(accessor.get(&person), "Smith");
    }

    #[test]
    fn set_is_a_noop_without_setter() {
        let accessor = MemberAccessor::new("Surname", |p: &Person| &p.surname);
        let mut person = Person {
            surname: "Smith".into(),
        };
        assert!(!accessor.set(&mut person, "Jones".into()));
        assert_eq!(person.surname, "Smith");
    }

    #[test]
    fn set_writes_through_configured_setter() {
        let accessor = MemberAccessor::new("Surname", |p: &Person| &p.surname)
            .with_setter(|p: &mut Person, v| p.surname = v);
        let mut person = Person {
            surname: "Smith".into(),
        };
        assert!(accessor.set(&mut person, "Jones".into()));
        assert_eq!(person.surname, "Jones");
    }
}
