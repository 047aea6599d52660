use smol_str::SmolStr;
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
    sync::atomic::{AtomicUsize, Ordering as AtomicOrdering},
};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A real-valued symbol which can be used inside an
/// [`Expression`](crate::Expression).
///
/// Variables are identified by an `id` handed out in creation order. Two
/// variables with the same name are still different variables. The one
/// exception is the *dummy* variable, which always has the same `id` so every
/// dummy compares (and hashes) equal to every other dummy.
#[derive(Debug, Clone)]
pub struct Variable {
    id: usize,
    name: SmolStr,
}

impl Variable {
    /// The `id` reserved for the dummy variable. It sorts after every real
    /// variable.
    pub const DUMMY_ID: usize = usize::MAX;

    /// Create a fresh variable with the next sequential `id`.
    pub fn new<S: Into<SmolStr>>(name: S) -> Self {
        let id = NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed);
        assert!(id < Variable::DUMMY_ID, "Ran out of variable IDs");

        Variable {
            id,
            name: name.into(),
        }
    }

    /// The placeholder variable.
    pub fn dummy() -> Self {
        Variable {
            id: Variable::DUMMY_ID,
            name: SmolStr::new_inline("dummy"),
        }
    }

    pub fn id(&self) -> usize { self.id }

    pub fn name(&self) -> &str { &self.name }

    pub fn is_dummy(&self) -> bool { self.id == Variable::DUMMY_ID }

    pub fn equal_to(&self, other: &Variable) -> bool { self.id == other.id }

    pub fn less(&self, other: &Variable) -> bool { self.id < other.id }

    pub fn hash_value(&self) -> u64 { self.id as u64 }
}

impl Default for Variable {
    fn default() -> Self { Variable::dummy() }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Variable) -> bool { self.equal_to(other) }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state); }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Variable) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Variable) -> Ordering { self.id.cmp(&other.id) }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
